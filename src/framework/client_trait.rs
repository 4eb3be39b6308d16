//! # ActorClient Trait
//!
//! Shared read operations for the domain clients, built on the generic
//! [`ResourceClient`]. Implementors only supply access to the inner client and a mapping
//! from [`FrameworkError`] into their own error type.

use super::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic client.
    fn inner(&self) -> &ResourceClient<T>;

    /// Translate framework failures, recovering the entity's own error where present.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch an entity by id. `Ok(None)` when it does not exist.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// All entities, in identifier order.
    #[tracing::instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().list(None).await.map_err(Self::map_error)
    }
}
