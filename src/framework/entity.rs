//! # ActorEntity Trait
//!
//! The contract every stored resource (Product, Order, User) implements so that a single
//! generic [`ResourceActor`](super::ResourceActor) can own it. The associated types pin down
//! which payloads an actor accepts, which lookups it answers and which error it reports,
//! so a `ProductCreate` can never reach the order store.
//!
//! Lifecycle hooks are async and receive the actor's injected `Context`. The order store,
//! for example, is handed a catalog client so `on_create` can check captured prices
//! against the live catalog.

use async_trait::async_trait;
use std::fmt::{Debug, Display};

/// Trait that any resource entity must implement to be managed by `ResourceActor`.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// Identifier assigned by the actor. Identifiers are handed out sequentially from 1,
    /// so the type must be constructible from a `u32` and ordered for listing.
    type Id: Ord + Clone + Send + Sync + Display + Debug + From<u32>;

    /// Payload required to create a new instance.
    type Create: Send + Sync + Debug;

    /// Payload required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Resource-specific operations beyond CRUD.
    type Action: Send + Sync + Debug;

    /// Result returned by [`ActorEntity::handle_action`].
    type ActionResult: Send + Sync + Debug;

    /// Filter accepted by `List` requests.
    type Query: Send + Sync + Debug;

    /// Dependencies injected into the actor when it starts. Use `()` for none.
    type Context: Send + Sync;

    /// One error enum per entity. The framework boxes it on the way out and domain
    /// clients downcast it back, so callers can still match on specific variants.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Build the entity from its assigned id and the create payload.
    /// Runs synchronously before [`ActorEntity::on_create`]; reject malformed payloads here.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Whether this entity satisfies a `List` filter.
    fn matches(&self, _query: &Self::Query) -> bool {
        true
    }

    // --- Lifecycle Hooks (Async) ---

    /// Called after construction and before the entity becomes visible in the store.
    /// An error here aborts the create and nothing is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Apply an update payload.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called immediately before the entity is removed.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Handle a resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
