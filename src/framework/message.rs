//! # Generic Messages
//!
//! Requests travelling from a [`ResourceClient`](super::ResourceClient) to its
//! [`ResourceActor`](super::ResourceActor). Each carries a oneshot sender for the reply.

use super::entity::ActorEntity;
use super::error::FrameworkError;
use tokio::sync::oneshot;

/// One-shot reply channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Operations understood by every resource actor: CRUD, filtered listing, and a
/// resource-specific `Action`.
///
/// The variants are typed through the entity's associated types, so a catalog actor
/// only ever receives catalog payloads.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    /// List entities in identifier order, optionally filtered.
    List {
        query: Option<T::Query>,
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    /// Generic removal. No storefront client exposes it, so stored entities are never
    /// deleted.
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}
