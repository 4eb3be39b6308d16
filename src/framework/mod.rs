//! Generic actor framework backing the catalog, order and user stores.
//!
//! # Main Components
//!
//! - [`ActorEntity`] - trait a resource type implements to be stored by an actor
//! - [`ResourceActor`] - the task that owns a store and serializes every request to it
//! - [`ResourceClient`] - cloneable, deadline-bounded handle to a running actor
//! - [`ActorClient`] - shared read operations for the domain clients
//! - [`FrameworkError`] - plumbing failures plus boxed entity errors
//!
//! # Testing
//!
//! See [`mock`] for driving clients without a running actor.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

pub use actor::{ResourceActor, DEFAULT_REQUEST_TIMEOUT};
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
pub use mock::MockClient;
