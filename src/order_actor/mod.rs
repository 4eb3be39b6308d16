//! Order actor: validated creation, payment references and status transitions.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::OrderClient;
use crate::framework::ResourceActor;
use crate::model::Order;
use std::time::Duration;

/// Creates a new order actor and its client.
///
/// The actor must be run with a [`CatalogClient`](crate::clients::CatalogClient) as its
/// context.
pub fn new(timeout: Duration) -> (ResourceActor<Order>, OrderClient) {
    let (actor, generic_client) = ResourceActor::with_timeout(32, timeout);
    let client = OrderClient::new(generic_client);

    (actor, client)
}
