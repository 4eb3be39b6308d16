//! Catalog actor: product listing, lookup and stock flags.

pub mod entity;
pub mod error;
pub mod seed;

pub use error::*;
pub use seed::seed_products;

use crate::clients::CatalogClient;
use crate::framework::ResourceActor;
use crate::model::Product;
use std::time::Duration;

/// Creates a new catalog actor and its client.
pub fn new(timeout: Duration) -> (ResourceActor<Product>, CatalogClient) {
    let (actor, generic_client) = ResourceActor::with_timeout(32, timeout);
    let client = CatalogClient::new(generic_client);

    (actor, client)
}
