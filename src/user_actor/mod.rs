//! User actor: registered shoppers and their card-processor customer links.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::UserClient;
use crate::framework::ResourceActor;
use crate::model::User;
use std::time::Duration;

/// Creates a new user actor and its client.
pub fn new(timeout: Duration) -> (ResourceActor<User>, UserClient) {
    let (actor, generic_client) = ResourceActor::with_timeout(32, timeout);
    let client = UserClient::new(generic_client);

    (actor, client)
}
