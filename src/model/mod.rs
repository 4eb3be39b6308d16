//! Plain data types stored by the actors and exchanged over HTTP.

pub mod order;
pub mod product;
pub mod user;

pub use order::*;
pub use product::*;
pub use user::*;
