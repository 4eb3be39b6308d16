//! Type-safe wrappers around [`ResourceClient`](crate::framework::ResourceClient).
//!
//! Each client recovers its actor's own error type from
//! [`FrameworkError`](crate::framework::FrameworkError), so callers match on
//! `OrderError::PriceMismatch` rather than on strings.

pub mod catalog_client;
pub mod order_client;
pub mod user_client;

pub use catalog_client::*;
pub use order_client::*;
pub use user_client::*;
