//! Startup, wiring and shutdown of the store actors, plus logging setup.

mod storefront_system;
pub mod tracing;

pub use self::tracing::setup_tracing;
pub use storefront_system::StorefrontSystem;
