//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! `RUST_LOG` (default `info`). Module paths are hidden; actor logs carry an
//! `entity_type` field instead, and each HTTP request runs inside an `http.request`
//! span.
//!
//! ```bash
//! RUST_LOG=info cargo run                         # lifecycle and state changes
//! RUST_LOG=debug cargo run                        # request payloads
//! RUST_LOG=storefront::payments=debug cargo run   # one module only
//! ```
//!
//! With `RUST_LOG=info` an M-Pesa checkout reads roughly:
//!
//! ```text
//! INFO http.request: Created entity_type="Order" id=order_1 size=1
//! INFO http.request: Simulated M-Pesa payment settled transaction_id=MP1718...
//! INFO http.request: Updated entity_type="Order" id=order_1
//! INFO http.request: Status changed order_id=order_1 from=pending to=paid
//! ```

use tracing_subscriber::EnvFilter;

pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false) // Don't show module paths - we use entity_type instead
        .compact()
        .init();
}
