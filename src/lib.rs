//! # Storefront
//!
//! A small beverage storefront: product catalog, orders, and checkout through either a
//! simulated M-Pesa prompt or a card payment intent confirmed later by webhook.
//!
//! ## Design
//!
//! Every store is a resource-oriented actor. A single generic
//! [`ResourceActor<T>`](framework::ResourceActor) owns the products, orders or users in
//! its own Tokio task and handles one request at a time, so per-order status updates
//! serialize without locks. The rest of the application only sees cloneable clients.
//!
//! ### Order lifecycle
//!
//! ```text
//!            ┌──── mpesa settled / webhook succeeded ───▶ paid
//! pending ───┤
//!            └──── webhook payment_failed ─────────────▶ failed
//! ```
//!
//! `paid` and `failed` are terminal. A late or repeated notification is reported as
//! [`Transition::Unchanged`](model::Transition) or `Ignored` and never changes the
//! order.
//!
//! ## Module Tour
//!
//! - [`framework`]: the generic actor, client, entity trait and test mocks.
//! - [`model`]: products, orders, users and the status state machine.
//! - [`catalog_actor`], [`order_actor`], [`user_actor`]: entity implementations.
//!   The order actor receives a [`CatalogClient`](clients::CatalogClient) as its
//!   context and checks every line item against the live catalog on creation.
//! - [`clients`]: domain clients that turn framework failures back into domain errors.
//! - [`payments`]: [`PaymentCoordinator`](payments::PaymentCoordinator), the card
//!   processor and mobile-money gateway seams, and the
//!   [`WebhookHandler`](payments::WebhookHandler).
//! - [`http`]: the axum router.
//! - [`config`] and [`lifecycle`]: environment configuration, actor startup and
//!   shutdown, tracing setup.
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=info cargo run
//! STRIPE_SECRET_KEY=sk_test_... STRIPE_PUBLISHABLE_KEY=pk_test_... cargo run
//! ```

pub mod catalog_actor;
pub mod clients;
pub mod config;
pub mod framework;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod payments;
pub mod user_actor;
