//! JSON-over-HTTP surface built on axum.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/products", get(handlers::list_products))
        .route(
            "/products/category/:category",
            get(handlers::products_by_category),
        )
        .route("/products/:id", get(handlers::get_product))
        .route("/orders", post(handlers::create_order))
        .route("/orders/:id", get(handlers::get_order))
        .route("/payment-intent", post(handlers::create_payment_intent))
        .route(
            "/create-payment-intent",
            post(handlers::create_payment_intent),
        )
        .route("/mpesa-payment", post(handlers::mpesa_payment))
        .route("/payment-webhook", post(handlers::payment_webhook))
        .route("/stripe-webhook", post(handlers::payment_webhook))
        .route("/payment-config", get(handlers::payment_config))
        .route("/users", post(handlers::create_user))
        .route("/users/:id", get(handlers::get_user))
        .route("/users/:id/orders", get(handlers::user_orders))
        .layer(from_fn(middleware::request_tracing_middleware))
        .with_state(state)
}
