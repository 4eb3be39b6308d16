//! Error types for the order actor.

use crate::catalog_actor::CatalogError;
use crate::model::ProductId;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// A line item names a product the catalog does not have.
    #[error("Invalid product: {0}")]
    InvalidProduct(ProductId),

    /// A line item's captured unit price differs from the catalog price.
    #[error("Price mismatch for {product}: catalog price is {catalog}, order has {submitted}")]
    PriceMismatch {
        product: ProductId,
        catalog: u32,
        submitted: u32,
    },

    /// A line item names a product that is currently out of stock.
    #[error("Product out of stock: {0}")]
    OutOfStock(ProductId),

    /// The order data provided is invalid.
    #[error("Order validation error: {0}")]
    ValidationError(String),

    /// The catalog could not be consulted while validating the order.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl OrderError {
    /// Whether the caller sent an order that can never be accepted as submitted.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidProduct(_)
                | Self::PriceMismatch { .. }
                | Self::OutOfStock(_)
        )
    }
}
