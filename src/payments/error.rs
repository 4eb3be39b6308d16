//! Error types for payment coordination and webhook handling.

use crate::order_actor::OrderError;
use thiserror::Error;

/// Errors that can occur while taking a payment or applying a provider notification.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Malformed or missing input. The message is shown to the caller.
    #[error("{0}")]
    InvalidRequest(String),

    /// The referenced order does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The payment method needs a provider that is not configured.
    #[error("{0}")]
    ServiceUnavailable(String),

    /// The provider call failed or did not answer in time.
    #[error("{0}")]
    Provider(String),

    /// The order store failed.
    #[error(transparent)]
    Store(#[from] OrderError),
}
