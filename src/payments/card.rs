//! Card payment intents.
//!
//! A card payment is two-phase: the server asks the processor for an intent and hands
//! the client secret to the browser, and the final outcome arrives later as a webhook.

use super::stripe::StripeProcessor;
use super::PaymentError;
use crate::config::StorefrontConfig;
use crate::model::OrderId;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Shown when a card payment is requested but no processor is configured.
pub const CARD_UNAVAILABLE: &str =
    "Card payments are not configured. Provide STRIPE_SECRET_KEY or pay with M-Pesa.";

/// What the processor is asked to create.
#[derive(Debug, Clone, PartialEq)]
pub struct IntentRequest {
    /// Amount in the currency's minor unit.
    pub amount_minor: u64,
    pub currency: String,
    /// Correlation carried back in webhook metadata.
    pub order_id: Option<OrderId>,
    /// Sent unchanged on every retry of this request.
    pub idempotency_key: String,
}

/// A created intent.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

/// A card-network processor able to create payment intents.
#[async_trait]
pub trait CardProcessor: Send + Sync {
    async fn create_intent(&self, request: &IntentRequest) -> Result<PaymentIntent, PaymentError>;
}

/// Whether card payments are available, decided once at startup.
#[derive(Clone)]
pub enum CardCapability {
    Enabled(Arc<dyn CardProcessor>),
    Disabled,
}

impl CardCapability {
    /// Enabled with a [`StripeProcessor`] when a secret key is configured.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, PaymentError> {
        let Some(secret_key) = &config.stripe_secret_key else {
            warn!("STRIPE_SECRET_KEY not set, card payments disabled");
            return Ok(Self::Disabled);
        };
        let processor = StripeProcessor::new(
            config.stripe_api_base.clone(),
            secret_key.clone(),
            config.provider_retry.clone(),
            config
                .provider_retry
                .attempt_timeout(config.provider_timeout),
        )?;
        info!(api_base = %config.stripe_api_base, "Card payments enabled");
        Ok(Self::Enabled(Arc::new(processor)))
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }

    /// The processor, or `ServiceUnavailable` when card payments are off.
    pub fn processor(&self) -> Result<&Arc<dyn CardProcessor>, PaymentError> {
        match self {
            Self::Enabled(processor) => Ok(processor),
            Self::Disabled => Err(PaymentError::ServiceUnavailable(CARD_UNAVAILABLE.to_string())),
        }
    }
}

impl std::fmt::Debug for CardCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enabled(_) => f.write_str("Enabled"),
            Self::Disabled => f.write_str("Disabled"),
        }
    }
}
