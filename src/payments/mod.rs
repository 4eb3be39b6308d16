//! Payment coordination for card and mobile-money payments, and the webhook handler
//! that resolves card payments asynchronously.

pub mod card;
pub mod coordinator;
pub mod error;
pub mod mpesa;
pub mod retry;
pub mod stripe;
pub mod webhook;

pub use card::{CardCapability, CardProcessor, IntentRequest, PaymentIntent, CARD_UNAVAILABLE};
pub use coordinator::{
    CardIntent, CardPaymentRequest, MobileMoneyPayment, MobileMoneyPaymentRequest,
    PaymentCoordinator,
};
pub use error::PaymentError;
pub use mpesa::{MobileMoneyGateway, MobileMoneyReceipt, MobileMoneyRequest, SimulatedMpesa};
pub use retry::RetryPolicy;
pub use stripe::StripeProcessor;
pub use webhook::{verify_signature, WebhookAck, WebhookHandler, WebhookOutcome};
