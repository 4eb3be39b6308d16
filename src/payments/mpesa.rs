//! Mobile-money (M-Pesa) payments.
//!
//! [`SimulatedMpesa`] stands in for a real STK-push integration: it issues a
//! transaction id and reports the payment as settled straight away. A real gateway
//! would return `settled: false` and confirm through a callback.

use super::PaymentError;
use crate::model::OrderId;
use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct MobileMoneyRequest {
    pub phone_number: String,
    pub amount: u64,
    pub order_id: Option<OrderId>,
}

/// The gateway's answer to a payment prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct MobileMoneyReceipt {
    pub transaction_id: String,
    /// `true` when the funds are already confirmed.
    pub settled: bool,
}

#[async_trait]
pub trait MobileMoneyGateway: Send + Sync {
    async fn dispatch(
        &self,
        request: &MobileMoneyRequest,
    ) -> Result<MobileMoneyReceipt, PaymentError>;
}

/// Settles every request immediately. No external call is made.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedMpesa;

#[async_trait]
impl MobileMoneyGateway for SimulatedMpesa {
    async fn dispatch(
        &self,
        request: &MobileMoneyRequest,
    ) -> Result<MobileMoneyReceipt, PaymentError> {
        let transaction_id = transaction_id();
        info!(
            %transaction_id,
            amount = request.amount,
            order_id = ?request.order_id,
            "Simulated M-Pesa payment settled"
        );
        Ok(MobileMoneyReceipt {
            transaction_id,
            settled: true,
        })
    }
}

/// `MP` + unix millis + nine lowercase base36 characters.
fn transaction_id() -> String {
    const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut entropy = Uuid::new_v4().as_u128();
    let mut suffix = String::with_capacity(9);
    for _ in 0..9 {
        suffix.push(ALPHABET[(entropy % 36) as usize] as char);
        entropy /= 36;
    }
    format!("MP{}{suffix}", Utc::now().timestamp_millis())
}
