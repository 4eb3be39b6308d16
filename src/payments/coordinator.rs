//! # Payment Coordinator
//!
//! Drives an order through payment for both methods:
//!
//! - **Card**: create an intent for the order total, record the intent id against the
//!   order and return the client secret. The order stays `pending` until the webhook
//!   reports the outcome.
//! - **Mobile money**: dispatch a prompt through the gateway and record its transaction
//!   id. A settled receipt marks the order `paid` in the same request.
//!
//! Every provider call is bounded by `provider_timeout`.

use super::card::{CardCapability, IntentRequest};
use super::mpesa::{MobileMoneyGateway, MobileMoneyRequest};
use super::PaymentError;
use crate::clients::OrderClient;
use crate::framework::ActorClient;
use crate::model::{Order, OrderId, OrderStatus};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Body of a card intent request. Fields are optional so that missing values get the
/// same message as invalid ones.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPaymentRequest {
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub order_id: Option<OrderId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardIntent {
    pub client_secret: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileMoneyPaymentRequest {
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub order_id: Option<OrderId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileMoneyPayment {
    pub success: bool,
    pub transaction_id: String,
    pub message: String,
}

const SETTLED_MESSAGE: &str =
    "Payment successful. You will receive an M-Pesa confirmation SMS shortly.";
const PROMPTED_MESSAGE: &str =
    "Payment request sent. Confirm the prompt on your phone to complete payment.";

pub struct PaymentCoordinator {
    orders: OrderClient,
    card: CardCapability,
    mobile_money: Arc<dyn MobileMoneyGateway>,
    currency: String,
    provider_timeout: Duration,
}

impl PaymentCoordinator {
    pub fn new(
        orders: OrderClient,
        card: CardCapability,
        mobile_money: Arc<dyn MobileMoneyGateway>,
        currency: impl Into<String>,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            orders,
            card,
            mobile_money,
            currency: currency.into(),
            provider_timeout,
        }
    }

    pub fn card_enabled(&self) -> bool {
        self.card.is_enabled()
    }

    #[instrument(skip(self))]
    pub async fn create_card_intent(
        &self,
        request: CardPaymentRequest,
    ) -> Result<CardIntent, PaymentError> {
        let processor = self.card.processor()?;
        let amount = positive(request.amount)
            .ok_or_else(|| PaymentError::InvalidRequest("Invalid amount".into()))?;
        if let Some(order_id) = request.order_id {
            self.payable_order(order_id, amount).await?;
        }

        let amount_minor = amount
            .checked_mul(100)
            .ok_or_else(|| PaymentError::InvalidRequest("Invalid amount".into()))?;
        let intent_request = IntentRequest {
            amount_minor,
            currency: self.currency.clone(),
            order_id: request.order_id,
            idempotency_key: Uuid::new_v4().to_string(),
        };
        let intent = self
            .bounded(processor.create_intent(&intent_request))
            .await?;

        if let Some(order_id) = request.order_id {
            self.orders
                .set_payment_reference(order_id, intent.id.clone())
                .await?;
        }
        info!(intent_id = %intent.id, amount_minor, "Payment intent created");
        Ok(CardIntent {
            client_secret: intent.client_secret,
        })
    }

    #[instrument(skip(self))]
    pub async fn pay_with_mobile_money(
        &self,
        request: MobileMoneyPaymentRequest,
    ) -> Result<MobileMoneyPayment, PaymentError> {
        let invalid = || PaymentError::InvalidRequest("Invalid phone number or amount".into());
        let phone_number = request
            .phone_number
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .ok_or_else(invalid)?;
        let amount = positive(request.amount).ok_or_else(invalid)?;
        if let Some(order_id) = request.order_id {
            self.payable_order(order_id, amount).await?;
        }

        let receipt = self
            .bounded(self.mobile_money.dispatch(&MobileMoneyRequest {
                phone_number,
                amount,
                order_id: request.order_id,
            }))
            .await?;

        if let Some(order_id) = request.order_id {
            self.orders
                .set_payment_reference(order_id, receipt.transaction_id.clone())
                .await?;
            if receipt.settled {
                let change = self.orders.set_status(order_id, OrderStatus::Paid).await?;
                info!(%order_id, outcome = ?change.outcome, "Mobile money settled");
            }
        }

        Ok(MobileMoneyPayment {
            success: true,
            message: if receipt.settled {
                SETTLED_MESSAGE
            } else {
                PROMPTED_MESSAGE
            }
            .to_string(),
            transaction_id: receipt.transaction_id,
        })
    }

    /// The order must exist, still be awaiting payment and total exactly `amount`.
    async fn payable_order(&self, order_id: OrderId, amount: u64) -> Result<Order, PaymentError> {
        let order = self
            .orders
            .get(order_id)
            .await?
            .ok_or_else(|| PaymentError::NotFound("Order not found".into()))?;
        if order.status.is_terminal() {
            warn!(%order_id, status = %order.status, "Payment requested for settled order");
            return Err(PaymentError::InvalidRequest(format!(
                "Order is already {}",
                order.status
            )));
        }
        if order.total != amount {
            return Err(PaymentError::InvalidRequest(format!(
                "Amount {amount} does not match order total {}",
                order.total
            )));
        }
        Ok(order)
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, PaymentError>>,
    ) -> Result<T, PaymentError> {
        tokio::time::timeout(self.provider_timeout, call)
            .await
            .map_err(|_| {
                PaymentError::Provider(format!(
                    "payment provider did not respond within {:?}",
                    self.provider_timeout
                ))
            })?
    }
}

fn positive(amount: Option<i64>) -> Option<u64> {
    amount.filter(|a| *a > 0).map(|a| a as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::MockClient;
    use crate::model::{LineItem, PaymentMethod, ProductId, Transition};
    use crate::order_actor::StatusChange;
    use crate::payments::{
        CardProcessor, IntentRequest, MobileMoneyReceipt, PaymentIntent, SimulatedMpesa,
        CARD_UNAVAILABLE,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingProcessor {
        seen: Mutex<Vec<IntentRequest>>,
    }

    #[async_trait]
    impl CardProcessor for RecordingProcessor {
        async fn create_intent(
            &self,
            request: &IntentRequest,
        ) -> Result<PaymentIntent, PaymentError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(PaymentIntent {
                id: "pi_test_1".into(),
                client_secret: "pi_test_1_secret_abc".into(),
            })
        }
    }

    struct StalledGateway;

    #[async_trait]
    impl MobileMoneyGateway for StalledGateway {
        async fn dispatch(
            &self,
            _request: &MobileMoneyRequest,
        ) -> Result<MobileMoneyReceipt, PaymentError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Err(PaymentError::Provider("unreachable".into()))
        }
    }

    fn pending_order(total: u64) -> Order {
        Order {
            id: OrderId(1),
            items: vec![LineItem {
                product_id: ProductId(1),
                quantity: 2,
                price: 150,
            }],
            total,
            payment_method: PaymentMethod::Mpesa,
            customer_name: "Wanjiku".into(),
            customer_email: None,
            customer_phone: Some("0712345678".into()),
            status: OrderStatus::Pending,
            payment_intent_id: None,
            user_id: None,
            created_at: chrono::Utc::now(),
        }
    }

    fn coordinator(
        mock: &MockClient<Order>,
        card: CardCapability,
        gateway: Arc<dyn MobileMoneyGateway>,
    ) -> PaymentCoordinator {
        PaymentCoordinator::new(
            OrderClient::new(mock.client()),
            card,
            gateway,
            "kes",
            Duration::from_millis(100),
        )
    }

    #[tokio::test]
    async fn test_disabled_card_checked_before_amount() {
        let mock = MockClient::<Order>::new();
        let payments = coordinator(&mock, CardCapability::Disabled, Arc::new(SimulatedMpesa));

        let err = payments
            .create_card_intent(CardPaymentRequest {
                amount: Some(0),
                order_id: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::ServiceUnavailable(_)));
        assert_eq!(err.to_string(), CARD_UNAVAILABLE);
        mock.verify();
    }

    #[tokio::test]
    async fn test_zero_amount_is_invalid() {
        let mock = MockClient::<Order>::new();
        let processor = Arc::new(RecordingProcessor::default());
        let payments = coordinator(
            &mock,
            CardCapability::Enabled(processor.clone()),
            Arc::new(SimulatedMpesa),
        );

        let err = payments
            .create_card_intent(CardPaymentRequest {
                amount: Some(0),
                order_id: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid amount");
        assert!(processor.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_card_intent_records_reference() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_get(OrderId(1)).return_ok(Some(pending_order(300)));
        let mut referenced = pending_order(300);
        referenced.payment_intent_id = Some("pi_test_1".into());
        mock.expect_update(OrderId(1)).return_ok(referenced);

        let processor = Arc::new(RecordingProcessor::default());
        let payments = coordinator(
            &mock,
            CardCapability::Enabled(processor.clone()),
            Arc::new(SimulatedMpesa),
        );

        let intent = payments
            .create_card_intent(CardPaymentRequest {
                amount: Some(300),
                order_id: Some(OrderId(1)),
            })
            .await
            .unwrap();

        assert_eq!(intent.client_secret, "pi_test_1_secret_abc");
        let seen = processor.seen.lock().unwrap();
        assert_eq!(seen[0].amount_minor, 30_000);
        assert_eq!(seen[0].currency, "kes");
        assert_eq!(seen[0].order_id, Some(OrderId(1)));
        mock.verify();
    }

    #[tokio::test]
    async fn test_amount_must_match_order_total() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_get(OrderId(1)).return_ok(Some(pending_order(300)));
        let payments = coordinator(&mock, CardCapability::Disabled, Arc::new(SimulatedMpesa));

        let err = payments
            .pay_with_mobile_money(MobileMoneyPaymentRequest {
                phone_number: Some("0712345678".into()),
                amount: Some(250),
                order_id: Some(OrderId(1)),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::InvalidRequest(_)));
        mock.verify();
    }

    #[tokio::test]
    async fn test_settled_mobile_money_marks_order_paid() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_get(OrderId(1)).return_ok(Some(pending_order(300)));
        mock.expect_update(OrderId(1)).return_ok(pending_order(300));
        let mut paid = pending_order(300);
        paid.status = OrderStatus::Paid;
        mock.expect_action(OrderId(1)).return_ok(StatusChange {
            outcome: Transition::Applied {
                from: OrderStatus::Pending,
                to: OrderStatus::Paid,
            },
            order: paid,
        });
        let payments = coordinator(&mock, CardCapability::Disabled, Arc::new(SimulatedMpesa));

        let payment = payments
            .pay_with_mobile_money(MobileMoneyPaymentRequest {
                phone_number: Some("0712345678".into()),
                amount: Some(300),
                order_id: Some(OrderId(1)),
            })
            .await
            .unwrap();

        assert!(payment.success);
        assert!(payment.transaction_id.starts_with("MP"));
        assert_eq!(payment.message, SETTLED_MESSAGE);
        mock.verify();
    }

    #[tokio::test]
    async fn test_blank_phone_is_invalid() {
        let mock = MockClient::<Order>::new();
        let payments = coordinator(&mock, CardCapability::Disabled, Arc::new(SimulatedMpesa));

        let err = payments
            .pay_with_mobile_money(MobileMoneyPaymentRequest {
                phone_number: Some("  ".into()),
                amount: Some(300),
                order_id: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid phone number or amount");
    }

    #[tokio::test]
    async fn test_stalled_gateway_times_out() {
        let mock = MockClient::<Order>::new();
        let payments = coordinator(&mock, CardCapability::Disabled, Arc::new(StalledGateway));

        let err = payments
            .pay_with_mobile_money(MobileMoneyPaymentRequest {
                phone_number: Some("0712345678".into()),
                amount: Some(100),
                order_id: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::Provider(_)));
    }
}
