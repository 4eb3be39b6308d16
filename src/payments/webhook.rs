//! # Webhook Handler
//!
//! Applies the card processor's asynchronous notifications to order status.
//!
//! | event type                      | effect            |
//! |---------------------------------|-------------------|
//! | `payment_intent.succeeded`      | order → `paid`    |
//! | `payment_intent.payment_failed` | order → `failed`  |
//! | anything else                   | acknowledged only |
//!
//! The order comes from `data.object.metadata.orderId`. A missing correlation or an
//! unknown order is logged and still acknowledged, so the provider does not keep
//! redelivering. Redelivery of an event already applied is a no-op because the order
//! actor never moves a terminal order.

use super::card::CARD_UNAVAILABLE;
use super::PaymentError;
use crate::clients::OrderClient;
use crate::model::{OrderId, OrderStatus};
use crate::order_actor::{OrderError, StatusChange};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{debug, info, instrument, warn};

pub const PAYMENT_SUCCEEDED: &str = "payment_intent.succeeded";
pub const PAYMENT_FAILED: &str = "payment_intent.payment_failed";

/// Signed events older than this are rejected.
pub const SIGNATURE_TOLERANCE_SECS: u64 = 300;

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Option<EventData>,
}

#[derive(Debug, Deserialize)]
struct EventData {
    object: EventObject,
}

#[derive(Debug, Deserialize)]
struct EventObject {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    metadata: serde_json::Map<String, serde_json::Value>,
}

impl Envelope {
    /// The correlated order id, accepted as a string (`"7"`) or a number (`7`).
    fn order_id(&self) -> Option<OrderId> {
        let value = self.data.as_ref()?.object.metadata.get("orderId")?;
        let id = match value {
            serde_json::Value::String(s) => s.trim().parse().ok()?,
            serde_json::Value::Number(n) => u32::try_from(n.as_u64()?).ok()?,
            _ => return None,
        };
        Some(OrderId(id))
    }

    fn object_id(&self) -> Option<&str> {
        self.data.as_ref()?.object.id.as_deref()
    }
}

/// Acknowledgement returned to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

/// What a delivered event did.
#[derive(Debug, Clone)]
pub enum WebhookOutcome {
    /// Event type with no effect on orders.
    Ignored { kind: String },
    /// No usable `orderId` in the metadata.
    Uncorrelated,
    /// The correlated order does not exist.
    UnknownOrder(OrderId),
    /// The status change was submitted; see `StatusChange::outcome` for whether it applied.
    Updated(StatusChange),
}

impl WebhookOutcome {
    pub fn ack(&self) -> WebhookAck {
        WebhookAck { received: true }
    }
}

pub struct WebhookHandler {
    orders: OrderClient,
    card_enabled: bool,
    signing_secret: Option<String>,
}

impl WebhookHandler {
    pub fn new(orders: OrderClient, card_enabled: bool, signing_secret: Option<String>) -> Self {
        Self {
            orders,
            card_enabled,
            signing_secret,
        }
    }

    /// Handle one delivery. `signature` is the raw `Stripe-Signature` header, checked
    /// only when a signing secret is configured.
    #[instrument(skip(self, signature, payload), fields(bytes = payload.len()))]
    pub async fn handle(
        &self,
        signature: Option<&str>,
        payload: &[u8],
    ) -> Result<WebhookOutcome, PaymentError> {
        if !self.card_enabled {
            return Err(PaymentError::ServiceUnavailable(CARD_UNAVAILABLE.to_string()));
        }
        if let Some(secret) = &self.signing_secret {
            let header = signature.ok_or_else(|| webhook_error("missing signature"))?;
            if !verify_signature(secret, header, payload, chrono::Utc::now().timestamp()) {
                return Err(webhook_error("invalid signature"));
            }
        }

        let event: Envelope =
            serde_json::from_slice(payload).map_err(|e| webhook_error(&e.to_string()))?;
        debug!(event_id = ?event.id, kind = %event.kind, "Webhook received");

        let status = match event.kind.as_str() {
            PAYMENT_SUCCEEDED => OrderStatus::Paid,
            PAYMENT_FAILED => OrderStatus::Failed,
            _ => {
                debug!(kind = %event.kind, "Ignoring webhook event");
                return Ok(WebhookOutcome::Ignored { kind: event.kind });
            }
        };

        let Some(order_id) = event.order_id() else {
            warn!(
                kind = %event.kind,
                object_id = ?event.object_id(),
                "Webhook has no orderId metadata"
            );
            return Ok(WebhookOutcome::Uncorrelated);
        };

        match self.orders.set_status(order_id, status).await {
            Ok(change) => {
                info!(%order_id, outcome = ?change.outcome, kind = %event.kind, "Webhook applied");
                Ok(WebhookOutcome::Updated(change))
            }
            Err(OrderError::NotFound(_)) => {
                warn!(%order_id, kind = %event.kind, "Webhook references unknown order");
                Ok(WebhookOutcome::UnknownOrder(order_id))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn webhook_error(reason: &str) -> PaymentError {
    PaymentError::InvalidRequest(format!("Webhook error: {reason}"))
}

/// Check a `t=<unix ts>,v1=<hex hmac>` header against `payload`.
///
/// The MAC is HMAC-SHA256 over `"<ts>.<payload>"`. Any one matching `v1` entry is
/// enough; timestamps further than the tolerance from `now` fail.
pub fn verify_signature(secret: &str, header: &str, payload: &[u8], now: i64) -> bool {
    let mut timestamp = None;
    let mut candidates = Vec::new();
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value),
            Some(("v1", value)) => candidates.push(value),
            _ => {}
        }
    }
    let Some(timestamp) = timestamp else {
        return false;
    };
    match timestamp.parse::<i64>() {
        Ok(signed_at) if now.abs_diff(signed_at) <= SIGNATURE_TOLERANCE_SECS => {}
        _ => return false,
    }
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);

    candidates.into_iter().any(|candidate| {
        hex::decode(candidate)
            .map(|expected| mac.clone().verify_slice(&expected).is_ok())
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{create_mock_client, expect_action};
    use crate::framework::MockClient;
    use crate::model::Order;

    fn sign(secret: &str, ts: i64, payload: &[u8]) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("hmac init");
        mac.update(format!("{ts}.").as_bytes());
        mac.update(payload);
        format!("t={ts},v1={}", hex::encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn test_signature_round_trip_and_tamper() {
        let body = br#"{"type":"payment_intent.succeeded"}"#;
        let header = sign("whsec_test", 1_700_000_000, body);
        assert!(verify_signature("whsec_test", &header, body, 1_700_000_010));
        assert!(!verify_signature("whsec_other", &header, body, 1_700_000_010));
        assert!(!verify_signature("whsec_test", &header, b"{}", 1_700_000_010));
        assert!(!verify_signature("whsec_test", &header, body, 1_700_001_000));
        assert!(!verify_signature("whsec_test", "v1=abcd", body, 1_700_000_000));
    }

    #[test]
    fn test_extreme_timestamps_are_rejected() {
        let body = b"{}";
        for ts in [i64::MIN, i64::MAX] {
            let header = format!("t={ts},v1=00");
            assert!(!verify_signature("whsec_test", &header, body, 1_700_000_000));
        }
        assert!(!verify_signature(
            "whsec_test",
            "t=-9223372036854775808,v1=00",
            body,
            i64::MAX
        ));
    }

    #[test]
    fn test_order_id_accepts_string_or_number() {
        let event: Envelope = serde_json::from_value(serde_json::json!({
            "type": PAYMENT_SUCCEEDED,
            "data": {"object": {"id": "pi_1", "metadata": {"orderId": "7"}}}
        }))
        .unwrap();
        assert_eq!(event.order_id(), Some(OrderId(7)));

        let event: Envelope = serde_json::from_value(serde_json::json!({
            "type": PAYMENT_SUCCEEDED,
            "data": {"object": {"metadata": {"orderId": 8}}}
        }))
        .unwrap();
        assert_eq!(event.order_id(), Some(OrderId(8)));

        let event: Envelope = serde_json::from_value(serde_json::json!({
            "type": PAYMENT_SUCCEEDED,
            "data": {"object": {"metadata": {"orderId": "abc"}}}
        }))
        .unwrap();
        assert_eq!(event.order_id(), None);
    }

    #[tokio::test]
    async fn test_disabled_card_rejects_webhooks() {
        let (inner, _receiver) = create_mock_client::<Order>(4);
        let handler = WebhookHandler::new(OrderClient::new(inner), false, None);
        let err = handler.handle(None, b"{}").await.unwrap_err();
        assert!(matches!(err, PaymentError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_invalid_request() {
        let (inner, _receiver) = create_mock_client::<Order>(4);
        let handler = WebhookHandler::new(OrderClient::new(inner), true, None);
        let err = handler.handle(None, b"not json").await.unwrap_err();
        match err {
            PaymentError::InvalidRequest(msg) => assert!(msg.starts_with("Webhook error: ")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unrelated_event_makes_no_request() {
        let mock = MockClient::<Order>::new();
        let handler = WebhookHandler::new(OrderClient::new(mock.client()), true, None);
        let outcome = handler
            .handle(None, br#"{"type":"charge.refunded","data":{"object":{}}}"#)
            .await
            .unwrap();
        assert!(matches!(outcome, WebhookOutcome::Ignored { .. }));
        mock.verify();
    }

    #[tokio::test]
    async fn test_failed_payment_sends_failed_transition() {
        let (inner, mut receiver) = create_mock_client::<Order>(4);
        let handler = WebhookHandler::new(OrderClient::new(inner), true, None);
        let body = br#"{"type":"payment_intent.payment_failed","data":{"object":{"metadata":{"orderId":"3"}}}}"#;

        let task = tokio::spawn(async move { handler.handle(None, body).await });
        let (id, action, respond_to) = expect_action(&mut receiver).await.expect("Expected Action");
        assert_eq!(id, OrderId(3));
        assert!(matches!(
            action,
            crate::order_actor::OrderAction::Transition(OrderStatus::Failed)
        ));
        respond_to
            .send(Err(crate::framework::FrameworkError::NotFound(id.to_string())))
            .unwrap();

        let outcome = task.await.unwrap().unwrap();
        assert!(matches!(outcome, WebhookOutcome::UnknownOrder(OrderId(3))));
    }

    #[tokio::test]
    async fn test_signed_handler_requires_header() {
        let (inner, _receiver) = create_mock_client::<Order>(4);
        let handler = WebhookHandler::new(OrderClient::new(inner), true, Some("whsec_test".into()));
        let err = handler
            .handle(None, br#"{"type":"payment_intent.created"}"#)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("missing signature"));
    }
}
