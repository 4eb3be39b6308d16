use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use storefront::framework::ActorClient;
use storefront::lifecycle::StorefrontSystem;
use storefront::model::{
    Category, LineItem, OrderDraft, OrderStatus, PaymentMethod, ProductId, UserCreate,
};
use storefront::payments::{
    CardCapability, CardPaymentRequest, CardProcessor, IntentRequest, MobileMoneyPaymentRequest,
    PaymentCoordinator, PaymentError, PaymentIntent, SimulatedMpesa, WebhookHandler,
    WebhookOutcome,
};

struct FakeProcessor;

#[async_trait]
impl CardProcessor for FakeProcessor {
    async fn create_intent(&self, request: &IntentRequest) -> Result<PaymentIntent, PaymentError> {
        let id = format!("pi_{}", request.order_id.map(|o| o.0).unwrap_or(0));
        Ok(PaymentIntent {
            client_secret: format!("{id}_secret"),
            id,
        })
    }
}

fn mpesa_draft() -> OrderDraft {
    OrderDraft {
        items: vec![LineItem {
            product_id: ProductId(1),
            quantity: 2,
            price: 150,
        }],
        total: 300,
        payment_method: PaymentMethod::Mpesa,
        customer_name: "Wanjiku".into(),
        customer_email: None,
        customer_phone: Some("0712345678".into()),
        user_id: None,
    }
}

async fn seeded_system() -> StorefrontSystem {
    let system = StorefrontSystem::new(Duration::from_secs(2));
    system.seed_catalog().await.expect("seed catalog");
    system
}

/// Full end-to-end test with all real actors.
#[tokio::test]
async fn test_catalog_is_seeded_and_filterable() {
    let system = seeded_system().await;

    let all = system.catalog_client.list_all().await.unwrap();
    assert_eq!(all.len(), 8);
    assert_eq!(all[0].id, ProductId(1));
    assert_eq!(all[0].name, "Paya Energy Boost");

    let energy = system
        .catalog_client
        .list_by_category(Category::Energy)
        .await
        .unwrap();
    assert_eq!(energy.len(), 3);
    assert!(energy.iter().all(|p| p.category == Category::Energy));

    assert!(system.catalog_client.get(ProductId(99)).await.unwrap().is_none());

    let product = system
        .catalog_client
        .set_in_stock(ProductId(2), false)
        .await
        .unwrap();
    assert!(!product.in_stock);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_mpesa_checkout_marks_order_paid() {
    let system = seeded_system().await;
    let payments = PaymentCoordinator::new(
        system.order_client.clone(),
        CardCapability::Disabled,
        Arc::new(SimulatedMpesa),
        "kes",
        Duration::from_secs(1),
    );

    let order_id = system.order_client.create_order(mpesa_draft()).await.unwrap();
    let order = system.order_client.get(order_id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total, 300);

    let payment = payments
        .pay_with_mobile_money(MobileMoneyPaymentRequest {
            phone_number: Some("0712345678".into()),
            amount: Some(300),
            order_id: Some(order_id),
        })
        .await
        .unwrap();
    assert!(payment.success);
    assert!(payment.transaction_id.starts_with("MP"));

    let order = system.order_client.get(order_id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Paid);
    assert_eq!(order.payment_intent_id, Some(payment.transaction_id));

    // A second payment for the same order is refused.
    let err = payments
        .pay_with_mobile_money(MobileMoneyPaymentRequest {
            phone_number: Some("0712345678".into()),
            amount: Some(300),
            order_id: Some(order_id),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::InvalidRequest(_)));

    drop(payments);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_card_checkout_resolved_by_webhook() {
    let system = seeded_system().await;
    let payments = PaymentCoordinator::new(
        system.order_client.clone(),
        CardCapability::Enabled(Arc::new(FakeProcessor)),
        Arc::new(SimulatedMpesa),
        "kes",
        Duration::from_secs(1),
    );
    let webhooks = WebhookHandler::new(system.order_client.clone(), true, None);

    let mut draft = mpesa_draft();
    draft.payment_method = PaymentMethod::Card;
    let order_id = system.order_client.create_order(draft).await.unwrap();

    let intent = payments
        .create_card_intent(CardPaymentRequest {
            amount: Some(300),
            order_id: Some(order_id),
        })
        .await
        .unwrap();
    assert_eq!(intent.client_secret, "pi_1_secret");

    let order = system.order_client.get(order_id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_intent_id.as_deref(), Some("pi_1"));

    let event = format!(
        r#"{{"id":"evt_1","type":"payment_intent.succeeded","data":{{"object":{{"id":"pi_1","metadata":{{"orderId":"{}"}}}}}}}}"#,
        order_id.0
    );
    let first = webhooks.handle(None, event.as_bytes()).await.unwrap();
    assert!(matches!(first, WebhookOutcome::Updated(ref change) if change.applied()));

    // Redelivery is harmless.
    let second = webhooks.handle(None, event.as_bytes()).await.unwrap();
    assert!(matches!(second, WebhookOutcome::Updated(ref change) if !change.applied()));

    let failed = event.replace("payment_intent.succeeded", "payment_intent.payment_failed");
    webhooks.handle(None, failed.as_bytes()).await.unwrap();

    let order = system.order_client.get(order_id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Paid);

    drop(payments);
    drop(webhooks);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_webhook_for_unknown_order_is_acknowledged() {
    let system = seeded_system().await;
    let webhooks = WebhookHandler::new(system.order_client.clone(), true, None);

    let outcome = webhooks
        .handle(
            None,
            br#"{"type":"payment_intent.succeeded","data":{"object":{"metadata":{"orderId":"77"}}}}"#,
        )
        .await
        .unwrap();
    assert!(matches!(outcome, WebhookOutcome::UnknownOrder(_)));
    assert!(outcome.ack().received);

    let outcome = webhooks
        .handle(None, br#"{"type":"payment_intent.succeeded","data":{"object":{}}}"#)
        .await
        .unwrap();
    assert!(matches!(outcome, WebhookOutcome::Uncorrelated));

    drop(webhooks);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_users_and_their_orders() {
    let system = seeded_system().await;

    let user_id = system
        .user_client
        .create_user(UserCreate {
            username: "amani".into(),
            email: "amani@example.com".into(),
        })
        .await
        .expect("Failed to create user");

    let found = system
        .user_client
        .find_by_email("AMANI@example.com")
        .await
        .unwrap()
        .expect("User not found");
    assert_eq!(found.id, user_id);

    let linked = system
        .user_client
        .link_payment_customer(user_id, "cus_123".into(), None)
        .await
        .unwrap();
    assert_eq!(linked.payment_customer_id.as_deref(), Some("cus_123"));

    let mut draft = mpesa_draft();
    draft.user_id = Some(user_id);
    let order_id = system.order_client.create_order(draft).await.unwrap();
    system.order_client.create_order(mpesa_draft()).await.unwrap();

    let orders = system.order_client.orders_for_user(user_id).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, order_id);

    system.shutdown().await.unwrap();
}
