use crate::clients::{CatalogClient, OrderClient, UserClient};
use crate::config::StorefrontConfig;
use crate::lifecycle::StorefrontSystem;
use crate::payments::{CardCapability, MobileMoneyGateway, PaymentCoordinator, WebhookHandler};
use std::sync::Arc;

/// Shared state for every handler. Cloning is cheap: clients are channel senders and
/// the payment services are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogClient,
    pub orders: OrderClient,
    pub users: UserClient,
    pub payments: Arc<PaymentCoordinator>,
    pub webhooks: Arc<WebhookHandler>,
    pub publishable_key: Option<String>,
}

impl AppState {
    pub fn new(
        system: &StorefrontSystem,
        card: CardCapability,
        mobile_money: Arc<dyn MobileMoneyGateway>,
        config: &StorefrontConfig,
    ) -> Self {
        let card_enabled = card.is_enabled();
        let payments = PaymentCoordinator::new(
            system.order_client.clone(),
            card,
            mobile_money,
            config.currency.clone(),
            config.provider_timeout,
        );
        let webhooks = WebhookHandler::new(
            system.order_client.clone(),
            card_enabled,
            config.stripe_webhook_secret.clone(),
        );
        Self {
            catalog: system.catalog_client.clone(),
            orders: system.order_client.clone(),
            users: system.user_client.clone(),
            payments: Arc::new(payments),
            webhooks: Arc::new(webhooks),
            publishable_key: config.stripe_publishable_key.clone(),
        }
    }
}
