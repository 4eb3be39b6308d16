//! [`ActorEntity`] implementation for [`Order`].
//!
//! Creation happens in two phases. `from_create_params` checks the draft on its own
//! (non-empty items, positive quantities and prices, a customer name, and a total equal
//! to the sum of the line items). `on_create` then asks the catalog, injected as the
//! actor context, whether every product exists, is in stock and still has the captured
//! price. Only then is the order stored, always as `pending`.

use super::{OrderAction, OrderError, StatusChange};
use crate::clients::CatalogClient;
use crate::framework::{ActorClient, ActorEntity};
use crate::model::{
    line_items_total, Order, OrderDraft, OrderId, OrderQuery, OrderStatus, OrderUpdate,
    Transition,
};
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderDraft;
    type Update = OrderUpdate;
    type Action = OrderAction;
    type ActionResult = StatusChange;
    type Query = OrderQuery;
    type Context = CatalogClient;
    type Error = OrderError;

    fn from_create_params(id: OrderId, draft: OrderDraft) -> Result<Self, OrderError> {
        if draft.items.is_empty() {
            return Err(OrderError::ValidationError("order has no items".into()));
        }
        if let Some(item) = draft.items.iter().find(|i| i.quantity == 0) {
            return Err(OrderError::ValidationError(format!(
                "quantity for {} must be positive",
                item.product_id
            )));
        }
        if let Some(item) = draft.items.iter().find(|i| i.price == 0) {
            return Err(OrderError::ValidationError(format!(
                "price for {} must be positive",
                item.product_id
            )));
        }
        if draft.customer_name.trim().is_empty() {
            return Err(OrderError::ValidationError(
                "customer name must not be empty".into(),
            ));
        }
        let computed = line_items_total(&draft.items);
        if draft.total != computed {
            return Err(OrderError::ValidationError(format!(
                "total {} does not match line items ({computed})",
                draft.total
            )));
        }

        Ok(Self {
            id,
            items: draft.items,
            total: computed,
            payment_method: draft.payment_method,
            customer_name: draft.customer_name,
            customer_email: draft.customer_email,
            customer_phone: draft.customer_phone,
            status: OrderStatus::Pending,
            payment_intent_id: None,
            user_id: draft.user_id,
            created_at: Utc::now(),
        })
    }

    fn matches(&self, query: &OrderQuery) -> bool {
        match query {
            OrderQuery::ForUser(user_id) => self.user_id == Some(*user_id),
        }
    }

    async fn on_create(&mut self, catalog: &CatalogClient) -> Result<(), OrderError> {
        for item in &self.items {
            debug!(product_id = %item.product_id, "Checking line item against catalog");
            let product = catalog
                .get(item.product_id)
                .await?
                .ok_or(OrderError::InvalidProduct(item.product_id))?;
            if product.price != item.price {
                return Err(OrderError::PriceMismatch {
                    product: item.product_id,
                    catalog: product.price,
                    submitted: item.price,
                });
            }
            if !product.in_stock {
                return Err(OrderError::OutOfStock(item.product_id));
            }
        }
        Ok(())
    }

    async fn on_update(
        &mut self,
        update: OrderUpdate,
        _catalog: &CatalogClient,
    ) -> Result<(), OrderError> {
        if update.payment_reference.trim().is_empty() {
            return Err(OrderError::ValidationError(
                "payment reference must not be empty".into(),
            ));
        }
        self.payment_intent_id = Some(update.payment_reference);
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        _catalog: &CatalogClient,
    ) -> Result<StatusChange, OrderError> {
        match action {
            OrderAction::Transition(next) => {
                let outcome = self.status.transition_to(next);
                if let Transition::Applied { from, to } = outcome {
                    self.status = to;
                    info!(order_id = %self.id, %from, %to, "Status changed");
                }
                Ok(StatusChange {
                    outcome,
                    order: self.clone(),
                })
            }
        }
    }
}
