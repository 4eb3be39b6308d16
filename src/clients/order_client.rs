//! # Order Client
//!
//! High-level API for the order actor. Catalog checks for new orders run inside the
//! actor's `on_create` hook, so `create_order` is a single request.

use crate::framework::{ActorClient, FrameworkError, ResourceClient};
use crate::model::{Order, OrderDraft, OrderId, OrderQuery, OrderStatus, OrderUpdate, UserId};
use crate::order_actor::{OrderAction, OrderError, StatusChange};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Client for interacting with the order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, draft), fields(items = draft.items.len(), total = draft.total))]
    pub async fn create_order(&self, draft: OrderDraft) -> Result<OrderId, OrderError> {
        debug!(?draft, "create_order called");
        info!("Sending create_order to actor");
        self.inner.create(draft).await.map_err(Self::map_error)
    }

    /// Request a status change. Terminal orders are left alone and reported as
    /// [`Transition::Ignored`](crate::model::Transition::Ignored), not as an error.
    #[instrument(skip(self))]
    pub async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<StatusChange, OrderError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, OrderAction::Transition(status))
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn set_payment_reference(
        &self,
        id: OrderId,
        reference: String,
    ) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner
            .update(
                id,
                OrderUpdate {
                    payment_reference: reference,
                },
            )
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, OrderError> {
        debug!("Sending request");
        self.inner
            .list(Some(OrderQuery::ForUser(user_id)))
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<OrderError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => OrderError::NotFound(id),
            Err(other) => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{create_mock_client, expect_action};
    use crate::framework::ResourceRequest;
    use crate::model::ProductId;
    use std::time::Duration;

    #[tokio::test]
    async fn test_set_status_sends_transition() {
        let (inner, mut receiver) = create_mock_client::<Order>(10);
        let client = OrderClient::new(inner);

        let task =
            tokio::spawn(async move { client.set_status(OrderId(4), OrderStatus::Paid).await });

        let (id, action, respond_to) = expect_action(&mut receiver).await.expect("Expected Action");
        assert_eq!(id, OrderId(4));
        assert!(matches!(action, OrderAction::Transition(OrderStatus::Paid)));
        drop(respond_to);

        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, OrderError::ActorCommunicationError(_)));
    }

    #[tokio::test]
    async fn test_entity_error_is_recovered() {
        let (inner, mut receiver) = create_mock_client::<Order>(10);
        let client = OrderClient::new(inner);

        let task = tokio::spawn(async move {
            client
                .set_payment_reference(OrderId(1), "pi_123".into())
                .await
        });

        let Some(ResourceRequest::Update { respond_to, .. }) = receiver.recv().await else {
            panic!("Expected Update request");
        };
        let rejected = OrderError::InvalidProduct(ProductId(9));
        respond_to
            .send(Err(FrameworkError::EntityError(Box::new(rejected.clone()))))
            .unwrap();

        assert_eq!(task.await.unwrap().unwrap_err(), rejected);
    }

    #[tokio::test]
    async fn test_timeout_maps_to_communication_error() {
        let (inner, _receiver) = create_mock_client::<Order>(10);
        let client = OrderClient::new(inner.with_timeout(Duration::from_millis(20)));

        let err = client.get(OrderId(1)).await.unwrap_err();
        assert!(matches!(err, OrderError::ActorCommunicationError(_)));
    }
}
