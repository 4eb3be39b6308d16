//! # User Client
//!
//! High-level API for the user actor.

use crate::framework::{ActorClient, FrameworkError, ResourceClient};
use crate::model::{User, UserCreate, UserId, UserQuery, UserUpdate};
use crate::user_actor::UserError;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the user actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl UserClient {
    pub fn new(inner: ResourceClient<User>) -> Self {
        Self { inner }
    }

    /// Creates a user after checking that the username and email are free.
    ///
    /// The uniqueness check and the insert are separate requests, so two concurrent
    /// registrations of the same name can both succeed.
    #[instrument(skip(self, params), fields(username = %params.username))]
    pub async fn create_user(&self, params: UserCreate) -> Result<UserId, UserError> {
        debug!("Sending request");
        if self.find_by_username(params.username.trim()).await?.is_some() {
            return Err(UserError::AlreadyExists(params.username));
        }
        if self.find_by_email(params.email.trim()).await?.is_some() {
            return Err(UserError::AlreadyExists(params.email));
        }
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        debug!("Sending request");
        self.find(UserQuery::Username(username.to_string())).await
    }

    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        debug!("Sending request");
        self.find(UserQuery::Email(email.to_string())).await
    }

    async fn find(&self, query: UserQuery) -> Result<Option<User>, UserError> {
        let users = self
            .inner
            .list(Some(query))
            .await
            .map_err(Self::map_error)?;
        Ok(users.into_iter().next())
    }

    /// Records the user's customer (and optional subscription) at the card processor.
    #[instrument(skip(self))]
    pub async fn link_payment_customer(
        &self,
        id: UserId,
        customer_id: String,
        subscription_id: Option<String>,
    ) -> Result<User, UserError> {
        debug!("Sending request");
        self.inner
            .update(
                id,
                UserUpdate {
                    payment_customer_id: customer_id,
                    payment_subscription_id: subscription_id,
                },
            )
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<User> for UserClient {
    type Error = UserError;

    fn inner(&self) -> &ResourceClient<User> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<UserError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => UserError::NotFound(id),
            Err(other) => UserError::ActorCommunicationError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::MockClient;

    fn existing() -> User {
        User {
            id: UserId(1),
            username: "njeri".into(),
            email: "njeri@example.com".into(),
            payment_customer_id: None,
            payment_subscription_id: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected() {
        let mut mock = MockClient::<User>::new();
        mock.expect_list().return_ok(vec![existing()]);
        let client = UserClient::new(mock.client());

        let err = client
            .create_user(UserCreate {
                username: "njeri".into(),
                email: "other@example.com".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(err, UserError::AlreadyExists("njeri".into()));
        mock.verify();
    }

    #[tokio::test]
    async fn test_create_checks_both_keys_then_inserts() {
        let mut mock = MockClient::<User>::new();
        mock.expect_list().return_ok(vec![]);
        mock.expect_list().return_ok(vec![]);
        mock.expect_create().return_ok(UserId(2));
        let client = UserClient::new(mock.client());

        let id = client
            .create_user(UserCreate {
                username: "otieno".into(),
                email: "otieno@example.com".into(),
            })
            .await
            .unwrap();

        assert_eq!(id, UserId(2));
        mock.verify();
    }
}
