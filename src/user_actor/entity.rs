//! [`ActorEntity`] implementation for [`User`].

use super::UserError;
use crate::framework::ActorEntity;
use crate::model::{User, UserCreate, UserId, UserQuery, UserUpdate};
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
impl ActorEntity for User {
    type Id = UserId;
    type Create = UserCreate;
    type Update = UserUpdate;
    type Action = ();
    type ActionResult = ();
    type Query = UserQuery;
    type Context = ();
    type Error = UserError;

    fn from_create_params(id: UserId, params: UserCreate) -> Result<Self, UserError> {
        let username = params.username.trim().to_string();
        let email = params.email.trim().to_string();
        if username.is_empty() {
            return Err(UserError::ValidationError("username must not be empty".into()));
        }
        if !email.contains('@') {
            return Err(UserError::ValidationError(format!("invalid email: {email}")));
        }
        Ok(Self {
            id,
            username,
            email,
            payment_customer_id: None,
            payment_subscription_id: None,
            created_at: Utc::now(),
        })
    }

    fn matches(&self, query: &UserQuery) -> bool {
        match query {
            UserQuery::Username(name) => self.username == *name,
            UserQuery::Email(email) => self.email.eq_ignore_ascii_case(email),
        }
    }

    /// Links the card-processor customer. A later link replaces the earlier one.
    async fn on_update(&mut self, update: UserUpdate, _ctx: &()) -> Result<(), UserError> {
        if update.payment_customer_id.trim().is_empty() {
            return Err(UserError::ValidationError(
                "payment customer id must not be empty".into(),
            ));
        }
        self.payment_customer_id = Some(update.payment_customer_id);
        self.payment_subscription_id = update.payment_subscription_id;
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), UserError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(username: &str, email: &str) -> Result<User, UserError> {
        User::from_create_params(
            UserId(1),
            UserCreate {
                username: username.into(),
                email: email.into(),
            },
        )
    }

    #[test]
    fn test_email_needs_at_sign() {
        assert!(matches!(
            create("kamau", "kamau.example.com"),
            Err(UserError::ValidationError(_))
        ));
        assert!(create("kamau", "kamau@example.com").is_ok());
    }

    #[test]
    fn test_email_query_ignores_case() {
        let user = create("kamau", "Kamau@Example.com").unwrap();
        assert!(user.matches(&UserQuery::Email("kamau@example.com".into())));
        assert!(!user.matches(&UserQuery::Username("Kamau".into())));
    }
}
