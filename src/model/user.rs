use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u32);

impl From<u32> for UserId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user_{}", self.0)
    }
}

/// A registered shopper. Orders do not require one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// Customer record at the card processor, once linked.
    pub payment_customer_id: Option<String>,
    pub payment_subscription_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
}

/// Links the user to a card-processor customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserUpdate {
    pub payment_customer_id: String,
    pub payment_subscription_id: Option<String>,
}

#[derive(Debug, Clone)]
pub enum UserQuery {
    Username(String),
    Email(String),
}
