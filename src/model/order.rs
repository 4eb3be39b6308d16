//! Orders and the payment status state machine.
//!
//! An order starts `pending` and ends in exactly one of the terminal states `paid` or
//! `failed`. [`OrderStatus::transition_to`] is the single place that decides whether a
//! requested status change is applied; the order actor calls it while holding the only
//! copy of the order, so the rule holds under concurrent updates.

use crate::model::{ProductId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Mpesa,
    Card,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Failed,
}

/// What happened to a requested status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The status moved from `from` to `to`.
    Applied { from: OrderStatus, to: OrderStatus },
    /// The order already had the requested status.
    Unchanged,
    /// The change is not allowed from `current`; the order is left as it was.
    Ignored { current: OrderStatus },
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Paid | Self::Failed)
    }

    /// Decide the outcome of moving from `self` to `next`.
    ///
    /// Only `pending -> paid` and `pending -> failed` are applied. Re-applying the
    /// current status is `Unchanged`, which makes redelivered notifications harmless.
    pub fn transition_to(self, next: OrderStatus) -> Transition {
        if self == next {
            Transition::Unchanged
        } else if self == Self::Pending && next.is_terminal() {
            Transition::Applied {
                from: self,
                to: next,
            }
        } else {
            Transition::Ignored { current: self }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One purchased product. `price` is the unit price captured when the order was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: u32,
}

impl LineItem {
    pub fn subtotal(&self) -> u64 {
        u64::from(self.price) * u64::from(self.quantity)
    }
}

/// Sum of price × quantity over `items`.
pub fn line_items_total(items: &[LineItem]) -> u64 {
    items.iter().map(LineItem::subtotal).sum()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<LineItem>,
    pub total: u64,
    pub payment_method: PaymentMethod,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub status: OrderStatus,
    /// Card payment-intent id or mobile-money transaction id.
    pub payment_intent_id: Option<String>,
    pub user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

/// What a caller submits to place an order. Unknown fields (such as a client-sent
/// `status`) are ignored; every order starts `pending`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub items: Vec<LineItem>,
    pub total: u64,
    pub payment_method: PaymentMethod,
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub user_id: Option<UserId>,
}

/// Records the payment reference issued by a provider.
#[derive(Debug, Clone)]
pub struct OrderUpdate {
    pub payment_reference: String,
}

#[derive(Debug, Clone)]
pub enum OrderQuery {
    ForUser(UserId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn test_pending_moves_to_either_terminal_state() {
        assert_eq!(
            Pending.transition_to(Paid),
            Transition::Applied {
                from: Pending,
                to: Paid,
            }
        );
        assert_eq!(
            Pending.transition_to(Failed),
            Transition::Applied {
                from: Pending,
                to: Failed,
            }
        );
    }

    #[test]
    fn test_terminal_states_never_move() {
        for current in [Paid, Failed] {
            for next in [Pending, Paid, Failed] {
                let outcome = current.transition_to(next);
                if current == next {
                    assert_eq!(outcome, Transition::Unchanged);
                } else {
                    assert_eq!(outcome, Transition::Ignored { current });
                }
            }
        }
    }

    #[test]
    fn test_line_items_total() {
        let items = vec![
            LineItem {
                product_id: ProductId(1),
                quantity: 2,
                price: 150,
            },
            LineItem {
                product_id: ProductId(4),
                quantity: 1,
                price: 120,
            },
        ];
        assert_eq!(line_items_total(&items), 420);
        assert_eq!(line_items_total(&[]), 0);
    }

    #[test]
    fn test_draft_ignores_client_status() {
        let draft: OrderDraft = serde_json::from_value(serde_json::json!({
            "items": [{"productId": 1, "quantity": 2, "price": 150}],
            "total": 300,
            "paymentMethod": "mpesa",
            "customerName": "Wanjiku",
            "customerPhone": "0712345678",
            "status": "paid"
        }))
        .unwrap();
        assert_eq!(draft.payment_method, PaymentMethod::Mpesa);
        assert_eq!(draft.customer_email, None);
        assert_eq!(draft.items[0].product_id, ProductId(1));
    }
}
