//! Custom actions for the order actor.

use crate::model::{Order, OrderStatus, Transition};

#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Request a status change. Whether it applies is decided by
    /// [`OrderStatus::transition_to`] against the stored status.
    Transition(OrderStatus),
}

/// Outcome of [`OrderAction::Transition`] along with the order as stored afterwards.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub outcome: Transition,
    pub order: Order,
}

impl StatusChange {
    pub fn applied(&self) -> bool {
        matches!(self.outcome, Transition::Applied { .. })
    }
}
