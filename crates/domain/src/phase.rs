//! Order lifecycle phases and the transition planner.

use serde::{Deserialize, Serialize};

/// The lifecycle phase of an order.
///
/// Phase transitions:
/// ```text
/// Pending ◄──────► Fulfilled
/// ```
/// There is no terminal phase; an order may cycle between the two any
/// number of times, each crossing re-running the full buy or return
/// workflow with quantity and price re-validated at transition time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderPhase {
    /// Not yet fulfilled, or fully unwound.
    #[default]
    Pending,

    /// Inventory decremented and payment captured for the current
    /// quantity.
    Fulfilled,
}

impl OrderPhase {
    /// Maps the persisted `completed` flag to a phase.
    pub fn from_completed(completed: bool) -> Self {
        if completed {
            OrderPhase::Fulfilled
        } else {
            OrderPhase::Pending
        }
    }

    /// Returns the `completed` flag this phase persists as.
    pub fn is_completed(&self) -> bool {
        matches!(self, OrderPhase::Fulfilled)
    }

    /// Returns the phase name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderPhase::Pending => "Pending",
            OrderPhase::Fulfilled => "Fulfilled",
        }
    }
}

impl std::fmt::Display for OrderPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The side effect a phase transition requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowAction {
    /// Pending → Fulfilled: decrement inventory, capture payment.
    Buy,
    /// Fulfilled → Pending: restock inventory. No refund is issued.
    Return,
    /// Phase unchanged: persist field updates only, no gateway calls.
    NoEffect,
}

/// Plans the workflow a `(current, requested)` phase pair requires.
pub fn required_action(current: OrderPhase, requested: OrderPhase) -> WorkflowAction {
    match (current, requested) {
        (OrderPhase::Pending, OrderPhase::Fulfilled) => WorkflowAction::Buy,
        (OrderPhase::Fulfilled, OrderPhase::Pending) => WorkflowAction::Return,
        _ => WorkflowAction::NoEffect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_phase_is_pending() {
        assert_eq!(OrderPhase::default(), OrderPhase::Pending);
    }

    #[test]
    fn phase_round_trips_through_completed_flag() {
        assert_eq!(OrderPhase::from_completed(false), OrderPhase::Pending);
        assert_eq!(OrderPhase::from_completed(true), OrderPhase::Fulfilled);
        assert!(!OrderPhase::Pending.is_completed());
        assert!(OrderPhase::Fulfilled.is_completed());
    }

    #[test]
    fn display() {
        assert_eq!(OrderPhase::Pending.to_string(), "Pending");
        assert_eq!(OrderPhase::Fulfilled.to_string(), "Fulfilled");
    }

    #[test]
    fn crossing_up_requires_buy() {
        assert_eq!(
            required_action(OrderPhase::Pending, OrderPhase::Fulfilled),
            WorkflowAction::Buy
        );
    }

    #[test]
    fn crossing_down_requires_return() {
        assert_eq!(
            required_action(OrderPhase::Fulfilled, OrderPhase::Pending),
            WorkflowAction::Return
        );
    }

    #[test]
    fn staying_put_requires_nothing() {
        assert_eq!(
            required_action(OrderPhase::Pending, OrderPhase::Pending),
            WorkflowAction::NoEffect
        );
        assert_eq!(
            required_action(OrderPhase::Fulfilled, OrderPhase::Fulfilled),
            WorkflowAction::NoEffect
        );
    }

    #[test]
    fn serialization() {
        let phase = OrderPhase::Fulfilled;
        let json = serde_json::to_string(&phase).unwrap();
        let back: OrderPhase = serde_json::from_str(&json).unwrap();
        assert_eq!(phase, back);
    }
}
