//! The order record.

use chrono::{DateTime, Utc};
use common::{Email, Isbn, OrderId};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::phase::OrderPhase;

/// A persisted purchase order.
///
/// `completed == true` means inventory has been decremented and payment
/// captured for the current quantity; `completed == false` means neither
/// is outstanding. Only the fulfillment orchestrator writes `completed`
/// and `price` after a transition; the store never mutates them itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Store-assigned identifier, immutable after the first insert.
    pub id: OrderId,
    /// Client placing the order.
    pub email: Email,
    /// Book being purchased.
    pub isbn: Isbn,
    /// Number of copies requested.
    pub quantity: u32,
    /// Price snapshot taken at validation time, not a live catalog
    /// reference.
    pub price: Money,
    /// Whether the order has been fulfilled.
    pub completed: bool,
    /// Set once on insert, never mutated.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Returns the lifecycle phase corresponding to `completed`.
    pub fn phase(&self) -> OrderPhase {
        OrderPhase::from_completed(self.completed)
    }
}

/// The shape of an order before the store has assigned its identifier
/// and creation timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub email: Email,
    pub isbn: Isbn,
    pub quantity: u32,
    pub price: Money,
    /// A creation request may arrive already marked complete, which
    /// triggers the buy workflow before the completed flag is persisted.
    #[serde(default)]
    pub completed: bool,
}
