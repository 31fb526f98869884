//! Projections of the external collaborators' records.
//!
//! None of these are owned by the orchestrator. Books and clients are
//! read-only facts re-fetched on every validation; storage records are
//! the inventory gateway's read-write shape; payments are created fresh
//! per capture attempt and never updated.

use common::{Email, Isbn, OrderId};
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// A book as reported by the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub isbn: Isbn,
    /// Current canonical price. Can change between order creation and a
    /// later submit or cancel, which is why it is never cached.
    pub price: Money,
    /// Unpublished books are not sellable.
    pub published: bool,
}

/// A client as reported by the directory service. Existence is the only
/// fact the orchestrator depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub email: Email,
}

/// A storage record as exchanged with the inventory service.
///
/// On sell and restock calls the `quantity` field carries the order's
/// requested quantity, not a delta and not the resulting stock level;
/// the inventory service interprets it as the adjustment. Responses
/// carry the resulting stock level, where a negative value signals
/// rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageRecord {
    pub isbn: Isbn,
    pub quantity: i64,
}

/// A payment capture request/response pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Payment identity is the order id; a capture is never retried
    /// under the same identity.
    pub order_id: OrderId,
    pub amount: Money,
    pub email: Email,
    #[serde(default)]
    pub succeeded: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl Payment {
    /// Creates a capture request for an order.
    pub fn capture_request(order_id: OrderId, amount: Money, email: Email) -> Self {
        Self {
            order_id,
            amount,
            email,
            succeeded: false,
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_request_starts_unsettled() {
        let payment = Payment::capture_request(
            OrderId::new(1),
            Money::from_dollars(100),
            Email::new("reader@example.com"),
        );
        assert!(!payment.succeeded);
        assert!(payment.message.is_none());
    }

    #[test]
    fn storage_record_wire_shape() {
        let record = StorageRecord {
            isbn: Isbn::new("ISBN-1"),
            quantity: 5,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({"isbn": "ISBN-1", "quantity": 5}));
    }

    #[test]
    fn payment_response_fields_are_optional_on_the_wire() {
        let payment: Payment = serde_json::from_str(
            r#"{"order_id":1,"amount":10000,"email":"reader@example.com"}"#,
        )
        .unwrap();
        assert!(!payment.succeeded);
        assert!(payment.message.is_none());
    }
}
