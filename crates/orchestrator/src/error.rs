//! Fulfillment error taxonomy.

use common::{Email, Isbn};
use gateways::GatewayError;
use order_store::StoreError;
use thiserror::Error;

/// Errors surfaced by the fulfillment orchestrator.
///
/// Validation failures abort before any mutation. Mid-workflow failures
/// are surfaced after their compensation has run. `CompensationFailed`
/// is the one higher-severity case: the compensation itself failed and
/// the order and inventory are out of sync until an operator intervenes.
#[derive(Debug, Error)]
pub enum FulfillmentError {
    /// No client exists for the given email.
    #[error("Client is not found by email {0}")]
    ClientNotFound(Email),

    /// No book exists for the given ISBN.
    #[error("Book not found by isbn {0}")]
    BookNotFound(Isbn),

    /// The book exists but is not yet published.
    #[error("The book is not yet vendible, ISBN: {0}")]
    BookNotSellable(Isbn),

    /// No order matched the requested key.
    #[error("{0}")]
    OrderNotFound(String),

    /// Malformed input or an identifier mismatch.
    #[error("{0}")]
    BadRequest(String),

    /// Requested quantity exceeds the available stock.
    #[error("We do not have enough books in storage, ISBN: {isbn}")]
    InsufficientResources { isbn: Isbn },

    /// Price regression or an inventory rejection blocked the purchase.
    #[error("{0}")]
    PurchaseForbidden(String),

    /// Submit was called on an order that is already fulfilled.
    #[error("Order is already paid, ISBN {isbn} client {email}")]
    AlreadyCompleted { email: Email, isbn: Isbn },

    /// Cancel was called on an order that is not fulfilled.
    #[error("Order is not paid, ISBN {isbn} client {email}")]
    NotCompleted { email: Email, isbn: Isbn },

    /// The payment capture failed or the gateway was unreachable.
    #[error("Payment failed: {0}")]
    Payment(String),

    /// A compensation step failed. The order and inventory are out of
    /// sync; this must never be downgraded to a normal error.
    #[error("Compensation step '{step}' failed: {reason}; order and inventory are out of sync")]
    CompensationFailed { step: String, reason: String },

    /// Order store error.
    #[error("Order store error: {0}")]
    Store(StoreError),

    /// A gateway read failed at the transport level.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

impl From<StoreError> for FulfillmentError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::OrderNotFound(id) => {
                FulfillmentError::OrderNotFound(format!("Order not found: {id}"))
            }
            other => FulfillmentError::Store(other),
        }
    }
}

/// Convenience type alias for fulfillment results.
pub type Result<T> = std::result::Result<T, FulfillmentError>;
