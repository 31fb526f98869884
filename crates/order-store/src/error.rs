use common::{Email, Isbn, OrderId};
use thiserror::Error;

/// Errors that can occur when interacting with the order store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The order was not found in the store.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// An order for this client and book already exists. The
    /// `(email, isbn)` pair is unique so that submit and cancel can
    /// locate an order without its id.
    #[error("An order already exists for client {email} and ISBN {isbn}")]
    DuplicateOrder { email: Email, isbn: Isbn },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Convenience type alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;
