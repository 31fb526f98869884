use async_trait::async_trait;
use common::{Email, Isbn, OrderId};
use domain::{NewOrder, Order};

use crate::Result;

/// Core trait for order store implementations.
///
/// All implementations must be thread-safe (Send + Sync). Updates are
/// per-row: two concurrent updates to the same order resolve to one of
/// the two writes, never a torn record. Callers that need
/// stronger guarantees across rows must serialize above this trait.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts a new order, assigning its identifier and creation
    /// timestamp.
    ///
    /// Fails with `DuplicateOrder` if an order for the same
    /// `(email, isbn)` pair already exists.
    async fn insert(&self, order: NewOrder) -> Result<Order>;

    /// Persists field updates to an existing order.
    ///
    /// The stored identifier and creation timestamp are never
    /// overwritten. Returns the stored row after the update, or
    /// `OrderNotFound` if the id does not exist.
    async fn update(&self, order: &Order) -> Result<Order>;

    /// Retrieves an order by id.
    async fn get(&self, id: OrderId) -> Result<Option<Order>>;

    /// Retrieves all orders placed by a client.
    async fn find_by_email(&self, email: &Email) -> Result<Vec<Order>>;

    /// Retrieves all orders for a book.
    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Vec<Order>>;

    /// Retrieves the order for a `(client, book)` pair, if any.
    async fn find_by_email_and_isbn(&self, email: &Email, isbn: &Isbn) -> Result<Option<Order>>;

    /// Retrieves all orders with the given completed flag.
    async fn find_by_completed(&self, completed: bool) -> Result<Vec<Order>>;

    /// Lists every order, sorted by `(email, created_at)` ascending.
    async fn list_all(&self) -> Result<Vec<Order>>;

    /// Deletes an order by id, or fails with `OrderNotFound`.
    async fn delete(&self, id: OrderId) -> Result<()>;

    /// Deletes every order.
    async fn delete_all(&self) -> Result<()>;

    /// Returns the number of stored orders.
    async fn count(&self) -> Result<u64>;
}
