use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{Email, Isbn, OrderId};
use domain::{NewOrder, Order};
use tokio::sync::RwLock;

use crate::{
    Result, StoreError,
    store::OrderStore,
};

#[derive(Default)]
struct MemoryState {
    orders: HashMap<i64, Order>,
    next_id: i64,
}

/// In-memory order store implementation.
///
/// Backs tests and the default binary when no database is configured.
/// Provides the same interface and uniqueness rules as the PostgreSQL
/// implementation.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all orders.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.orders.clear();
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: NewOrder) -> Result<Order> {
        let mut state = self.state.write().await;

        if state
            .orders
            .values()
            .any(|o| o.email == order.email && o.isbn == order.isbn)
        {
            return Err(StoreError::DuplicateOrder {
                email: order.email,
                isbn: order.isbn,
            });
        }

        state.next_id += 1;
        let stored = Order {
            id: OrderId::new(state.next_id),
            email: order.email,
            isbn: order.isbn,
            quantity: order.quantity,
            price: order.price,
            completed: order.completed,
            created_at: Utc::now(),
        };
        state.orders.insert(stored.id.as_i64(), stored.clone());
        Ok(stored)
    }

    async fn update(&self, order: &Order) -> Result<Order> {
        let mut state = self.state.write().await;
        let existing = state
            .orders
            .get_mut(&order.id.as_i64())
            .ok_or(StoreError::OrderNotFound(order.id))?;

        existing.email = order.email.clone();
        existing.isbn = order.isbn.clone();
        existing.quantity = order.quantity;
        existing.price = order.price;
        existing.completed = order.completed;
        // id and created_at keep their stored values
        Ok(existing.clone())
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        let state = self.state.read().await;
        Ok(state.orders.get(&id.as_i64()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        let mut orders: Vec<_> = state
            .orders
            .values()
            .filter(|o| &o.email == email)
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.id);
        Ok(orders)
    }

    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        let mut orders: Vec<_> = state
            .orders
            .values()
            .filter(|o| &o.isbn == isbn)
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.id);
        Ok(orders)
    }

    async fn find_by_email_and_isbn(&self, email: &Email, isbn: &Isbn) -> Result<Option<Order>> {
        let state = self.state.read().await;
        Ok(state
            .orders
            .values()
            .find(|o| &o.email == email && &o.isbn == isbn)
            .cloned())
    }

    async fn find_by_completed(&self, completed: bool) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        let mut orders: Vec<_> = state
            .orders
            .values()
            .filter(|o| o.completed == completed)
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.id);
        Ok(orders)
    }

    async fn list_all(&self) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        let mut orders: Vec<_> = state.orders.values().cloned().collect();
        orders.sort_by(|a, b| {
            a.email
                .cmp(&b.email)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(orders)
    }

    async fn delete(&self, id: OrderId) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .orders
            .remove(&id.as_i64())
            .map(|_| ())
            .ok_or(StoreError::OrderNotFound(id))
    }

    async fn delete_all(&self) -> Result<()> {
        self.clear().await;
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        let state = self.state.read().await;
        Ok(state.orders.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::Money;

    fn new_order(email: &str, isbn: &str) -> NewOrder {
        NewOrder {
            email: Email::new(email),
            isbn: Isbn::new(isbn),
            quantity: 2,
            price: Money::from_dollars(10),
            completed: false,
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = InMemoryOrderStore::new();
        let first = store.insert(new_order("a@example.com", "ISBN-1")).await.unwrap();
        let second = store.insert(new_order("b@example.com", "ISBN-1")).await.unwrap();
        assert_eq!(first.id, OrderId::new(1));
        assert_eq!(second.id, OrderId::new(2));
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_email_isbn_pair() {
        let store = InMemoryOrderStore::new();
        store.insert(new_order("a@example.com", "ISBN-1")).await.unwrap();
        let result = store.insert(new_order("a@example.com", "ISBN-1")).await;
        assert!(matches!(result, Err(StoreError::DuplicateOrder { .. })));
    }

    #[tokio::test]
    async fn update_preserves_id_and_created_at() {
        let store = InMemoryOrderStore::new();
        let inserted = store.insert(new_order("a@example.com", "ISBN-1")).await.unwrap();

        let mut changed = inserted.clone();
        changed.quantity = 5;
        changed.completed = true;
        changed.created_at = Utc::now() + chrono::Duration::hours(1);

        let updated = store.update(&changed).await.unwrap();
        assert_eq!(updated.quantity, 5);
        assert!(updated.completed);
        assert_eq!(updated.id, inserted.id);
        assert_eq!(updated.created_at, inserted.created_at);
    }

    #[tokio::test]
    async fn update_unknown_id_fails() {
        let store = InMemoryOrderStore::new();
        let mut order = store.insert(new_order("a@example.com", "ISBN-1")).await.unwrap();
        order.id = OrderId::new(99);
        assert!(matches!(
            store.update(&order).await,
            Err(StoreError::OrderNotFound(_))
        ));
    }

    #[tokio::test]
    async fn lookups_by_key() {
        let store = InMemoryOrderStore::new();
        store.insert(new_order("a@example.com", "ISBN-1")).await.unwrap();
        store.insert(new_order("a@example.com", "ISBN-2")).await.unwrap();
        store.insert(new_order("b@example.com", "ISBN-1")).await.unwrap();

        let by_email = store.find_by_email(&Email::new("a@example.com")).await.unwrap();
        assert_eq!(by_email.len(), 2);

        let by_isbn = store.find_by_isbn(&Isbn::new("ISBN-1")).await.unwrap();
        assert_eq!(by_isbn.len(), 2);

        let pair = store
            .find_by_email_and_isbn(&Email::new("a@example.com"), &Isbn::new("ISBN-2"))
            .await
            .unwrap();
        assert!(pair.is_some());

        let missing = store
            .find_by_email_and_isbn(&Email::new("c@example.com"), &Isbn::new("ISBN-1"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn find_by_completed_splits_on_flag() {
        let store = InMemoryOrderStore::new();
        store.insert(new_order("a@example.com", "ISBN-1")).await.unwrap();
        let mut fulfilled = store.insert(new_order("b@example.com", "ISBN-1")).await.unwrap();
        fulfilled.completed = true;
        store.update(&fulfilled).await.unwrap();

        assert_eq!(store.find_by_completed(false).await.unwrap().len(), 1);
        assert_eq!(store.find_by_completed(true).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_all_orders_by_email_then_created_at() {
        let store = InMemoryOrderStore::new();
        store.insert(new_order("b@example.com", "ISBN-1")).await.unwrap();
        store.insert(new_order("a@example.com", "ISBN-2")).await.unwrap();
        store.insert(new_order("a@example.com", "ISBN-1")).await.unwrap();

        let all = store.list_all().await.unwrap();
        let keys: Vec<_> = all
            .iter()
            .map(|o| (o.email.as_str().to_string(), o.isbn.as_str().to_string()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("a@example.com".to_string(), "ISBN-2".to_string()),
                ("a@example.com".to_string(), "ISBN-1".to_string()),
                ("b@example.com".to_string(), "ISBN-1".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn delete_and_count() {
        let store = InMemoryOrderStore::new();
        let order = store.insert(new_order("a@example.com", "ISBN-1")).await.unwrap();
        store.insert(new_order("b@example.com", "ISBN-1")).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 2);

        store.delete(order.id).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(matches!(
            store.delete(order.id).await,
            Err(StoreError::OrderNotFound(_))
        ));

        store.delete_all().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
