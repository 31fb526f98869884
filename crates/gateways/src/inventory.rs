//! Inventory gateway: stock lookup and the sell/restock adjustments.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::Isbn;
use domain::StorageRecord;

use crate::error::GatewayError;
use crate::http;

/// Trait for inventory operations.
///
/// `sell` and `restock` take a record whose `quantity` is the order's
/// requested quantity; the inventory service interprets it as the
/// adjustment. Both can be rejected, signalled by a negative resulting
/// quantity or an explicit error. Atomicity of concurrent adjustments
/// for the same ISBN is the inventory service's responsibility.
#[async_trait]
pub trait InventoryGateway: Send + Sync {
    /// Looks up the stock record for a book. `None` means the book is
    /// not stocked at all.
    async fn lookup(&self, isbn: &Isbn) -> Result<Option<StorageRecord>, GatewayError>;

    /// Decrements stock by the record's quantity. Returns the resulting
    /// record on success.
    async fn sell(&self, record: &StorageRecord) -> Result<StorageRecord, GatewayError>;

    /// Increments stock by the record's quantity. Returns the resulting
    /// record on success.
    async fn restock(&self, record: &StorageRecord) -> Result<StorageRecord, GatewayError>;
}

/// HTTP inventory client.
#[derive(Debug, Clone)]
pub struct HttpInventoryGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInventoryGateway {
    /// Creates a client for the inventory service at `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: http::build_client(),
            base_url: http::normalize_base_url(base_url),
        }
    }

    fn check_quantity(record: StorageRecord, reject: String) -> Result<StorageRecord, GatewayError> {
        if record.quantity < 0 {
            return Err(GatewayError::Rejected(reject));
        }
        Ok(record)
    }
}

#[async_trait]
impl InventoryGateway for HttpInventoryGateway {
    async fn lookup(&self, isbn: &Isbn) -> Result<Option<StorageRecord>, GatewayError> {
        let url = format!("{}/findByISBN?isbn={}", self.base_url, isbn);
        http::get_optional(&self.client, &url).await
    }

    async fn sell(&self, record: &StorageRecord) -> Result<StorageRecord, GatewayError> {
        let url = format!("{}/sell-book", self.base_url);
        let reject = format!("Purchase was rejected, ISBN: {}", record.isbn);
        let result: StorageRecord =
            http::post_json(&self.client, &url, record, |_| reject.clone()).await?;
        Self::check_quantity(result, reject)
    }

    async fn restock(&self, record: &StorageRecord) -> Result<StorageRecord, GatewayError> {
        let url = format!("{}/ingest-book", self.base_url);
        let reject = format!("Return was rejected, ISBN: {}", record.isbn);
        let result: StorageRecord =
            http::post_json(&self.client, &url, record, |_| reject.clone()).await?;
        Self::check_quantity(result, reject)
    }
}

#[derive(Debug, Default)]
struct InMemoryInventoryState {
    stock: HashMap<Isbn, i64>,
    fail_on_sell: bool,
    fail_on_restock: bool,
    ops: Vec<&'static str>,
}

/// In-memory inventory for testing.
///
/// Records every sell/restock attempt in order so compensation
/// sequencing can be asserted without a real service.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventoryGateway {
    state: Arc<RwLock<InMemoryInventoryState>>,
}

impl InMemoryInventoryGateway {
    /// Creates a new empty in-memory inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the stocked quantity for a book.
    pub fn set_quantity(&self, isbn: Isbn, quantity: i64) {
        self.state.write().unwrap().stock.insert(isbn, quantity);
    }

    /// Returns the stocked quantity for a book.
    pub fn quantity_of(&self, isbn: &Isbn) -> Option<i64> {
        self.state.read().unwrap().stock.get(isbn).copied()
    }

    /// Configures the next sell calls to be rejected.
    pub fn set_fail_on_sell(&self, fail: bool) {
        self.state.write().unwrap().fail_on_sell = fail;
    }

    /// Configures the next restock calls to be rejected.
    pub fn set_fail_on_restock(&self, fail: bool) {
        self.state.write().unwrap().fail_on_restock = fail;
    }

    /// Returns the sell/restock attempts observed, in order.
    pub fn ops(&self) -> Vec<&'static str> {
        self.state.read().unwrap().ops.clone()
    }
}

#[async_trait]
impl InventoryGateway for InMemoryInventoryGateway {
    async fn lookup(&self, isbn: &Isbn) -> Result<Option<StorageRecord>, GatewayError> {
        let state = self.state.read().unwrap();
        Ok(state.stock.get(isbn).map(|&quantity| StorageRecord {
            isbn: isbn.clone(),
            quantity,
        }))
    }

    async fn sell(&self, record: &StorageRecord) -> Result<StorageRecord, GatewayError> {
        let mut state = self.state.write().unwrap();
        state.ops.push("sell");

        if state.fail_on_sell {
            return Err(GatewayError::Rejected(format!(
                "Purchase was rejected, ISBN: {}",
                record.isbn
            )));
        }

        let current = state.stock.get(&record.isbn).copied().unwrap_or(0);
        let remaining = current - record.quantity;
        if remaining < 0 {
            return Err(GatewayError::Rejected(format!(
                "Purchase was rejected, ISBN: {}",
                record.isbn
            )));
        }
        state.stock.insert(record.isbn.clone(), remaining);
        Ok(StorageRecord {
            isbn: record.isbn.clone(),
            quantity: remaining,
        })
    }

    async fn restock(&self, record: &StorageRecord) -> Result<StorageRecord, GatewayError> {
        let mut state = self.state.write().unwrap();
        state.ops.push("restock");

        if state.fail_on_restock {
            return Err(GatewayError::Rejected(format!(
                "Return was rejected, ISBN: {}",
                record.isbn
            )));
        }

        let current = state.stock.get(&record.isbn).copied().unwrap_or(0);
        let total = current + record.quantity;
        state.stock.insert(record.isbn.clone(), total);
        Ok(StorageRecord {
            isbn: record.isbn.clone(),
            quantity: total,
        })
    }
}
