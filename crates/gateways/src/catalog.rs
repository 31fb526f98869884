//! Catalog gateway: book lookup by ISBN.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::Isbn;
use domain::Book;

use crate::error::GatewayError;
use crate::http;

/// Trait for catalog lookups.
///
/// The catalog is the source of truth for the current canonical price
/// and whether a book is published; callers re-fetch on every
/// validation and never cache the result.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Looks up a book by ISBN. `None` means the catalog has no such
    /// book.
    async fn lookup(&self, isbn: &Isbn) -> Result<Option<Book>, GatewayError>;
}

/// HTTP catalog client.
#[derive(Debug, Clone)]
pub struct HttpCatalogGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalogGateway {
    /// Creates a client for the catalog service at `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: http::build_client(),
            base_url: http::normalize_base_url(base_url),
        }
    }
}

#[async_trait]
impl CatalogGateway for HttpCatalogGateway {
    async fn lookup(&self, isbn: &Isbn) -> Result<Option<Book>, GatewayError> {
        let url = format!("{}/findByISBN?isbn={}", self.base_url, isbn);
        http::get_optional(&self.client, &url).await
    }
}

#[derive(Debug, Default)]
struct InMemoryCatalogState {
    books: HashMap<Isbn, Book>,
    fail_on_lookup: bool,
}

/// In-memory catalog for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogGateway {
    state: Arc<RwLock<InMemoryCatalogState>>,
}

impl InMemoryCatalogGateway {
    /// Creates a new empty in-memory catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a book in the catalog.
    pub fn put_book(&self, book: Book) {
        self.state
            .write()
            .unwrap()
            .books
            .insert(book.isbn.clone(), book);
    }

    /// Configures the catalog to fail lookups as if unreachable.
    pub fn set_fail_on_lookup(&self, fail: bool) {
        self.state.write().unwrap().fail_on_lookup = fail;
    }
}

#[async_trait]
impl CatalogGateway for InMemoryCatalogGateway {
    async fn lookup(&self, isbn: &Isbn) -> Result<Option<Book>, GatewayError> {
        let state = self.state.read().unwrap();
        if state.fail_on_lookup {
            return Err(GatewayError::Unavailable("catalog is down".to_string()));
        }
        Ok(state.books.get(isbn).cloned())
    }
}
