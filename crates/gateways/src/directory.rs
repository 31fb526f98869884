//! Directory gateway: client lookup by email.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::Email;
use domain::Client;

use crate::error::GatewayError;
use crate::http;

/// Trait for client directory lookups. Existence is the only fact the
/// orchestrator depends on.
#[async_trait]
pub trait DirectoryGateway: Send + Sync {
    /// Looks up a client by email. `None` means no such client exists.
    async fn lookup(&self, email: &Email) -> Result<Option<Client>, GatewayError>;
}

/// HTTP directory client.
#[derive(Debug, Clone)]
pub struct HttpDirectoryGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDirectoryGateway {
    /// Creates a client for the directory service at `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: http::build_client(),
            base_url: http::normalize_base_url(base_url),
        }
    }
}

#[async_trait]
impl DirectoryGateway for HttpDirectoryGateway {
    async fn lookup(&self, email: &Email) -> Result<Option<Client>, GatewayError> {
        let url = format!("{}/find?email={}", self.base_url, email);
        http::get_optional(&self.client, &url).await
    }
}

#[derive(Debug, Default)]
struct InMemoryDirectoryState {
    clients: HashSet<Email>,
    fail_on_lookup: bool,
}

/// In-memory directory for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectoryGateway {
    state: Arc<RwLock<InMemoryDirectoryState>>,
}

impl InMemoryDirectoryGateway {
    /// Creates a new empty in-memory directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a client email.
    pub fn add_client(&self, email: Email) {
        self.state.write().unwrap().clients.insert(email);
    }

    /// Configures the directory to fail lookups as if unreachable.
    pub fn set_fail_on_lookup(&self, fail: bool) {
        self.state.write().unwrap().fail_on_lookup = fail;
    }
}

#[async_trait]
impl DirectoryGateway for InMemoryDirectoryGateway {
    async fn lookup(&self, email: &Email) -> Result<Option<Client>, GatewayError> {
        let state = self.state.read().unwrap();
        if state.fail_on_lookup {
            return Err(GatewayError::Unavailable("directory is down".to_string()));
        }
        Ok(state.clients.get(email).map(|email| Client {
            email: email.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lookup_finds_registered_client() {
        let directory = InMemoryDirectoryGateway::new();
        directory.add_client(Email::new("reader@example.com"));

        let found = directory
            .lookup(&Email::new("reader@example.com"))
            .await
            .unwrap();
        assert_eq!(
            found,
            Some(Client {
                email: Email::new("reader@example.com")
            })
        );
    }

    #[tokio::test]
    async fn lookup_misses_unknown_email() {
        let directory = InMemoryDirectoryGateway::new();
        let found = directory
            .lookup(&Email::new("nobody@example.com"))
            .await
            .unwrap();
        assert!(found.is_none());
    }
}
