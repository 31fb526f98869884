//! Application configuration loaded from environment variables.

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `CLIENTS_SERVICE_URL` — client directory base URL
/// - `BOOKS_SERVICE_URL` — catalog base URL
/// - `STORAGE_SERVICE_URL` — inventory base URL
/// - `PAYMENT_SERVICE_URL` — payment base URL
/// - `DATABASE_URL` — Postgres connection string; when unset the
///   server runs on the in-memory order store
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub clients_url: String,
    pub books_url: String,
    pub storage_url: String,
    pub payment_url: String,
    pub database_url: Option<String>,
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            clients_url: std::env::var("CLIENTS_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8081".to_string()),
            books_url: std::env::var("BOOKS_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8082".to_string()),
            storage_url: std::env::var("STORAGE_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8083".to_string()),
            payment_url: std::env::var("PAYMENT_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8084".to_string()),
            database_url: std::env::var("DATABASE_URL").ok(),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            clients_url: "http://localhost:8081".to_string(),
            books_url: "http://localhost:8082".to_string(),
            storage_url: "http://localhost:8083".to_string(),
            payment_url: "http://localhost:8084".to_string(),
            database_url: None,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_addr_formatting() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Config::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }
}
