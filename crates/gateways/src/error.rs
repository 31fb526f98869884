//! Gateway error types.

use thiserror::Error;

/// Errors that can occur when calling an external service.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The service understood the request and refused it (for the
    /// inventory service, a negative resulting quantity).
    #[error("{0}")]
    Rejected(String),

    /// The service answered with an unexpected HTTP status.
    #[error("Gateway returned status {0}")]
    Status(u16),

    /// The service could not be reached or the response could not be
    /// read.
    #[error("Gateway unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service is unavailable. Used by in-memory fakes to simulate
    /// an unreachable collaborator.
    #[error("Gateway unavailable: {0}")]
    Unavailable(String),
}
