//! Shared reqwest plumbing for the HTTP gateway adapters.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::GatewayError;

/// Every gateway call runs under this timeout so a hung collaborator
/// cannot block a request indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the shared HTTP client used by all gateway adapters.
pub(crate) fn build_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("Failed to build HTTP client")
}

/// Normalizes a configured base URL (no trailing slash).
pub(crate) fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// GET expecting a JSON body; a 404 maps to `None`.
pub(crate) async fn get_optional<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<Option<T>, GatewayError> {
    let response = client.get(url).send().await?;
    tracing::debug!(%url, status = %response.status(), "gateway GET");
    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !response.status().is_success() {
        return Err(GatewayError::Status(response.status().as_u16()));
    }
    Ok(Some(response.json().await?))
}

/// POST a JSON body, expecting a JSON body back. Client-error statuses
/// are explicit rejections; anything else non-2xx is a status error.
pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    body: &B,
    reject_message: impl FnOnce(StatusCode) -> String,
) -> Result<T, GatewayError> {
    let response = client.post(url).json(body).send().await?;
    let status = response.status();
    tracing::debug!(%url, %status, "gateway POST");
    if status.is_client_error() {
        return Err(GatewayError::Rejected(reject_message(status)));
    }
    if !status.is_success() {
        return Err(GatewayError::Status(status.as_u16()));
    }
    Ok(response.json().await?)
}
