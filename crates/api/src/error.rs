//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use orchestrator::FulfillmentError;
use order_store::StoreError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Fulfillment pipeline error.
    Fulfillment(FulfillmentError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Fulfillment(err) => fulfillment_error_to_response(err),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn fulfillment_error_to_response(err: FulfillmentError) -> (StatusCode, String) {
    match &err {
        FulfillmentError::ClientNotFound(_)
        | FulfillmentError::BookNotFound(_)
        | FulfillmentError::BookNotSellable(_)
        | FulfillmentError::OrderNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        FulfillmentError::BadRequest(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        FulfillmentError::InsufficientResources { .. } => {
            (StatusCode::EXPECTATION_FAILED, err.to_string())
        }
        FulfillmentError::PurchaseForbidden(_)
        | FulfillmentError::AlreadyCompleted { .. }
        | FulfillmentError::NotCompleted { .. } => (StatusCode::FORBIDDEN, err.to_string()),
        FulfillmentError::Payment(_) => (StatusCode::PAYMENT_REQUIRED, err.to_string()),
        FulfillmentError::CompensationFailed { .. } => {
            tracing::error!(error = %err, "compensation failed, operator attention required");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
        FulfillmentError::Store(StoreError::DuplicateOrder { .. }) => {
            (StatusCode::CONFLICT, err.to_string())
        }
        FulfillmentError::Store(_) => {
            tracing::error!(error = %err, "order store error");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
        FulfillmentError::Gateway(_) => (StatusCode::BAD_GATEWAY, err.to_string()),
    }
}

impl From<FulfillmentError> for ApiError {
    fn from(err: FulfillmentError) -> Self {
        ApiError::Fulfillment(err)
    }
}
