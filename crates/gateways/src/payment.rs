//! Payment gateway: capture submission.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::Payment;

use crate::error::GatewayError;
use crate::http;

/// Trait for payment captures.
///
/// A capture is created fresh per attempt under the order's identity
/// and is never retried with the same identity. There is no refund
/// operation in this system's scope.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Submits a capture. The returned payment carries the gateway's
    /// success flag and message.
    async fn capture(&self, payment: &Payment) -> Result<Payment, GatewayError>;
}

/// HTTP payment client.
#[derive(Debug, Clone)]
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPaymentGateway {
    /// Creates a client for the payment service at `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: http::build_client(),
            base_url: http::normalize_base_url(base_url),
        }
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn capture(&self, payment: &Payment) -> Result<Payment, GatewayError> {
        http::post_json(&self.client, &self.base_url, payment, |status| {
            format!("Payment rejected: status {status}")
        })
        .await
    }
}

#[derive(Debug, Default)]
struct InMemoryPaymentState {
    captures: Vec<Payment>,
    fail_on_capture: bool,
    decline_message: Option<String>,
}

/// In-memory payment service for testing.
///
/// Two independent failure modes: `set_fail_on_capture` simulates an
/// unreachable gateway, `set_decline` a reachable gateway answering
/// with a non-success capture.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentGateway {
    state: Arc<RwLock<InMemoryPaymentState>>,
}

impl InMemoryPaymentGateway {
    /// Creates a new in-memory payment gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the gateway to fail the next captures as unreachable.
    pub fn set_fail_on_capture(&self, fail: bool) {
        self.state.write().unwrap().fail_on_capture = fail;
    }

    /// Configures the gateway to answer the next captures with
    /// `succeeded = false` and the given message.
    pub fn set_decline(&self, message: impl Into<String>) {
        self.state.write().unwrap().decline_message = Some(message.into());
    }

    /// Returns the number of successful captures.
    pub fn capture_count(&self) -> usize {
        self.state.read().unwrap().captures.len()
    }

    /// Returns the successful captures observed, in order.
    pub fn captures(&self) -> Vec<Payment> {
        self.state.read().unwrap().captures.clone()
    }
}

#[async_trait]
impl PaymentGateway for InMemoryPaymentGateway {
    async fn capture(&self, payment: &Payment) -> Result<Payment, GatewayError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_capture {
            return Err(GatewayError::Unavailable(
                "payment gateway is down".to_string(),
            ));
        }

        if let Some(message) = state.decline_message.clone() {
            return Ok(Payment {
                succeeded: false,
                message: Some(message),
                ..payment.clone()
            });
        }

        let settled = Payment {
            succeeded: true,
            message: None,
            ..payment.clone()
        };
        state.captures.push(settled.clone());
        Ok(settled)
    }
}
