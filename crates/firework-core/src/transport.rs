//! Outbound webhook transport (port)

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::DeliveryMethod;

/// One HTTP request to a subscriber's webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookRequest {
    pub url: String,
    pub method: DeliveryMethod,
    pub body: Arc<str>,
    pub headers: Vec<(&'static str, String)>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Invalid destination: {0}")]
    InvalidDestination(String),

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request failed: {0}")]
    Request(String),
}

/// Sends a webhook request and reports the HTTP status it was answered
/// with. Any status is a successful send; classification is up to the
/// caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    async fn send(&self, request: WebhookRequest) -> Result<u16, TransportError>;
}
