// ============================================================================
// Firework Infrastructure - Reqwest Webhook Transport
// File: crates/firework-infrastructure/src/http/reqwest_transport.rs
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use tracing::debug;

use firework_core::domain::DeliveryMethod;
use firework_core::transport::{TransportError, WebhookRequest, WebhookTransport};

use crate::error::InfraError;

/// Delivers webhooks over HTTP with a shared connection pool.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, InfraError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent.to_string())
            .build()?;
        Ok(Self { client })
    }
}

fn to_reqwest_method(method: DeliveryMethod) -> Method {
    match method {
        DeliveryMethod::Get => Method::GET,
        DeliveryMethod::Head => Method::HEAD,
        DeliveryMethod::Post => Method::POST,
        DeliveryMethod::Put => Method::PUT,
        DeliveryMethod::Patch => Method::PATCH,
        DeliveryMethod::Delete => Method::DELETE,
        DeliveryMethod::Options => Method::OPTIONS,
        DeliveryMethod::Trace => Method::TRACE,
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_builder() {
        TransportError::InvalidDestination(err.to_string())
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Request(err.to_string())
    }
}

#[async_trait]
impl WebhookTransport for ReqwestTransport {
    async fn send(&self, request: WebhookRequest) -> Result<u16, TransportError> {
        let url = reqwest::Url::parse(&request.url)
            .map_err(|e| TransportError::InvalidDestination(format!("{}: {}", request.url, e)))?;

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(request.body.to_string());
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        debug!("{} {} answered {}", request.method, request.url, status);
        Ok(status)
    }
}
