//! Request payloads

use serde::Deserialize;
use url::Url;
use validator::{Validate, ValidationError};

use firework_core::DeliveryMethod;

/// Subscribe request payload - POST /topic/{name}/subscriber
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberRequest {
    pub req_key: String,

    #[validate(custom(function = "validate_webhook_url"))]
    pub url: String,

    #[validate(custom(function = "validate_delivery_method"))]
    pub method: String,
}

impl SubscriberRequest {
    /// Parsed delivery method. Only meaningful after `validate()` passed.
    pub fn delivery_method(&self) -> Result<DeliveryMethod, ValidationError> {
        self.method
            .parse()
            .map_err(|_| ValidationError::new("unknown_method"))
    }
}

/// Create topic payload - PUT /topic/{name}
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopicRequest {
    pub req_key: String,
}

fn validate_webhook_url(value: &str) -> Result<(), ValidationError> {
    let url = Url::parse(value).map_err(|_| ValidationError::new("invalid_url"))?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(()),
        _ => Err(ValidationError::new("unsupported_url")),
    }
}

fn validate_delivery_method(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<DeliveryMethod>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("unknown_method"))
}
