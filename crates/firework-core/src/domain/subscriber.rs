// ============================================================================
// Firework Core - Subscriber Entity
// File: crates/firework-core/src/domain/subscriber.rs
// Description: Webhook registrations and their subscription handles
// ============================================================================

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// HTTP method used to deliver a message to a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeliveryMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Trace,
}

impl DeliveryMethod {
    pub const ALL: [DeliveryMethod; 8] = [
        DeliveryMethod::Get,
        DeliveryMethod::Head,
        DeliveryMethod::Post,
        DeliveryMethod::Put,
        DeliveryMethod::Patch,
        DeliveryMethod::Delete,
        DeliveryMethod::Options,
        DeliveryMethod::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMethod::Get => "GET",
            DeliveryMethod::Head => "HEAD",
            DeliveryMethod::Post => "POST",
            DeliveryMethod::Put => "PUT",
            DeliveryMethod::Patch => "PATCH",
            DeliveryMethod::Delete => "DELETE",
            DeliveryMethod::Options => "OPTIONS",
            DeliveryMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown delivery method: {0}")]
pub struct UnknownDeliveryMethod(pub String);

impl FromStr for DeliveryMethod {
    type Err = UnknownDeliveryMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownDeliveryMethod(s.to_string()))
    }
}

/// Opaque handle returned by subscribe and required by unsubscribe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionHandle(String);

impl SubscriptionHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SubscriptionHandle {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SubscriptionHandle {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl PartialEq<str> for SubscriptionHandle {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Issues subscription handles that are unique for the lifetime of the
/// process: a monotonic sequence number followed by a random UUID.
#[derive(Debug, Default)]
pub struct HandleIssuer {
    next: AtomicU64,
}

impl HandleIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> SubscriptionHandle {
        let seq = self.next.fetch_add(1, Ordering::Relaxed);
        SubscriptionHandle(format!("{:012x}-{}", seq, Uuid::new_v4().simple()))
    }
}

/// A webhook registered on one topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscriber {
    pub handle: SubscriptionHandle,
    pub url: String,
    pub method: DeliveryMethod,
}

impl Subscriber {
    pub fn new(handle: SubscriptionHandle, url: impl Into<String>, method: DeliveryMethod) -> Self {
        Self {
            handle,
            url: url.into(),
            method,
        }
    }
}
