//! Broker errors

use thiserror::Error;

/// Every failure the broker reports to its callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BrokerError {
    #[error("Topic not found: {0}")]
    NotFound(String),

    #[error("Invalid request key")]
    InvalidRequestKey,

    #[error("Url already subscribed to topic {topic}: {url}")]
    DuplicateSubscription { topic: String, url: String },

    #[error("No subscriber {handle} on topic {topic}")]
    InvalidSubscriptionHandle { topic: String, handle: String },

    #[error("Invalid topic name: {0}")]
    InvalidTopicName(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Stable tag of a [`BrokerError`], used by the boundary layer to pick a
/// status code without inspecting the error payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidRequestKey,
    DuplicateSubscription,
    InvalidSubscriptionHandle,
    InvalidTopicName,
    Unexpected,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 6] = [
        ErrorKind::NotFound,
        ErrorKind::InvalidRequestKey,
        ErrorKind::DuplicateSubscription,
        ErrorKind::InvalidSubscriptionHandle,
        ErrorKind::InvalidTopicName,
        ErrorKind::Unexpected,
    ];
}

impl BrokerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BrokerError::NotFound(_) => ErrorKind::NotFound,
            BrokerError::InvalidRequestKey => ErrorKind::InvalidRequestKey,
            BrokerError::DuplicateSubscription { .. } => ErrorKind::DuplicateSubscription,
            BrokerError::InvalidSubscriptionHandle { .. } => ErrorKind::InvalidSubscriptionHandle,
            BrokerError::InvalidTopicName(_) => ErrorKind::InvalidTopicName,
            BrokerError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    pub fn unexpected(err: impl std::fmt::Display) -> Self {
        BrokerError::Unexpected(err.to_string())
    }
}
