// ============================================================================
// Firework Core - Topic Entity
// File: crates/firework-core/src/domain/topic.rs
// Description: Read view of a topic and its retained messages
// ============================================================================

use serde::Serialize;

use firework_shared::constants::MAX_TOPIC_NAME_LENGTH;

use crate::error::BrokerError;

/// Snapshot of a topic as returned by list/get. Subscribers are not part
/// of the read view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub name: String,

    /// Retained message bodies in append order.
    #[serde(rename = "message")]
    pub messages: Vec<String>,
}

impl Topic {
    pub fn new(name: impl Into<String>, messages: Vec<String>) -> Self {
        Self {
            name: name.into(),
            messages,
        }
    }
}

/// Naming rule applied when a topic is created: 1..=249 characters of
/// ASCII alphanumerics, `.`, `_` or `-`.
pub fn validate_topic_name(name: &str) -> Result<(), BrokerError> {
    if name.is_empty() || name.len() > MAX_TOPIC_NAME_LENGTH {
        return Err(BrokerError::InvalidTopicName(name.to_string()));
    }

    let legal = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if !legal || name == "." || name == ".." {
        return Err(BrokerError::InvalidTopicName(name.to_string()));
    }

    Ok(())
}
