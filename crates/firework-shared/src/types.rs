//! Common types

use chrono::Utc;

/// Milliseconds since the Unix epoch, as carried in every response envelope.
pub type EpochMillis = i64;

pub fn now_millis() -> EpochMillis {
    Utc::now().timestamp_millis()
}
