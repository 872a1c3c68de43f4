//! Application-wide constants

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_APP_NAME: &str = "firework";

pub const DEFAULT_DISPATCH_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_DISPATCH_MAX_IN_FLIGHT: usize = 256;
pub const DEFAULT_DISPATCH_REPORT_CAPACITY: usize = 1_024;
pub const DEFAULT_USER_AGENT: &str = "firework-dispatcher/0.1";

pub const DEFAULT_LOG_FORMAT: &str = "json";
pub const DEFAULT_LOG_FILE_PREFIX: &str = "firework";

/// Upper bound on topic name length.
pub const MAX_TOPIC_NAME_LENGTH: usize = 249;

/// Upper bound on a raw publish body accepted by the HTTP front end.
pub const MAX_PUBLISH_BODY_BYTES: usize = 1024 * 1024;

pub const HEADER_SIGNATURE: &str = "X-Firework-Signature";
pub const HEADER_TOPIC: &str = "X-Firework-Topic";
pub const HEADER_SUBSCRIPTION: &str = "X-Firework-Subscription";
