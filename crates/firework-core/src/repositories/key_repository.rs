//! Request key store trait (port)

/// Decides whether a presented request key authorizes the caller.
///
/// Implementations are pure lookups: no side effects, no errors. An empty
/// or malformed key is simply not valid.
#[cfg_attr(test, mockall::automock)]
pub trait KeyRepository: Send + Sync {
    fn is_valid_request_key(&self, key: &str) -> bool;
}
