//! Errors raised while building adapters from configuration

use thiserror::Error;

use firework_security::request_key::KeyDigestError;

#[derive(Error, Debug)]
pub enum InfraError {
    #[error("Invalid request key entry #{index}: {source}")]
    InvalidRequestKey {
        index: usize,
        #[source]
        source: KeyDigestError,
    },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}
