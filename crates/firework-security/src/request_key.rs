//! Request key digests
//!
//! Keys are never kept in plain text once loaded: both the provisioned keys
//! and the presented key are reduced to a SHA-256 digest before comparison.

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Prefix marking a provisioned key that is already a hex digest.
pub const DIGEST_PREFIX: &str = "sha256:";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum KeyDigestError {
    #[error("Empty request key")]
    Empty,
    #[error("Malformed sha256 digest: {0}")]
    MalformedDigest(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyDigest([u8; 32]);

impl KeyDigest {
    /// Digest of a key as presented by a caller.
    pub fn of(key: &str) -> Self {
        let mut out = [0u8; 32];
        out.copy_from_slice(&Sha256::digest(key.as_bytes()));
        Self(out)
    }

    /// Parses a provisioned key: `sha256:<64 hex chars>` or a plain-text key.
    pub fn from_provisioned(entry: &str) -> Result<Self, KeyDigestError> {
        let entry = entry.trim();
        if entry.is_empty() {
            return Err(KeyDigestError::Empty);
        }

        match entry.strip_prefix(DIGEST_PREFIX) {
            Some(hex_digest) => {
                let bytes = hex::decode(hex_digest)
                    .map_err(|e| KeyDigestError::MalformedDigest(e.to_string()))?;
                let out: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
                    KeyDigestError::MalformedDigest(format!("expected 32 bytes, got {}", b.len()))
                })?;
                Ok(Self(out))
            }
            None => Ok(Self::of(entry)),
        }
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}
