// ============================================================================
// Firework Infrastructure - Static Request Key Repository
// File: crates/firework-infrastructure/src/memory/key_repo_impl.rs
// ============================================================================

use std::collections::HashSet;

use tracing::info;

use firework_core::repositories::KeyRepository;
use firework_security::KeyDigest;

use crate::error::InfraError;

/// Request keys provisioned at startup, held only as digests.
#[derive(Debug, Default)]
pub struct StaticKeyRepository {
    digests: HashSet<KeyDigest>,
}

impl StaticKeyRepository {
    /// Builds the repository from configured entries (plain keys or
    /// `sha256:<hex>` digests). Any malformed entry aborts the load.
    pub fn from_config(entries: &[String]) -> Result<Self, InfraError> {
        let digests = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                KeyDigest::from_provisioned(entry)
                    .map_err(|source| InfraError::InvalidRequestKey { index, source })
            })
            .collect::<Result<HashSet<_>, _>>()?;

        info!("Loaded {} request key(s)", digests.len());
        Ok(Self { digests })
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }
}

impl KeyRepository for StaticKeyRepository {
    fn is_valid_request_key(&self, key: &str) -> bool {
        !key.is_empty() && self.digests.contains(&KeyDigest::of(key))
    }
}
