//! Webhook payload signing (HMAC-SHA256)

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Prefix of the signature header value.
pub const SIGNATURE_SCHEME: &str = "sha256=";

#[derive(Clone)]
pub struct PayloadSigner {
    secret: Vec<u8>,
}

impl PayloadSigner {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Header value for `body`: `sha256=<hex>`.
    pub fn sign(&self, body: &[u8]) -> String {
        // HMAC accepts keys of any length, so this cannot fail.
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .unwrap_or_else(|_| unreachable!("hmac accepts any key length"));
        mac.update(body);
        format!("{}{}", SIGNATURE_SCHEME, hex::encode(mac.finalize().into_bytes()))
    }

    /// Constant-time check of a received header value.
    pub fn verify(&self, body: &[u8], header: &str) -> bool {
        let Some(hex_sig) = header.strip_prefix(SIGNATURE_SCHEME) else {
            return false;
        };
        let Ok(expected) = hex::decode(hex_sig) else {
            return false;
        };
        let Ok(mut mac) = HmacSha256::new_from_slice(&self.secret) else {
            return false;
        };
        mac.update(body);
        mac.verify_slice(&expected).is_ok()
    }
}

impl std::fmt::Debug for PayloadSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadSigner").finish_non_exhaustive()
    }
}
