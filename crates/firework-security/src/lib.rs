//! # Firework Security
//!
//! Request-key digests and webhook payload signing.

pub mod request_key;
pub mod signing;

pub use request_key::KeyDigest;
pub use signing::PayloadSigner;
