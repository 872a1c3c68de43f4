//! # Firework Infrastructure
//!
//! In-memory storage and HTTP delivery implementations (adapters).

pub mod error;
pub mod http;
pub mod memory;

pub use error::InfraError;
pub use http::ReqwestTransport;
pub use memory::{InMemoryTopicRepository, StaticKeyRepository};
