//! # Firework Core
//!
//! Domain entities, repository ports, the webhook dispatcher and the broker
//! facade that ties them together.

pub mod domain;
pub mod error;
pub mod repositories;
pub mod services;
pub mod transport;

// Re-export domain entities
pub use domain::*;
pub use error::{BrokerError, ErrorKind};
pub use services::{BrokerService, Dispatcher, DispatcherConfig};
