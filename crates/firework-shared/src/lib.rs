//! # Firework Shared
//!
//! Configuration, telemetry, and small helpers shared by every Firework crate.

pub mod constants;
pub mod types;
pub mod utils;
pub mod telemetry;
pub mod config;
pub mod error;

pub use types::*;
pub use error::AppError;
