//! HTTP handlers

pub mod health;
pub mod subscriber;
pub mod topic;
