//! Outbound HTTP adapters

pub mod reqwest_transport;

pub use reqwest_transport::ReqwestTransport;
