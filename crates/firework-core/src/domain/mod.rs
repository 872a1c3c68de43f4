//! # Firework Core - Domain Module
//!
//! Topics, subscribers and subscription handles.

pub mod subscriber;
pub mod topic;

pub use subscriber::{DeliveryMethod, HandleIssuer, Subscriber, SubscriptionHandle, UnknownDeliveryMethod};
pub use topic::{validate_topic_name, Topic};
