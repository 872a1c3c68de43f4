//! Topic store trait (port)

use crate::domain::{DeliveryMethod, Subscriber, SubscriptionHandle, Topic};
use crate::error::BrokerError;

/// Authoritative storage of topics and their subscribers.
///
/// All mutations of a single topic are linearizable; reads return
/// snapshots that never reflect a partially applied update.
#[cfg_attr(test, mockall::automock)]
pub trait TopicRepository: Send + Sync {
    /// Every topic, each exactly once, sorted by name.
    fn list_topics(&self) -> Vec<Topic>;

    fn get_topic(&self, name: &str) -> Result<Topic, BrokerError>;

    /// Creates the topic if absent. Returns `true` if it was created.
    fn create_topic(&self, name: &str) -> bool;

    /// Appends `body` to the topic's retained messages.
    ///
    /// Returns the subscriber set as it stood at the moment of the append,
    /// or `None` if the topic does not exist. Never creates a topic.
    fn append_message(&self, name: &str, body: &str) -> Option<Vec<Subscriber>>;

    fn add_subscriber(
        &self,
        name: &str,
        url: &str,
        method: DeliveryMethod,
    ) -> Result<SubscriptionHandle, BrokerError>;

    fn remove_subscriber(&self, name: &str, handle: &str) -> Result<bool, BrokerError>;

    fn topic_count(&self) -> usize;
}
