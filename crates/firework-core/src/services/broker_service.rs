// ============================================================================
// Firework Core - Broker Service
// File: crates/firework-core/src/services/broker_service.rs
// ============================================================================
//! Single entry point of the broker: authorization, topic bookkeeping and
//! dispatch, composed into the public operations.

use std::sync::Arc;

use tracing::{debug, info, warn};

use firework_shared::utils::mask_secret;

use crate::domain::{validate_topic_name, DeliveryMethod, SubscriptionHandle, Topic};
use crate::error::BrokerError;
use crate::repositories::{KeyRepository, TopicRepository};
use crate::services::dispatcher::Dispatcher;

pub struct BrokerService<T: TopicRepository, K: KeyRepository> {
    topics: Arc<T>,
    keys: Arc<K>,
    dispatcher: Dispatcher,
}

impl<T: TopicRepository, K: KeyRepository> BrokerService<T, K> {
    pub fn new(topics: Arc<T>, keys: Arc<K>, dispatcher: Dispatcher) -> Self {
        Self {
            topics,
            keys,
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn topic_count(&self) -> usize {
        self.topics.topic_count()
    }

    /// Every topic with its retained messages.
    pub async fn list_topics(&self) -> Vec<Topic> {
        self.topics.list_topics()
    }

    pub async fn get_topic(&self, name: &str) -> Result<Topic, BrokerError> {
        self.topics.get_topic(name)
    }

    /// Publish a message to a topic. The body is opaque and stored as is.
    ///
    /// Returns `false` when the topic does not exist; nothing is stored or
    /// delivered then. Delivery to subscribers happens in the background
    /// and never affects the result.
    pub async fn publish(&self, name: &str, body: &str) -> bool {
        let Some(subscribers) = self.topics.append_message(name, body) else {
            debug!("Publish to unknown topic {} not accepted", name);
            return false;
        };

        info!(
            topic = %name,
            bytes = body.len(),
            subscribers = subscribers.len(),
            "Message accepted"
        );

        if !subscribers.is_empty() {
            // Detached: the report is observable through `Dispatcher::reports`.
            let _ = self.dispatcher.spawn(name, subscribers, body);
        }

        true
    }

    /// Register a webhook on a topic.
    ///
    /// The request key is checked before the topic is looked up, so an
    /// invalid key never reveals whether the topic exists.
    pub async fn subscribe(
        &self,
        name: &str,
        req_key: &str,
        url: &str,
        method: DeliveryMethod,
    ) -> Result<SubscriptionHandle, BrokerError> {
        self.authorize(req_key, "subscribe", name)?;

        let handle = self.topics.add_subscriber(name, url, method).map_err(|e| {
            warn!("Subscribe to {} failed: {}", name, e);
            e
        })?;

        info!(topic = %name, url = %url, method = %method, handle = %handle, "Subscriber registered");
        Ok(handle)
    }

    pub async fn unsubscribe(&self, name: &str, handle: &str) -> Result<bool, BrokerError> {
        let removed = self.topics.remove_subscriber(name, handle).map_err(|e| {
            warn!("Unsubscribe from {} failed: {}", name, e);
            e
        })?;

        info!(topic = %name, handle = %handle, "Subscriber removed");
        Ok(removed)
    }

    /// Create a topic if it does not exist yet. Returns `true` if created.
    pub async fn create_topic(&self, name: &str, req_key: &str) -> Result<bool, BrokerError> {
        self.authorize(req_key, "create topic", name)?;
        validate_topic_name(name)?;

        let created = self.topics.create_topic(name);
        if created {
            info!(topic = %name, "Topic created");
        } else {
            debug!("Topic {} already exists", name);
        }
        Ok(created)
    }

    /// Create the topics listed in configuration. Returns how many were new.
    pub fn provision_topics(&self, names: &[String]) -> Result<usize, BrokerError> {
        let mut created = 0;
        for name in names {
            validate_topic_name(name)?;
            if self.topics.create_topic(name) {
                created += 1;
            }
        }
        info!("Provisioned {} of {} configured topics", created, names.len());
        Ok(created)
    }

    /// Checks a request key on its own, for callers that must reject a bad
    /// key before looking at the rest of a request.
    pub fn authorize(&self, req_key: &str, operation: &str, topic: &str) -> Result<(), BrokerError> {
        if self.keys.is_valid_request_key(req_key) {
            return Ok(());
        }
        warn!(
            "{} on {} rejected: invalid request key {}",
            operation,
            topic,
            mask_secret(req_key)
        );
        Err(BrokerError::InvalidRequestKey)
    }
}
