// ============================================================================
// Firework Infrastructure - In-Memory Topic Repository
// File: crates/firework-infrastructure/src/memory/topic_repo_impl.rs
// ============================================================================

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::debug;

use firework_core::domain::{DeliveryMethod, HandleIssuer, Subscriber, SubscriptionHandle, Topic};
use firework_core::error::BrokerError;
use firework_core::repositories::TopicRepository;

// Per-topic state, guarded by its own lock
#[derive(Debug, Default)]
struct TopicEntry {
    messages: Vec<String>,
    subscribers: Vec<Subscriber>,
}

/// Topic store held entirely in process memory.
///
/// The map is sharded so different topics never contend; each topic has a
/// read/write lock covering its messages and subscribers together.
#[derive(Debug, Default)]
pub struct InMemoryTopicRepository {
    topics: DashMap<String, Arc<RwLock<TopicEntry>>>,
    handles: HandleIssuer,
}

impl InMemoryTopicRepository {
    pub fn new() -> Self {
        Self::default()
    }

    // Clone the entry out so the shard guard is released before locking it
    fn entry(&self, name: &str) -> Option<Arc<RwLock<TopicEntry>>> {
        self.topics.get(name).map(|e| Arc::clone(e.value()))
    }

    fn snapshot(name: &str, entry: &RwLock<TopicEntry>) -> Topic {
        Topic::new(name, entry.read().messages.clone())
    }
}

impl TopicRepository for InMemoryTopicRepository {
    fn list_topics(&self) -> Vec<Topic> {
        let entries: Vec<(String, Arc<RwLock<TopicEntry>>)> = self
            .topics
            .iter()
            .map(|e| (e.key().clone(), Arc::clone(e.value())))
            .collect();

        let mut topics: Vec<Topic> = entries
            .iter()
            .map(|(name, entry)| Self::snapshot(name, entry))
            .collect();
        topics.sort_by(|a, b| a.name.cmp(&b.name));
        topics
    }

    fn get_topic(&self, name: &str) -> Result<Topic, BrokerError> {
        self.entry(name)
            .map(|entry| Self::snapshot(name, &entry))
            .ok_or_else(|| BrokerError::NotFound(name.to_string()))
    }

    fn create_topic(&self, name: &str) -> bool {
        let mut created = false;
        self.topics.entry(name.to_string()).or_insert_with(|| {
            created = true;
            Arc::new(RwLock::new(TopicEntry::default()))
        });
        created
    }

    fn append_message(&self, name: &str, body: &str) -> Option<Vec<Subscriber>> {
        let entry = self.entry(name)?;
        let mut guard = entry.write();
        guard.messages.push(body.to_string());
        Some(guard.subscribers.clone())
    }

    fn add_subscriber(
        &self,
        name: &str,
        url: &str,
        method: DeliveryMethod,
    ) -> Result<SubscriptionHandle, BrokerError> {
        let entry = self
            .entry(name)
            .ok_or_else(|| BrokerError::NotFound(name.to_string()))?;
        let mut guard = entry.write();

        if guard.subscribers.iter().any(|s| s.url == url) {
            return Err(BrokerError::DuplicateSubscription {
                topic: name.to_string(),
                url: url.to_string(),
            });
        }

        let handle = self.handles.issue();
        guard
            .subscribers
            .push(Subscriber::new(handle.clone(), url, method));
        debug!("Topic {} now has {} subscriber(s)", name, guard.subscribers.len());
        Ok(handle)
    }

    fn remove_subscriber(&self, name: &str, handle: &str) -> Result<bool, BrokerError> {
        let invalid = || BrokerError::InvalidSubscriptionHandle {
            topic: name.to_string(),
            handle: handle.to_string(),
        };

        let entry = self.entry(name).ok_or_else(invalid)?;
        let mut guard = entry.write();
        let position = guard
            .subscribers
            .iter()
            .position(|s| s.handle == *handle)
            .ok_or_else(invalid)?;
        guard.subscribers.remove(position);
        Ok(true)
    }

    fn topic_count(&self) -> usize {
        self.topics.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn repo_with(names: &[&str]) -> InMemoryTopicRepository {
        let repo = InMemoryTopicRepository::new();
        for name in names {
            repo.create_topic(name);
        }
        repo
    }

    #[test]
    fn test_create_topic_is_idempotent() {
        let repo = InMemoryTopicRepository::new();
        assert!(repo.create_topic("NEWS"));
        assert!(!repo.create_topic("NEWS"));
        assert_eq!(repo.topic_count(), 1);
    }

    #[test]
    fn test_list_topics_sorted_by_name() {
        let repo = repo_with(&["b", "a", "C"]);
        let names: Vec<_> = repo.list_topics().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["C", "a", "b"]);
    }

    #[test]
    fn test_get_missing_topic_does_not_create_it() {
        let repo = InMemoryTopicRepository::new();
        assert_eq!(
            repo.get_topic("GHOST"),
            Err(BrokerError::NotFound("GHOST".to_string()))
        );
        assert_eq!(repo.topic_count(), 0);
    }

    #[test]
    fn test_append_keeps_order_and_never_creates() {
        let repo = repo_with(&["NEWS"]);
        assert!(repo.append_message("NEWS", "first").is_some());
        assert!(repo.append_message("NEWS", "second").is_some());
        assert!(repo.append_message("GHOST", "lost").is_none());

        assert_eq!(repo.get_topic("NEWS").unwrap().messages, vec!["first", "second"]);
        assert_eq!(repo.topic_count(), 1);
    }

    #[test]
    fn test_append_returns_subscriber_snapshot() {
        let repo = repo_with(&["NEWS"]);
        let handle = repo
            .add_subscriber("NEWS", "http://a/x", DeliveryMethod::Post)
            .unwrap();

        let snapshot = repo.append_message("NEWS", "hello").unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].handle, handle);

        repo.remove_subscriber("NEWS", handle.as_str()).unwrap();
        assert!(repo.append_message("NEWS", "again").unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_url_rejected_and_first_handle_survives() {
        let repo = repo_with(&["NEWS"]);
        let first = repo
            .add_subscriber("NEWS", "http://a/x", DeliveryMethod::Post)
            .unwrap();

        let err = repo
            .add_subscriber("NEWS", "http://a/x", DeliveryMethod::Put)
            .unwrap_err();
        assert!(matches!(err, BrokerError::DuplicateSubscription { .. }));

        assert_eq!(repo.remove_subscriber("NEWS", first.as_str()), Ok(true));
    }

    #[test]
    fn test_same_url_allowed_on_different_topics() {
        let repo = repo_with(&["A", "B"]);
        assert!(repo.add_subscriber("A", "http://a/x", DeliveryMethod::Post).is_ok());
        assert!(repo.add_subscriber("B", "http://a/x", DeliveryMethod::Post).is_ok());
    }

    #[test]
    fn test_subscribe_to_missing_topic() {
        let repo = InMemoryTopicRepository::new();
        assert_eq!(
            repo.add_subscriber("GHOST", "http://a/x", DeliveryMethod::Post),
            Err(BrokerError::NotFound("GHOST".to_string()))
        );
    }

    #[test]
    fn test_remove_twice_fails_second_time() {
        let repo = repo_with(&["NEWS"]);
        let handle = repo
            .add_subscriber("NEWS", "http://a/x", DeliveryMethod::Post)
            .unwrap();

        assert_eq!(repo.remove_subscriber("NEWS", handle.as_str()), Ok(true));
        assert!(matches!(
            repo.remove_subscriber("NEWS", handle.as_str()),
            Err(BrokerError::InvalidSubscriptionHandle { .. })
        ));
    }

    #[test]
    fn test_handle_is_scoped_to_its_topic() {
        let repo = repo_with(&["A", "B"]);
        let handle = repo
            .add_subscriber("A", "http://a/x", DeliveryMethod::Post)
            .unwrap();

        assert!(matches!(
            repo.remove_subscriber("B", handle.as_str()),
            Err(BrokerError::InvalidSubscriptionHandle { .. })
        ));
        assert_eq!(repo.remove_subscriber("A", handle.as_str()), Ok(true));
    }

    #[test]
    fn test_resubscribe_after_remove_gets_new_handle() {
        let repo = repo_with(&["NEWS"]);
        let first = repo
            .add_subscriber("NEWS", "http://a/x", DeliveryMethod::Post)
            .unwrap();
        repo.remove_subscriber("NEWS", first.as_str()).unwrap();

        let second = repo
            .add_subscriber("NEWS", "http://a/x", DeliveryMethod::Post)
            .unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_distinct_urls_get_distinct_handles() {
        let repo = Arc::new(repo_with(&["NEWS"]));

        let tasks: Vec<_> = (0..64)
            .map(|i| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move {
                    repo.add_subscriber("NEWS", &format!("http://sub/{i}"), DeliveryMethod::Post)
                })
            })
            .collect();

        let mut handles = HashSet::new();
        for task in tasks {
            handles.insert(task.await.unwrap().unwrap());
        }

        assert_eq!(handles.len(), 64);
        assert_eq!(repo.append_message("NEWS", "m").unwrap().len(), 64);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_same_url_has_single_winner() {
        let repo = Arc::new(repo_with(&["NEWS"]));

        let tasks: Vec<_> = (0..32)
            .map(|_| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move {
                    repo.add_subscriber("NEWS", "http://a/x", DeliveryMethod::Post)
                })
            })
            .collect();

        let mut winners = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => winners += 1,
                Err(BrokerError::DuplicateSubscription { .. }) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(winners, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_are_all_retained() {
        let repo = Arc::new(repo_with(&["NEWS"]));

        let tasks: Vec<_> = (0..100)
            .map(|i| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.append_message("NEWS", &format!("m{i}")) })
            })
            .collect();
        for task in tasks {
            assert!(task.await.unwrap().is_some());
        }

        let messages = repo.get_topic("NEWS").unwrap().messages;
        assert_eq!(messages.len(), 100);
        let unique: HashSet<_> = messages.into_iter().collect();
        assert_eq!(unique.len(), 100);
    }
}
