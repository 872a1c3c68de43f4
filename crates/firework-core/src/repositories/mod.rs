//! Repository traits (ports)

pub mod key_repository;
pub mod topic_repository;

pub use key_repository::KeyRepository;
pub use topic_repository::TopicRepository;

#[cfg(test)]
pub use key_repository::MockKeyRepository;
#[cfg(test)]
pub use topic_repository::MockTopicRepository;
