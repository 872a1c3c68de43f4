//! In-memory adapters

pub mod key_repo_impl;
pub mod topic_repo_impl;

pub use key_repo_impl::StaticKeyRepository;
pub use topic_repo_impl::InMemoryTopicRepository;
