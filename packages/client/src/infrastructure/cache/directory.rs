//! Cached topic directory.
//!
//! Holds the ordered listing of known topics. Populated by the session's
//! initial load after connecting, then mutated only by the message
//! dispatcher reacting to topic control messages. Insertion order is
//! preserved (it reflects creation order on the server).

use tokio::sync::Mutex;

use crate::domain::{TopicDescriptor, TopicId};

/// Ordered collection of topic descriptors.
///
/// Duplicate identifiers are rejected on insert: a repeated
/// `TopicCreated` notice for a known id is treated as idempotent.
#[derive(Debug, Default)]
pub struct DirectoryCache {
    topics: Mutex<Vec<TopicDescriptor>>,
}

impl DirectoryCache {
    /// Create an empty directory cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole listing (initial load after connecting)
    pub async fn replace(&self, topics: Vec<TopicDescriptor>) {
        let mut guard = self.topics.lock().await;
        *guard = topics;
    }

    /// Append a descriptor, keeping identifiers unique.
    ///
    /// Returns `true` when the directory changed, `false` when a descriptor
    /// with the same id was already present.
    pub async fn insert(&self, descriptor: TopicDescriptor) -> bool {
        let mut guard = self.topics.lock().await;
        if guard.iter().any(|t| t.id == descriptor.id) {
            return false;
        }
        guard.push(descriptor);
        true
    }

    /// Remove the descriptor with the given id.
    ///
    /// Returns `true` when a descriptor was removed.
    pub async fn remove(&self, id: &TopicId) -> bool {
        let mut guard = self.topics.lock().await;
        let before = guard.len();
        guard.retain(|t| &t.id != id);
        guard.len() != before
    }

    /// Read-only snapshot in insertion order
    pub async fn snapshot(&self) -> Vec<TopicDescriptor> {
        let guard = self.topics.lock().await;
        guard.clone()
    }

    /// Number of known topics
    pub async fn len(&self) -> usize {
        let guard = self.topics.lock().await;
        guard.len()
    }

    /// Whether the directory holds no topics
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
