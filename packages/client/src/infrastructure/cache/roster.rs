//! Cached roster of the active topic.
//!
//! The roster is only meaningful while a topic is bound, and its membership
//! is fetched lazily on first access. That gives the cache three states:
//! no active topic, active but not yet fetched, and loaded. Join/leave
//! control messages apply only to a loaded roster; while unloaded they are
//! dropped, because the pending one-time fetch returns post-event
//! membership from the server anyway.

use std::collections::HashSet;

use tokio::sync::Mutex;

use crate::domain::Identity;

#[derive(Debug, Default)]
enum RosterState {
    /// No topic bound; the roster is undefined
    #[default]
    Inactive,
    /// Topic bound, membership not yet fetched
    Unloaded,
    /// Topic bound, membership cached
    Loaded(HashSet<Identity>),
}

/// Set of participants in the currently subscribed topic.
#[derive(Debug, Default)]
pub struct RosterCache {
    state: Mutex<RosterState>,
}

impl RosterCache {
    /// Create a roster cache with no active topic
    pub fn new() -> Self {
        Self::default()
    }

    /// A topic was bound; membership becomes fetchable but is not loaded yet
    pub async fn activate(&self) {
        let mut state = self.state.lock().await;
        *state = RosterState::Unloaded;
    }

    /// The topic was unbound; the roster is invalidated unconditionally
    pub async fn deactivate(&self) {
        let mut state = self.state.lock().await;
        *state = RosterState::Inactive;
    }

    /// Whether a topic is currently bound (loaded or not)
    pub async fn is_active(&self) -> bool {
        let state = self.state.lock().await;
        !matches!(*state, RosterState::Inactive)
    }

    /// Store the fetched membership (Unloaded -> Loaded)
    pub async fn load(&self, members: Vec<Identity>) {
        let mut state = self.state.lock().await;
        if matches!(*state, RosterState::Inactive) {
            return;
        }
        *state = RosterState::Loaded(members.into_iter().collect());
    }

    /// Cached membership, or `None` unless loaded
    pub async fn members(&self) -> Option<Vec<Identity>> {
        let state = self.state.lock().await;
        match &*state {
            RosterState::Loaded(members) => Some(members.iter().cloned().collect()),
            _ => None,
        }
    }

    /// Apply a join event. Returns `true` when the cached set changed.
    pub async fn insert(&self, identity: Identity) -> bool {
        let mut state = self.state.lock().await;
        match &mut *state {
            RosterState::Loaded(members) => members.insert(identity),
            _ => false,
        }
    }

    /// Apply a leave event. Returns `true` when the cached set changed.
    pub async fn remove(&self, identity: &Identity) -> bool {
        let mut state = self.state.lock().await;
        match &mut *state {
            RosterState::Loaded(members) => members.remove(identity),
            _ => false,
        }
    }
}
