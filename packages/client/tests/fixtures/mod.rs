//! Test fixtures: an in-memory topic server implementing the RPC contract.
//!
//! The fake records every remote call in arrival order so tests can assert
//! sequencing contracts (unsubscribe-before-subscribe, no remote call on
//! local failures). Delivery is push-based through the listener channels,
//! exactly like a real transport would drive the dispatcher.

// 各テストバイナリは fixtures の一部しか使わない
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use idobata_client::{
    ClientEvent, Identity, Message, ServerConnector, ServerError, TopicDescriptor, TopicHandle,
    TopicId, TopicServer,
};

/// One recorded remote call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerCall {
    AddListener(String),
    RemoveListener(String),
    Subscribe { topic: String, listener: String },
    Unsubscribe { topic: String, listener: String },
    ListTopics,
    Publish { topic: String, content: String },
    ListMembers { topic: String },
}

#[derive(Default)]
struct ServerState {
    topics: Mutex<Vec<TopicDescriptor>>,
    listeners: Mutex<HashMap<Identity, UnboundedSender<Vec<Message>>>>,
    members: Mutex<HashMap<String, HashSet<Identity>>>,
    calls: Mutex<Vec<ServerCall>>,
    fail_list_topics_once: AtomicBool,
    fail_subscribe: AtomicBool,
    fail_unsubscribe: AtomicBool,
    fail_remove_listener: AtomicBool,
}

/// In-memory topic server fake
#[derive(Clone, Default)]
pub struct InMemoryTopicServer {
    state: Arc<ServerState>,
}

impl InMemoryTopicServer {
    pub fn with_topics(topics: Vec<TopicDescriptor>) -> Self {
        let server = Self::default();
        *server.state.topics.lock().unwrap() = topics;
        server
    }

    /// Recorded calls in arrival order
    pub fn calls(&self) -> Vec<ServerCall> {
        self.state.calls.lock().unwrap().clone()
    }

    /// Make the next `list_topics` call fail (initial directory load)
    pub fn fail_next_list_topics(&self) {
        self.state.fail_list_topics_once.store(true, Ordering::SeqCst);
    }

    /// Make every `subscribe` call fail
    pub fn fail_subscribe(&self, fail: bool) {
        self.state.fail_subscribe.store(fail, Ordering::SeqCst);
    }

    /// Make every `unsubscribe` call fail
    pub fn fail_unsubscribe(&self, fail: bool) {
        self.state.fail_unsubscribe.store(fail, Ordering::SeqCst);
    }

    /// Make every `remove_listener` call fail
    pub fn fail_remove_listener(&self, fail: bool) {
        self.state.fail_remove_listener.store(fail, Ordering::SeqCst);
    }

    /// Push one batch to every registered listener, like a transport callback
    pub fn deliver(&self, batch: Vec<Message>) {
        let listeners = self.state.listeners.lock().unwrap();
        for sender in listeners.values() {
            let _ = sender.send(batch.clone());
        }
    }

    /// Current membership of a topic, as the server sees it
    pub fn members_of(&self, topic: &TopicId) -> Vec<Identity> {
        let members = self.state.members.lock().unwrap();
        members
            .get(topic.as_str())
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn record(&self, call: ServerCall) {
        self.state.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl TopicServer for InMemoryTopicServer {
    async fn add_listener(
        &self,
        identity: &Identity,
        batches: UnboundedSender<Vec<Message>>,
    ) -> Result<(), ServerError> {
        self.record(ServerCall::AddListener(identity.name.to_string()));
        self.state
            .listeners
            .lock()
            .unwrap()
            .insert(identity.clone(), batches);
        Ok(())
    }

    async fn remove_listener(&self, identity: &Identity) -> Result<(), ServerError> {
        self.record(ServerCall::RemoveListener(identity.name.to_string()));
        if self.state.fail_remove_listener.load(Ordering::SeqCst) {
            return Err(ServerError::Unavailable("deregistration refused".to_string()));
        }
        self.state.listeners.lock().unwrap().remove(identity);
        Ok(())
    }

    async fn subscribe(
        &self,
        descriptor: &TopicDescriptor,
        identity: &Identity,
    ) -> Result<Box<dyn TopicHandle>, ServerError> {
        self.record(ServerCall::Subscribe {
            topic: descriptor.id.to_string(),
            listener: identity.name.to_string(),
        });
        if self.state.fail_subscribe.load(Ordering::SeqCst) {
            return Err(ServerError::Unavailable("subscribe refused".to_string()));
        }
        self.state
            .members
            .lock()
            .unwrap()
            .entry(descriptor.id.to_string())
            .or_default()
            .insert(identity.clone());
        Ok(Box::new(InMemoryTopicHandle {
            server: self.clone(),
            descriptor: descriptor.clone(),
        }))
    }

    async fn unsubscribe(
        &self,
        descriptor: &TopicDescriptor,
        identity: &Identity,
    ) -> Result<(), ServerError> {
        self.record(ServerCall::Unsubscribe {
            topic: descriptor.id.to_string(),
            listener: identity.name.to_string(),
        });
        if self.state.fail_unsubscribe.load(Ordering::SeqCst) {
            return Err(ServerError::Unavailable("unsubscribe refused".to_string()));
        }
        if let Some(set) = self
            .state
            .members
            .lock()
            .unwrap()
            .get_mut(descriptor.id.as_str())
        {
            set.remove(identity);
        }
        Ok(())
    }

    async fn list_topics(&self) -> Result<Vec<TopicDescriptor>, ServerError> {
        self.record(ServerCall::ListTopics);
        if self.state.fail_list_topics_once.swap(false, Ordering::SeqCst) {
            return Err(ServerError::Unavailable("directory load failed".to_string()));
        }
        Ok(self.state.topics.lock().unwrap().clone())
    }
}

struct InMemoryTopicHandle {
    server: InMemoryTopicServer,
    descriptor: TopicDescriptor,
}

#[async_trait]
impl TopicHandle for InMemoryTopicHandle {
    async fn publish(&self, message: Message) -> Result<(), ServerError> {
        self.server.record(ServerCall::Publish {
            topic: self.descriptor.id.to_string(),
            content: message.content.clone(),
        });
        // Fan out to every listener subscribed to this topic, sender included
        let members = self
            .server
            .state
            .members
            .lock()
            .unwrap()
            .get(self.descriptor.id.as_str())
            .cloned()
            .unwrap_or_default();
        let listeners = self.server.state.listeners.lock().unwrap();
        for (identity, sender) in listeners.iter() {
            if members.contains(identity) {
                let _ = sender.send(vec![message.clone()]);
            }
        }
        Ok(())
    }

    async fn list_members(&self) -> Result<Vec<Identity>, ServerError> {
        self.server.record(ServerCall::ListMembers {
            topic: self.descriptor.id.to_string(),
        });
        Ok(self.server.members_of(&self.descriptor.id))
    }
}

/// Connector fixture resolving to the in-memory server
pub struct FixtureConnector {
    server: InMemoryTopicServer,
    reachable: AtomicBool,
}

impl FixtureConnector {
    pub fn new(server: InMemoryTopicServer) -> Self {
        Self {
            server,
            reachable: AtomicBool::new(true),
        }
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }
}

#[async_trait]
impl ServerConnector for FixtureConnector {
    async fn connect(&self) -> Result<Arc<dyn TopicServer>, ServerError> {
        if !self.reachable.load(Ordering::SeqCst) {
            return Err(ServerError::Unavailable("registry unreachable".to_string()));
        }
        Ok(Arc::new(self.server.clone()))
    }
}

/// Build a descriptor for tests
pub fn descriptor(id: &str) -> TopicDescriptor {
    TopicDescriptor::new(
        TopicId::new(id.to_string()).expect("valid topic id"),
        format!("topic {id}"),
    )
}

/// Receive the next event with a safety timeout
pub async fn next_event(events: &mut UnboundedReceiver<ClientEvent>) -> ClientEvent {
    tokio::time::timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event queue closed")
}
