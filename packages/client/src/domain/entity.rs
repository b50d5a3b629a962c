//! Core domain models for the chat client.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use super::value_object::{ListenerName, Timestamp, TopicId};

/// The client's registered presence with the topic server.
///
/// Created once per login and discarded at logout. The `token` is an opaque
/// correlation value so two logins under the same display name stay
/// distinguishable on the server side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    /// Display name registered with the server
    pub name: ListenerName,
    /// Opaque correlation token for this session
    pub token: uuid::Uuid,
}

/// Descriptor of a topic known to the directory.
///
/// Equality and hashing go by `id` only; the description is display text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicDescriptor {
    /// Topic identifier
    pub id: TopicId,
    /// Human-readable description
    pub description: String,
}

impl TopicDescriptor {
    /// Create a new topic descriptor
    pub fn new(id: TopicId, description: String) -> Self {
        Self { id, description }
    }
}

impl PartialEq for TopicDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TopicDescriptor {}

impl Hash for TopicDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Who produced a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sender {
    /// Reserved sentinel for server-originated messages
    System,
    /// An ordinary listener
    Listener(ListenerName),
}

/// Message type tag.
///
/// `TopicCreated` / `TopicRemoved` / `UserJoined` / `UserLeft` are control
/// kinds: when carried by a [`Sender::System`] message they mutate the local
/// caches instead of reaching the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageKind {
    Text,
    Greeting,
    TypingNotice,
    TopicCreated,
    TopicRemoved,
    UserJoined,
    UserLeft,
}

/// A single inbound or outbound chat message.
///
/// Immutable once constructed. The `content` payload is opaque to everything
/// except the dispatcher, which parses it for control kinds (JSON-encoded
/// [`TopicDescriptor`] or [`Identity`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message originator
    pub sender: Sender,
    /// Type tag
    pub kind: MessageKind,
    /// Opaque content payload
    pub content: String,
    /// Timestamp when the message was produced (JST, milliseconds)
    pub sent_at: Timestamp,
}

impl Message {
    /// Create a message with an arbitrary sender/kind/payload combination
    pub fn new(sender: Sender, kind: MessageKind, content: String, sent_at: Timestamp) -> Self {
        Self {
            sender,
            kind,
            content,
            sent_at,
        }
    }

    /// User text message
    pub fn text(from: ListenerName, content: String, sent_at: Timestamp) -> Self {
        Self::new(Sender::Listener(from), MessageKind::Text, content, sent_at)
    }

    /// User greeting message
    pub fn greeting(from: ListenerName, content: String, sent_at: Timestamp) -> Self {
        Self::new(
            Sender::Listener(from),
            MessageKind::Greeting,
            content,
            sent_at,
        )
    }

    /// Typing notice from a user
    pub fn typing_notice(from: ListenerName, sent_at: Timestamp) -> Self {
        Self::new(
            Sender::Listener(from),
            MessageKind::TypingNotice,
            String::new(),
            sent_at,
        )
    }

    /// System text message (user-visible, not a control message)
    pub fn system_text(content: String, sent_at: Timestamp) -> Self {
        Self::new(Sender::System, MessageKind::Text, content, sent_at)
    }

    /// Control message announcing a newly created topic
    pub fn topic_created(descriptor: &TopicDescriptor, sent_at: Timestamp) -> Self {
        Self::control(MessageKind::TopicCreated, descriptor, sent_at)
    }

    /// Control message announcing a removed topic
    pub fn topic_removed(descriptor: &TopicDescriptor, sent_at: Timestamp) -> Self {
        Self::control(MessageKind::TopicRemoved, descriptor, sent_at)
    }

    /// Control message announcing a listener joining the active topic
    pub fn user_joined(identity: &Identity, sent_at: Timestamp) -> Self {
        Self::control(MessageKind::UserJoined, identity, sent_at)
    }

    /// Control message announcing a listener leaving the active topic
    pub fn user_left(identity: &Identity, sent_at: Timestamp) -> Self {
        Self::control(MessageKind::UserLeft, identity, sent_at)
    }

    // Control payloads are plain string-keyed structs; serializing them to
    // JSON cannot fail.
    fn control(kind: MessageKind, payload: &impl Serialize, sent_at: Timestamp) -> Self {
        Self::new(
            Sender::System,
            kind,
            serde_json::to_string(payload).expect("control payload serializes to JSON"),
            sent_at,
        )
    }

    /// Whether this message came from the reserved system sentinel
    pub fn is_system(&self) -> bool {
        self.sender == Sender::System
    }
}
