//! Idobata chat client session layer.
//!
//! This library sits between a remote topic server (an opaque RPC boundary
//! modeled by the [`domain::server::TopicServer`] trait) and a presentation
//! layer (a single-consumer event queue). It owns the session identity, the
//! single active topic subscription, the cached topic directory and roster,
//! and the batched inbound message dispatch pipeline.

pub mod domain;
pub mod infrastructure;
pub mod usecase;

// Re-export the public surface
pub use domain::{
    Identity, IdentityFactory, ListenerName, Message, MessageKind, Sender, Timestamp, TopicDescriptor,
    TopicId,
};
pub use domain::server::{ServerConnector, ServerError, TopicHandle, TopicServer};
pub use usecase::{
    ChatSession, ClientEvent, DispatchError, MessageDispatcher, SessionError, SubscriptionError,
};
