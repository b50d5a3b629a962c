//! The remote topic server contract.
//!
//! The transport implements these traits; the usecase layer depends only on
//! them (dependency inversion). Every call is synchronous from the caller's
//! perspective: it runs to completion or fails, with no internal retry and
//! no cancellation.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

use super::entity::{Identity, Message, TopicDescriptor};

/// Errors raised at the RPC boundary
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServerError {
    /// The server could not be reached or the call failed in transit
    #[error("topic server unavailable: {0}")]
    Unavailable(String),
}

/// An active topic binding returned by [`TopicServer::subscribe`].
///
/// Exclusively owned by the subscription controller; at most one exists per
/// session.
#[async_trait]
pub trait TopicHandle: Send + Sync {
    /// Publish a message into the topic
    async fn publish(&self, message: Message) -> Result<(), ServerError>;

    /// List the identities currently subscribed to the topic
    async fn list_members(&self) -> Result<Vec<Identity>, ServerError>;
}

/// The remote topic server proxy.
///
/// Inbound delivery is push-based: `add_listener` hands the server a channel
/// through which it delivers ordered message batches.
#[async_trait]
pub trait TopicServer: Send + Sync {
    /// Register a listener and its batch delivery channel
    async fn add_listener(
        &self,
        identity: &Identity,
        batches: UnboundedSender<Vec<Message>>,
    ) -> Result<(), ServerError>;

    /// Deregister a previously added listener
    async fn remove_listener(&self, identity: &Identity) -> Result<(), ServerError>;

    /// Subscribe the identity to a topic, returning the active binding
    async fn subscribe(
        &self,
        descriptor: &TopicDescriptor,
        identity: &Identity,
    ) -> Result<Box<dyn TopicHandle>, ServerError>;

    /// Unsubscribe the identity from a topic
    async fn unsubscribe(
        &self,
        descriptor: &TopicDescriptor,
        identity: &Identity,
    ) -> Result<(), ServerError>;

    /// Full ordered listing of known topics
    async fn list_topics(&self) -> Result<Vec<TopicDescriptor>, ServerError>;
}

/// Resolves the externally supplied server location into a live proxy.
///
/// Connection establishment is lazy: the session manager calls this on first
/// need and again after a rollback.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServerConnector: Send + Sync {
    /// Resolve and connect to the topic server
    async fn connect(&self) -> Result<Arc<dyn TopicServer>, ServerError>;
}
