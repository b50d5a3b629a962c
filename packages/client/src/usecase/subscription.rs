//! UseCase: トピック購読の管理
//!
//! アクティブなトピックを高々一つに保ち、切り替えを
//! 「unsubscribe してから subscribe」という順序契約として実装します。
//! 名簿は購読時には読み込まず、最初のアクセスで一度だけフェッチします。

use std::sync::Arc;

use crate::domain::server::{ServerError, TopicHandle, TopicServer};
use crate::domain::{Identity, Message, TopicDescriptor};
use crate::infrastructure::RosterCache;

use super::error::SubscriptionError;

struct ActiveTopic {
    handle: Box<dyn TopicHandle>,
    descriptor: TopicDescriptor,
}

/// Owns the single active topic binding for a session.
///
/// The session manager provides the server proxy and identity per call;
/// the controller itself never holds the connection.
pub struct SubscriptionController {
    current: Option<ActiveTopic>,
    roster: Arc<RosterCache>,
}

impl SubscriptionController {
    /// Create a controller with no active topic
    pub fn new(roster: Arc<RosterCache>) -> Self {
        Self {
            current: None,
            roster,
        }
    }

    /// Whether a topic is currently bound
    pub fn is_subscribed(&self) -> bool {
        self.current.is_some()
    }

    /// Descriptor of the active topic, if any
    pub fn current_topic(&self) -> Option<&TopicDescriptor> {
        self.current.as_ref().map(|active| &active.descriptor)
    }

    /// Bind to a topic, unsubscribing from the previous one first.
    ///
    /// A switch is always modeled as unsubscribe-then-subscribe. When the
    /// subscribe call fails after that step, the session deliberately ends
    /// up with no active topic instead of silently keeping the old one.
    pub async fn subscribe(
        &mut self,
        server: &dyn TopicServer,
        identity: &Identity,
        descriptor: TopicDescriptor,
    ) -> Result<(), ServerError> {
        if self.current.is_some() {
            self.unsubscribe(server, identity).await?;
        }

        let handle = server.subscribe(&descriptor, identity).await?;
        tracing::info!(topic = %descriptor.id, "subscribed");
        self.current = Some(ActiveTopic { handle, descriptor });
        self.roster.activate().await;
        Ok(())
    }

    /// Unbind the active topic; no-op when none is bound.
    ///
    /// Local state is cleared before the remote call returns, so a failed
    /// unsubscribe still leaves the session in the no-active-topic state.
    pub async fn unsubscribe(
        &mut self,
        server: &dyn TopicServer,
        identity: &Identity,
    ) -> Result<(), ServerError> {
        let Some(active) = self.current.take() else {
            return Ok(());
        };
        self.roster.deactivate().await;

        server.unsubscribe(&active.descriptor, identity).await?;
        tracing::info!(topic = %active.descriptor.id, "unsubscribed");
        Ok(())
    }

    /// Publish a message into the active topic.
    ///
    /// Fails with [`SubscriptionError::NoActiveTopic`] before touching the
    /// server when no topic is bound.
    pub async fn publish(&self, message: Message) -> Result<(), SubscriptionError> {
        let active = self
            .current
            .as_ref()
            .ok_or(SubscriptionError::NoActiveTopic)?;
        active.handle.publish(message).await?;
        Ok(())
    }

    /// Membership of the active topic.
    ///
    /// Fetched from the server once on first access, then served from the
    /// roster cache until the next unsubscribe.
    pub async fn roster(&self) -> Result<Vec<Identity>, SubscriptionError> {
        let active = self
            .current
            .as_ref()
            .ok_or(SubscriptionError::NoActiveTopic)?;

        if let Some(members) = self.roster.members().await {
            return Ok(members);
        }

        let members = active.handle.list_members().await?;
        self.roster.load(members.clone()).await;
        Ok(members)
    }
}
