//! UseCase: セッション管理
//!
//! login/logout のライフサイクルとサーバー接続の遅延確立を担う、
//! このライブラリの公開ファサード。購読操作は SubscriptionController に
//! 委譲し、Identity の有無をここで強制します。
//!
//! セッションは single-writer です。変更系の操作（login / logout /
//! subscribe / unsubscribe / publish）は呼び出し側スレッドで同期的に
//! 完了し、同一セッションへ並行に発行してはいけません。

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::domain::server::{ServerConnector, TopicServer};
use crate::domain::{Identity, IdentityFactory, Message, Timestamp, TopicDescriptor};
use crate::infrastructure::{DirectoryCache, RosterCache};

use super::dispatch::{ClientEvent, MessageDispatcher};
use super::error::{SessionError, SubscriptionError};
use super::subscription::SubscriptionController;

/// Client session facade.
///
/// Owns the lazily established connection, the session identity, the
/// subscription controller, and the caches the dispatcher writes into.
pub struct ChatSession {
    connector: Arc<dyn ServerConnector>,
    server: Option<Arc<dyn TopicServer>>,
    identity: Option<Identity>,
    subscription: SubscriptionController,
    directory: Arc<DirectoryCache>,
    batch_tx: UnboundedSender<Vec<Message>>,
}

impl ChatSession {
    /// Create a session and spawn its dispatcher.
    ///
    /// The returned receiver is the presentation layer's single-consumer
    /// event queue; the session only ever enqueues into it.
    pub fn new(connector: Arc<dyn ServerConnector>) -> (Self, UnboundedReceiver<ClientEvent>) {
        let directory = Arc::new(DirectoryCache::new());
        let roster = Arc::new(RosterCache::new());
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (batch_tx, _task) = MessageDispatcher::spawn(directory.clone(), roster.clone(), event_tx);

        let session = Self {
            connector,
            server: None,
            identity: None,
            subscription: SubscriptionController::new(roster),
            directory,
            batch_tx,
        };
        (session, event_rx)
    }

    /// Whether an identity is currently registered
    pub fn is_logged_in(&self) -> bool {
        self.identity.is_some()
    }

    /// The registered identity, if any
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Descriptor of the active topic, if any
    pub fn current_topic(&self) -> Option<&TopicDescriptor> {
        self.subscription.current_topic()
    }

    /// Register with the topic server under the given display name.
    ///
    /// Establishes the connection lazily. Re-login while logged in is
    /// rejected; the caller must log out first.
    pub async fn login(&mut self, name: &str) -> Result<(), SessionError> {
        if let Some(identity) = &self.identity {
            return Err(SessionError::AlreadyLoggedIn(identity.name.to_string()));
        }

        let identity = IdentityFactory::create(name)?;
        let server = self.ensure_connection().await?;
        server.add_listener(&identity, self.batch_tx.clone()).await?;

        tracing::info!(name = %identity.name, "logged in");
        self.identity = Some(identity);
        Ok(())
    }

    /// Deregister and discard the connection. No-op when never logged in.
    ///
    /// Local session state is torn down even when a remote call fails; the
    /// error still propagates to the caller.
    pub async fn logout(&mut self) -> Result<(), SessionError> {
        let Some(identity) = self.identity.take() else {
            return Ok(());
        };
        let Some(server) = self.server.take() else {
            return Ok(());
        };

        // Invariants 1/2: clear the topic binding and roster before the
        // listener deregistration goes out.
        self.subscription
            .unsubscribe(server.as_ref(), &identity)
            .await?;

        server.remove_listener(&identity).await?;
        tracing::info!(name = %identity.name, "logged out");
        Ok(())
    }

    /// Subscribe to a topic, switching via unsubscribe-then-subscribe
    pub async fn subscribe(
        &mut self,
        descriptor: TopicDescriptor,
    ) -> Result<(), SubscriptionError> {
        let (server, identity) = self.require_login()?;
        self.subscription
            .subscribe(server.as_ref(), &identity, descriptor)
            .await?;
        Ok(())
    }

    /// Unsubscribe from the active topic; no-op when none is bound
    pub async fn unsubscribe(&mut self) -> Result<(), SubscriptionError> {
        let (server, identity) = self.require_login()?;
        self.subscription
            .unsubscribe(server.as_ref(), &identity)
            .await?;
        Ok(())
    }

    /// Publish a message into the active topic
    pub async fn publish(&self, message: Message) -> Result<(), SubscriptionError> {
        if self.identity.is_none() {
            return Err(SubscriptionError::NotLoggedIn);
        }
        self.subscription.publish(message).await
    }

    /// Publish a text message authored by the session identity.
    ///
    /// Convenience over [`ChatSession::publish`]: stamps the current
    /// timestamp and fills in the sender name.
    pub async fn publish_text(&self, content: String) -> Result<(), SubscriptionError> {
        use idobata_shared::time::get_jst_timestamp;

        let identity = self
            .identity
            .as_ref()
            .ok_or(SubscriptionError::NotLoggedIn)?;
        let message = Message::text(
            identity.name.clone(),
            content,
            Timestamp::new(get_jst_timestamp()),
        );
        self.subscription.publish(message).await
    }

    /// Membership of the active topic (lazily fetched, then cached)
    pub async fn roster(&self) -> Result<Vec<Identity>, SubscriptionError> {
        if self.identity.is_none() {
            return Err(SubscriptionError::NotLoggedIn);
        }
        self.subscription.roster().await
    }

    /// Snapshot of the cached topic directory
    pub async fn topics(&self) -> Vec<TopicDescriptor> {
        self.directory.snapshot().await
    }

    fn require_login(
        &self,
    ) -> Result<(Arc<dyn TopicServer>, Identity), SubscriptionError> {
        let server = self
            .server
            .clone()
            .ok_or(SubscriptionError::NotLoggedIn)?;
        let identity = self
            .identity
            .clone()
            .ok_or(SubscriptionError::NotLoggedIn)?;
        Ok((server, identity))
    }

    /// Establish the connection on first need.
    ///
    /// The initial directory load is part of establishment: when it fails,
    /// the connection is not recorded, so the next call starts over.
    async fn ensure_connection(&mut self) -> Result<Arc<dyn TopicServer>, SessionError> {
        if let Some(server) = &self.server {
            return Ok(server.clone());
        }

        let server = self.connector.connect().await?;
        let topics = server.list_topics().await?;
        self.directory.replace(topics).await;

        tracing::info!("connected to topic server");
        self.server = Some(server.clone());
        Ok(server)
    }
}
