//! UseCase: 受信メッセージのディスパッチ
//!
//! トランスポートから届くメッセージバッチを分類し、制御メッセージは
//! キャッシュへ、通常メッセージは表示層のイベントキューへ振り分けます。
//!
//! バッチは単一の消費タスクで一つずつ処理されるため、バッチ間の相互排他は
//! 構造的に保証されます。トランスポート側のコールバックは unbounded チャンネル
//! への送信だけで完了し、ブロックしません。

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::domain::{Identity, Message, MessageKind, Sender, TopicDescriptor};
use crate::infrastructure::{DirectoryCache, RosterCache};

use super::error::DispatchError;

/// Events pushed to the presentation layer's single-consumer queue.
#[derive(Debug)]
pub enum ClientEvent {
    /// A user-visible message, in batch-preserving order
    Message(Message),
    /// The topic directory was mutated by a control message
    DirectoryChanged,
    /// The active-topic roster was mutated by a control message
    RosterChanged,
    /// A single message failed to classify or route; the batch continued
    Error(DispatchError),
}

/// 受信バッチの分類・ルーティングを行うディスパッチャ
pub struct MessageDispatcher {
    directory: Arc<DirectoryCache>,
    roster: Arc<RosterCache>,
    events: UnboundedSender<ClientEvent>,
}

impl MessageDispatcher {
    /// Spawn the dispatcher task.
    ///
    /// Returns the batch delivery channel (handed to the server via
    /// `add_listener`) and the task handle. The task exits when every
    /// sender of the batch channel is dropped.
    pub fn spawn(
        directory: Arc<DirectoryCache>,
        roster: Arc<RosterCache>,
        events: UnboundedSender<ClientEvent>,
    ) -> (UnboundedSender<Vec<Message>>, JoinHandle<()>) {
        let (batch_tx, batch_rx) = mpsc::unbounded_channel();
        let dispatcher = Self {
            directory,
            roster,
            events,
        };
        let handle = tokio::spawn(dispatcher.run(batch_rx));
        (batch_tx, handle)
    }

    async fn run(self, mut batches: UnboundedReceiver<Vec<Message>>) {
        while let Some(batch) = batches.recv().await {
            self.process_batch(batch).await;
        }
        tracing::debug!("dispatcher channel closed, stopping");
    }

    /// Process one batch fully, message by message in arrival order.
    ///
    /// A failure on one message is reported on the event channel and does
    /// not abort the rest of the batch.
    async fn process_batch(&self, batch: Vec<Message>) {
        for message in batch {
            let kind = message.kind;
            if let Err(error) = self.route(message).await {
                tracing::warn!(?kind, %error, "failed to route inbound message");
                let _ = self.events.send(ClientEvent::Error(error));
            }
        }
    }

    async fn route(&self, message: Message) -> Result<(), DispatchError> {
        match message.sender {
            Sender::System => match message.kind {
                MessageKind::TopicCreated => {
                    let descriptor = parse_control::<TopicDescriptor>(&message)?;
                    if self.directory.insert(descriptor).await {
                        self.notify(ClientEvent::DirectoryChanged);
                    }
                    Ok(())
                }
                MessageKind::TopicRemoved => {
                    let descriptor = parse_control::<TopicDescriptor>(&message)?;
                    if self.directory.remove(&descriptor.id).await {
                        self.notify(ClientEvent::DirectoryChanged);
                    }
                    Ok(())
                }
                MessageKind::UserJoined => {
                    if !self.roster.is_active().await {
                        // Stale relative to a completed unsubscribe; defined no-op
                        return Ok(());
                    }
                    let identity = parse_control::<Identity>(&message)?;
                    if self.roster.insert(identity).await {
                        self.notify(ClientEvent::RosterChanged);
                    }
                    Ok(())
                }
                MessageKind::UserLeft => {
                    if !self.roster.is_active().await {
                        return Ok(());
                    }
                    let identity = parse_control::<Identity>(&message)?;
                    if self.roster.remove(&identity).await {
                        self.notify(ClientEvent::RosterChanged);
                    }
                    Ok(())
                }
                // A system sender with a content kind is an ordinary message
                MessageKind::Text | MessageKind::Greeting | MessageKind::TypingNotice => {
                    self.forward(message)
                }
            },
            Sender::Listener(_) => self.forward(message),
        }
    }

    fn forward(&self, message: Message) -> Result<(), DispatchError> {
        self.events
            .send(ClientEvent::Message(message))
            .map_err(|_| DispatchError::SinkClosed)
    }

    /// Change notifications are best-effort: a closed queue only matters
    /// for user-visible messages.
    fn notify(&self, event: ClientEvent) {
        let _ = self.events.send(event);
    }
}

fn parse_control<T: serde::de::DeserializeOwned>(message: &Message) -> Result<T, DispatchError> {
    serde_json::from_str(&message.content).map_err(|source| DispatchError::MalformedControl {
        kind: message.kind,
        source,
    })
}
