//! UseCase layer error definitions.

use thiserror::Error;

use crate::domain::MessageKind;
use crate::domain::error::ValueObjectError;
use crate::domain::server::ServerError;

/// Errors from session lifecycle operations (login/logout)
#[derive(Debug, Error)]
pub enum SessionError {
    /// A second login was attempted while an identity exists
    #[error("already logged in as '{0}'")]
    AlreadyLoggedIn(String),

    /// A session operation requires a login that never happened
    #[error("not logged in")]
    NotLoggedIn,

    /// The requested display name failed validation
    #[error("invalid listener name")]
    InvalidName(#[from] ValueObjectError),

    /// Connection establishment, directory load, or a remote call failed
    #[error("server unavailable")]
    ServerUnavailable(#[from] ServerError),
}

/// Errors from subscription operations (subscribe/unsubscribe/publish/roster)
#[derive(Debug, Error)]
pub enum SubscriptionError {
    /// Subscription operations require a valid identity
    #[error("not logged in")]
    NotLoggedIn,

    /// publish/roster were called with no bound topic
    #[error("no active topic")]
    NoActiveTopic,

    /// The remote call failed
    #[error("server unavailable")]
    ServerUnavailable(#[from] ServerError),
}

/// A failure while classifying or routing one inbound message.
///
/// Reported on the event channel; never aborts the batch or the session.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A system control message carried an unparseable payload
    #[error("malformed {kind:?} control payload")]
    MalformedControl {
        kind: MessageKind,
        #[source]
        source: serde_json::Error,
    },

    /// The presentation event queue was dropped by its consumer
    #[error("presentation event queue closed")]
    SinkClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_error_display() {
        // テスト項目: エラーメッセージにコンテキストが含まれる
        // when (操作):
        let error = SessionError::AlreadyLoggedIn("alice".to_string());

        // then (期待する結果):
        assert_eq!(error.to_string(), "already logged in as 'alice'");
    }

    #[test]
    fn test_server_error_converts_into_layer_errors() {
        // テスト項目: ServerError が各レイヤーのエラーに変換できる
        // given (前提条件):
        let unavailable = || ServerError::Unavailable("registry down".to_string());

        // when (操作):
        let session: SessionError = unavailable().into();
        let subscription: SubscriptionError = unavailable().into();

        // then (期待する結果):
        assert!(matches!(session, SessionError::ServerUnavailable(_)));
        assert!(matches!(
            subscription,
            SubscriptionError::ServerUnavailable(_)
        ));
    }
}
