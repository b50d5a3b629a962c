//! UseCase 層
//!
//! セッション・購読・ディスパッチの各ライフサイクルを実装するレイヤー。
//! Domain 層の契約（TopicServer trait）を呼び出し、
//! Infrastructure 層のキャッシュを操作します。

pub mod dispatch;
pub mod error;
pub mod session;
pub mod subscription;

pub use dispatch::{ClientEvent, MessageDispatcher};
pub use error::{DispatchError, SessionError, SubscriptionError};
pub use session::ChatSession;
pub use subscription::SubscriptionController;
