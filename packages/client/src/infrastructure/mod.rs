//! Infrastructure 層
//!
//! クライアントローカルなインメモリ状態（キャッシュ）を提供します。
//! Dispatcher が書き込み、UseCase 層と表示層が読み取ります。

pub mod cache;

pub use cache::{DirectoryCache, RosterCache};
