//! メッセージ送信（Broadcast Hub）の実装
//!
//! このモジュールは `MessagePusher` trait の具体的な実装を提供します。
//!
//! - `websocket`: 接続ごとの mpsc チャンネル（WebSocket の送信タスクにつながる）を使った実装

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
