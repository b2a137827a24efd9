//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - Room Registry からメンバーのスナップショットを取得
//! - スナップショットの各接続へ送信（publish, push_to）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! UI 層は接続ごとに容量付きの `Sender` を作り、Room Registry に登録します。
//! この実装はレジストリのスナップショットを取り、ロックを持たずに送信します。
//!
//! 送信は `try_send` で行い、遅い接続を待ちません。送信失敗（接続が閉じている、
//! バッファが一杯）はその接続だけの問題なので、ログを出して次に進みます。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::error::TrySendError;

use crate::domain::{
    ConnectionId, MessagePushError, MessagePusher, RoomName, RoomRegistry, Subscriber,
};

/// WebSocket を使った MessagePusher 実装
///
/// ペイロードの型 `P` は解釈しない（`Clone` して各接続へ転送するだけ）。
///
/// ## 使用例
///
/// ```ignore
/// let registry = Arc::new(InMemoryRoomRegistry::new());
/// let pusher = WebSocketMessagePusher::new(registry.clone());
///
/// let delivered = pusher.publish(&RoomName::geo_feed(), payload_json).await;
/// ```
pub struct WebSocketMessagePusher<P = String>
where
    P: Send + 'static,
{
    registry: Arc<dyn RoomRegistry<P>>,
}

impl<P> WebSocketMessagePusher<P>
where
    P: Send + 'static,
{
    pub fn new(registry: Arc<dyn RoomRegistry<P>>) -> Self {
        Self { registry }
    }
}

fn deliver<P>(subscriber: &Subscriber<P>, payload: P) -> Result<(), MessagePushError> {
    subscriber
        .channel
        .try_send(payload)
        .map_err(|e| match e {
            TrySendError::Full(_) => MessagePushError::PushFailed("buffer full".to_string()),
            TrySendError::Closed(_) => MessagePushError::PushFailed("connection closed".to_string()),
        })
}

#[async_trait]
impl<P> MessagePusher<P> for WebSocketMessagePusher<P>
where
    P: Clone + Send + Sync + 'static,
{
    async fn publish(&self, room: &RoomName, payload: P) -> usize {
        // レジストリのロックはこの呼び出しの中で解放される
        let members = self.registry.members(room).await;
        if members.is_empty() {
            tracing::debug!(room = %room, "No subscribers, skipping publish");
            return 0;
        }

        let total = members.len();
        let mut delivered = 0;
        for subscriber in &members {
            match deliver(subscriber, payload.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        room = %room,
                        connection = %subscriber.id,
                        "Failed to deliver broadcast, skipping: {}",
                        e
                    );
                }
            }
        }

        tracing::debug!(room = %room, delivered, total, "Published to room");
        delivered
    }

    async fn push_to(
        &self,
        room: &RoomName,
        connection_id: &ConnectionId,
        payload: P,
    ) -> Result<(), MessagePushError> {
        let subscriber = self
            .registry
            .member(room, connection_id)
            .await
            .ok_or_else(|| MessagePushError::ClientNotFound(connection_id.to_string()))?;

        deliver(&subscriber, payload)?;
        tracing::debug!(room = %room, connection = %connection_id, "Pushed message");
        Ok(())
    }
}
