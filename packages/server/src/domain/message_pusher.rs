//! MessagePusher trait 定義
//!
//! ルーム単位のブロードキャスト（Broadcast Hub）のインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    error::MessagePushError,
    value_object::{ConnectionId, RoomName},
};

/// 接続ごとの送信バッファの容量
pub const PUSHER_CHANNEL_CAPACITY: usize = 64;

/// 接続ごとの送信チャンネル
///
/// バッファが一杯の接続への送信は待たずに失敗する。
pub type PusherChannel<P = String> = mpsc::Sender<P>;

/// Broadcast Hub
///
/// ペイロードの中身は解釈しない（`P` は不透明な値として転送される）。
#[async_trait]
pub trait MessagePusher<P = String>: Send + Sync
where
    P: Clone + Send + Sync + 'static,
{
    /// ルームの全メンバーにペイロードを配信
    ///
    /// 配信はベストエフォート。個々の接続への送信失敗はログに記録してスキップし、
    /// 呼び出し元にはエラーを返さない。メンバーがいないルームへの publish は何もしない。
    ///
    /// # Returns
    ///
    /// 送信に成功した接続の数
    async fn publish(&self, room: &RoomName, payload: P) -> usize;

    /// ルーム内の特定の接続にだけペイロードを送信
    async fn push_to(
        &self,
        room: &RoomName,
        connection_id: &ConnectionId,
        payload: P,
    ) -> Result<(), MessagePushError>;
}
