//! UseCase: ルームへの購読開始
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectSubscriberUseCase::execute() メソッド
//! - Room Registry への登録と、登録直後の ROOM_SUBSCRIBED 通知
//!
//! ### なぜこのテストが必要か
//! - 接続がルームに登録されないと、以降のブロードキャストが届かない
//! - 購読通知はその接続だけに届き、他のメンバーには届かないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：空のルームへの参加
//! - 正常系：既存メンバーがいるルームへの参加（購読者数が増える）

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ConnectionId, MessagePusher, PayloadEncoder, PusherChannel, RoomName, RoomRegistry, Subscriber,
    Timestamp,
};

/// 購読開始の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub connection_id: ConnectionId,
    pub room: RoomName,
    pub joined_at: Timestamp,
    /// 参加後のルームの購読者数（自分を含む）
    pub subscribers: usize,
}

/// ルームへの購読開始のユースケース
pub struct ConnectSubscriberUseCase {
    /// Room Registry（ルームのメンバー管理）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（購読通知の送信）
    message_pusher: Arc<dyn MessagePusher>,
    encoder: Arc<dyn PayloadEncoder>,
    clock: Arc<dyn Clock>,
}

impl ConnectSubscriberUseCase {
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        encoder: Arc<dyn PayloadEncoder>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            encoder,
            clock,
        }
    }

    /// 接続をルームに登録し、その接続に ROOM_SUBSCRIBED を送る
    ///
    /// # Arguments
    ///
    /// * `room` - 参加するルーム
    /// * `channel` - この接続への送信チャンネル
    pub async fn execute(&self, room: RoomName, channel: PusherChannel) -> Subscription {
        let connection_id = ConnectionId::generate();
        let joined_at = Timestamp::new(self.clock.now_millis());

        self.registry
            .join(&room, Subscriber::new(connection_id, channel, joined_at))
            .await;
        let subscribers = self.registry.count_members(&room).await;

        match self.encoder.room_subscribed(&room, subscribers) {
            Ok(json) => {
                if let Err(e) = self
                    .message_pusher
                    .push_to(&room, &connection_id, json)
                    .await
                {
                    tracing::warn!(
                        room = %room,
                        connection = %connection_id,
                        "Failed to send subscription ack: {}",
                        e
                    );
                }
            }
            Err(e) => tracing::error!("Failed to encode subscription ack: {}", e),
        }

        Subscription {
            connection_id,
            room,
            joined_at,
            subscribers,
        }
    }
}
