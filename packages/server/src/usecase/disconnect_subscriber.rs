//! UseCase: ルームからの購読終了

use std::sync::Arc;

use crate::domain::{ConnectionId, RoomName, RoomRegistry};

/// ルームからの購読終了のユースケース
pub struct DisconnectSubscriberUseCase {
    registry: Arc<dyn RoomRegistry>,
}

impl DisconnectSubscriberUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// 接続をルームから外し、残りの購読者数を返す
    ///
    /// 登録されていない接続の場合は何もしない。
    pub async fn execute(&self, room: &RoomName, connection_id: &ConnectionId) -> usize {
        self.registry.leave(room, connection_id).await;
        self.registry.count_members(room).await
    }
}
