//! UseCase: 購読中のルーム一覧

use std::sync::Arc;

use crate::domain::{RoomName, RoomRegistry};

pub struct ListRoomsUseCase {
    registry: Arc<dyn RoomRegistry>,
}

impl ListRoomsUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// メンバーのいるルームと購読者数（ルーム名順）
    pub async fn execute(&self) -> Vec<(RoomName, usize)> {
        self.registry.rooms().await
    }
}
