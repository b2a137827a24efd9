//! InMemory Room Registry 実装
//!
//! ドメイン層が定義する RoomRegistry trait の具体的な実装。
//! ルーム名 → (接続 ID → Subscriber) の HashMap を 1 つの Mutex で保護します。
//!
//! ## スナップショット
//!
//! `members()` はロックを取ってメンバーを clone し、ロックを解放してから返します。
//! 送信はロックの外で行われるため、遅い接続が join/leave をブロックすることはありません。
//! leave が完了した接続は、その後のスナップショットには決して含まれません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, RoomName, RoomRegistry, Subscriber};

type Members<P> = HashMap<ConnectionId, Subscriber<P>>;

/// インメモリ Room Registry 実装
pub struct InMemoryRoomRegistry<P = String> {
    rooms: Mutex<HashMap<RoomName, Members<P>>>,
}

impl<P> InMemoryRoomRegistry<P> {
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }
}

impl<P> Default for InMemoryRoomRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<P> RoomRegistry<P> for InMemoryRoomRegistry<P>
where
    P: Send + 'static,
{
    async fn join(&self, room: &RoomName, subscriber: Subscriber<P>) {
        let mut rooms = self.rooms.lock().await;
        let connection_id = subscriber.id;
        let replaced = rooms
            .entry(room.clone())
            .or_default()
            .insert(connection_id, subscriber)
            .is_some();
        tracing::debug!(
            room = %room,
            connection = %connection_id,
            replaced,
            "Connection joined room"
        );
    }

    async fn leave(&self, room: &RoomName, connection_id: &ConnectionId) {
        let mut rooms = self.rooms.lock().await;
        let Some(members) = rooms.get_mut(room) else {
            return;
        };
        if members.remove(connection_id).is_some() {
            tracing::debug!(room = %room, connection = %connection_id, "Connection left room");
        }
        // 最後のメンバーが抜けたルームは削除
        if members.is_empty() {
            rooms.remove(room);
            tracing::debug!(room = %room, "Room is empty, removed");
        }
    }

    async fn members(&self, room: &RoomName) -> Vec<Subscriber<P>> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room)
            .map(|members| members.values().cloned().collect())
            .unwrap_or_default()
    }

    async fn member(
        &self,
        room: &RoomName,
        connection_id: &ConnectionId,
    ) -> Option<Subscriber<P>> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room)
            .and_then(|members| members.get(connection_id))
            .cloned()
    }

    async fn count_members(&self, room: &RoomName) -> usize {
        let rooms = self.rooms.lock().await;
        rooms.get(room).map(HashMap::len).unwrap_or(0)
    }

    async fn rooms(&self) -> Vec<(RoomName, usize)> {
        let rooms = self.rooms.lock().await;
        let mut summary: Vec<(RoomName, usize)> = rooms
            .iter()
            .map(|(name, members)| (name.clone(), members.len()))
            .collect();
        summary.sort_by(|a, b| a.0.cmp(&b.0));
        summary
    }
}
