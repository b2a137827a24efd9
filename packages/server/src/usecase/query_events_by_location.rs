//! UseCase: 位置情報によるイベント取得とクラスタリング
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - QueryEventsByLocationUseCase::query() / execute() / reply_failure()
//!
//! ### なぜこのテストが必要か
//! - 距離によるフィルタとクラスタリングの結果がルームの全メンバーに配信されることを確認
//! - ストア障害・エンコード失敗時は何も配信されないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：クラスタリングなし / あり
//! - 異常系：ストア障害、エンコード失敗
//! - エッジケース：メンバーのいないルームへの配信

use std::sync::Arc;

use crate::domain::{
    ConnectionId, EventRepository, FeedItem, GeoQuery, MessagePusher, PayloadEncoder, RoomName,
    Viewport,
};

use super::error::QueryEventsError;

/// 位置情報クエリのユースケース
pub struct QueryEventsByLocationUseCase {
    /// EventRepository（イベントストアの抽象化）
    events: Arc<dyn EventRepository>,
    /// MessagePusher（結果の配信）
    message_pusher: Arc<dyn MessagePusher>,
    encoder: Arc<dyn PayloadEncoder>,
}

impl QueryEventsByLocationUseCase {
    pub fn new(
        events: Arc<dyn EventRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        encoder: Arc<dyn PayloadEncoder>,
    ) -> Self {
        Self {
            events,
            message_pusher,
            encoder,
        }
    }

    /// 検証済みのクエリを評価する
    ///
    /// 半径内のイベントを ID 順に返す。閾値が正ならクラスタにまとめる。
    pub async fn query(&self, query: &GeoQuery) -> Result<Vec<FeedItem>, QueryEventsError> {
        let events = self
            .events
            .scan_events()
            .await
            .map_err(|e| QueryEventsError::UpstreamUnavailable(e.to_string()))?;
        let scanned = events.len();
        let items = query.evaluate(events);
        tracing::debug!(
            scanned,
            items = items.len(),
            max_distance_km = query.max_distance_km,
            cluster_threshold_km = query.cluster_threshold_km,
            "Evaluated geo query"
        );
        Ok(items)
    }

    /// クエリを評価し、結果を viewport と共にルームの全メンバーに配信する
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 配信に成功した接続の数
    /// * `Err(QueryEventsError)` - ストア読み出し・エンコードの失敗（何も配信されない）
    pub async fn execute(
        &self,
        room: &RoomName,
        query: &GeoQuery,
        viewport: &Viewport,
    ) -> Result<usize, QueryEventsError> {
        let items = self.query(query).await?;
        let json = self
            .encoder
            .events_by_location(items, viewport)
            .map_err(|e| QueryEventsError::Encode(e.to_string()))?;

        Ok(self.message_pusher.publish(room, json).await)
    }

    /// 失敗をリクエストした接続にだけ通知する
    pub async fn reply_failure(
        &self,
        room: &RoomName,
        connection_id: &ConnectionId,
        error: &QueryEventsError,
    ) {
        let json = match self.encoder.query_failed(&error.to_string()) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to encode failure reply: {}", e);
                return;
            }
        };
        if let Err(e) = self
            .message_pusher
            .push_to(room, connection_id, json)
            .await
        {
            tracing::warn!(connection = %connection_id, "Failed to send failure reply: {}", e);
        }
    }
}
