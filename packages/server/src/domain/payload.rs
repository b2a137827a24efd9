//! PayloadEncoder trait 定義
//!
//! UseCase が配信するメッセージのエンコードのインターフェース。
//! UseCase はドメインモデルを渡すだけで、ワイヤー形式は Infrastructure 層が決める。

use super::{
    entity::{Comment, UserProfile},
    error::EncodeError,
    geo::{FeedItem, Viewport},
    value_object::RoomName,
};

/// 配信メッセージのエンコーダ
pub trait PayloadEncoder: Send + Sync {
    /// 購読直後にその接続へ送る確認
    fn room_subscribed(&self, room: &RoomName, subscribers: usize) -> Result<String, EncodeError>;

    /// 位置情報クエリの結果
    fn events_by_location(
        &self,
        items: Vec<FeedItem>,
        viewport: &Viewport,
    ) -> Result<String, EncodeError>;

    /// 位置情報クエリの失敗（リクエストした接続宛て）
    fn query_failed(&self, message: &str) -> Result<String, EncodeError>;

    /// 新着コメント
    fn comment_posted(&self, comment: Comment, author: UserProfile)
    -> Result<String, EncodeError>;
}
