//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    entity::{NewComment, SpamReport, Subscriber, Thread, UserProfile},
    error::RepositoryError,
    geo::Event,
    value_object::{CommentId, ConnectionId, RoomName, ThreadId, UserId},
};

/// コメントスレッドのストア
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// スレッドを取得（存在しない場合は `None`）
    async fn get_thread(&self, thread: &ThreadId) -> Result<Option<Thread>, RepositoryError>;

    /// コメントを追加し、ストアが採番した ID を返す
    async fn append_comment(
        &self,
        thread: &ThreadId,
        comment: NewComment,
    ) -> Result<CommentId, RepositoryError>;

    /// 参加者を追加（冪等）
    async fn add_participant(
        &self,
        thread: &ThreadId,
        user: &UserId,
    ) -> Result<(), RepositoryError>;

    /// 分類器の結果をコメントに反映
    async fn update_spam(
        &self,
        thread: &ThreadId,
        comment: &CommentId,
        report: SpamReport,
    ) -> Result<(), RepositoryError>;
}

/// 位置情報イベントのストア
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// 全イベントを取得（空間インデックスは前提としない）
    async fn scan_events(&self) -> Result<Vec<Event>, RepositoryError>;

    /// イベントを追加（同じ ID の場合は置き換え）
    async fn insert_event(&self, event: Event) -> Result<(), RepositoryError>;
}

/// ユーザープロフィールのストア
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user(&self, user: &UserId) -> Result<Option<UserProfile>, RepositoryError>;

    async fn upsert_user(&self, profile: UserProfile) -> Result<(), RepositoryError>;
}

/// Room Registry
///
/// ルームとメンバー（接続）の対応を管理する。全操作は並行に呼ばれても安全であること。
#[async_trait]
pub trait RoomRegistry<P = String>: Send + Sync
where
    P: Send + 'static,
{
    /// 接続をルームに参加させる（同じ接続が既にいる場合は置き換え）
    async fn join(&self, room: &RoomName, subscriber: Subscriber<P>);

    /// 接続をルームから外す（参加していない場合は何もしない）
    async fn leave(&self, room: &RoomName, connection_id: &ConnectionId);

    /// その時点のメンバーのスナップショット
    async fn members(&self, room: &RoomName) -> Vec<Subscriber<P>>;

    /// ルーム内の特定のメンバー
    async fn member(
        &self,
        room: &RoomName,
        connection_id: &ConnectionId,
    ) -> Option<Subscriber<P>>;

    /// ルームのメンバー数
    async fn count_members(&self, room: &RoomName) -> usize;

    /// メンバーがいるルームの一覧（ルーム名とメンバー数、ルーム名の昇順）
    async fn rooms(&self) -> Vec<(RoomName, usize)>;
}
