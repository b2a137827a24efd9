//! Entities
//!
//! コメントスレッドと購読者（接続）のドメインモデル。

use std::collections::BTreeSet;

use super::{
    message_pusher::PusherChannel,
    value_object::{CommentId, CommentText, ConnectionId, ThreadId, Timestamp, UserId},
};

/// ルームに参加している接続
///
/// 接続ごとの送信チャンネルを持つ。送信先の型 `P` はブロードキャストする
/// ペイロードの型（通常は JSON 文字列）。
#[derive(Debug)]
pub struct Subscriber<P = String> {
    pub id: ConnectionId,
    pub channel: PusherChannel<P>,
    pub joined_at: Timestamp,
}

impl<P> Subscriber<P> {
    pub fn new(id: ConnectionId, channel: PusherChannel<P>, joined_at: Timestamp) -> Self {
        Self {
            id,
            channel,
            joined_at,
        }
    }
}

// derive(Clone) would require `P: Clone`; the sender itself is always cloneable.
impl<P> Clone for Subscriber<P> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            channel: self.channel.clone(),
            joined_at: self.joined_at,
        }
    }
}

/// スパム判定の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpamReport {
    /// スパム報告・検出の件数
    pub count: u32,
    /// 有害判定（未判定の場合は `None`）
    pub toxic: Option<bool>,
}

impl SpamReport {
    /// 判定前のプレースホルダ（`count=0, toxic=null`）
    pub fn placeholder() -> Self {
        Self::default()
    }
}

/// ユーザープロフィール
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub display_name: String,
    pub photo_url: Option<String>,
}

impl UserProfile {
    pub fn new(id: UserId, display_name: String, photo_url: Option<String>) -> Self {
        Self {
            id,
            display_name,
            photo_url,
        }
    }
}

/// 永続化前のコメント（ID はストアが採番する）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub text: CommentText,
    pub user: UserId,
    pub timestamp: Timestamp,
}

/// 永続化済みのコメント
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub thread: ThreadId,
    pub text: CommentText,
    pub user: UserId,
    pub timestamp: Timestamp,
    /// 分類器の結果。非同期に埋められるため作成直後は `None`
    pub spam: Option<SpamReport>,
}

impl Comment {
    /// 分類済みならその結果、未分類ならプレースホルダ
    pub fn spam_or_placeholder(&self) -> SpamReport {
        self.spam.unwrap_or_else(SpamReport::placeholder)
    }
}

/// コメントスレッド
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thread {
    pub id: ThreadId,
    pub participants: BTreeSet<UserId>,
    /// 追加順
    pub comments: Vec<Comment>,
}

impl Thread {
    pub fn empty(id: ThreadId) -> Self {
        Self {
            id,
            participants: BTreeSet::new(),
            comments: Vec::new(),
        }
    }

    /// 参加者を追加（既に含まれている場合は何もしない）
    ///
    /// 新規に追加された場合は `true` を返す。
    pub fn add_participant(&mut self, user: UserId) -> bool {
        self.participants.insert(user)
    }

    pub fn push_comment(&mut self, id: CommentId, comment: NewComment) -> &Comment {
        self.comments.push(Comment {
            id,
            thread: self.id.clone(),
            text: comment.text,
            user: comment.user,
            timestamp: comment.timestamp,
            spam: None,
        });
        // just pushed
        &self.comments[self.comments.len() - 1]
    }

    pub fn find_comment_mut(&mut self, id: &CommentId) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|c| &c.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}
