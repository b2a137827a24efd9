//! 永続化後の副作用（スパム分類・通知）のインターフェース
//!
//! 副作用は fire-and-forget。UseCase は `SideEffectDispatcher` にジョブを渡すだけで、
//! 結果を待たない。ジョブの実行と失敗時のログ出力は Infrastructure 層のキューが担う。

use async_trait::async_trait;

use super::{
    entity::SpamReport,
    error::SideEffectError,
    value_object::{CommentId, CommentText, ThreadId, Timestamp, UserId},
};

/// スパム・有害判定の分類器（外部コラボレータ）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpamClassifier: Send + Sync {
    /// `correlation_id` は判定対象のコメント ID
    async fn classify(
        &self,
        text: &str,
        correlation_id: &CommentId,
    ) -> Result<SpamReport, SideEffectError>;
}

/// コメント投稿の通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentNotification {
    pub sender: UserId,
    pub timestamp: Timestamp,
    pub thread: ThreadId,
    pub text: CommentText,
    pub display_name: String,
    pub photo_url: Option<String>,
}

/// プッシュ通知の送信（外部コラボレータ）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentNotifier: Send + Sync {
    async fn notify(&self, notification: CommentNotification) -> Result<(), SideEffectError>;
}

/// キューに積まれる副作用ジョブ
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    /// 分類し、結果をコメントの spam に書き戻す
    ClassifyComment {
        thread: ThreadId,
        comment: CommentId,
        text: CommentText,
    },
    NotifyComment(CommentNotification),
}

impl SideEffect {
    /// ログ用のジョブ種別
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ClassifyComment { .. } => "classify_comment",
            Self::NotifyComment(_) => "notify_comment",
        }
    }
}

/// 副作用ジョブの投入口
///
/// 呼び出し元をブロックしない。投入に失敗してもエラーは返さない（ログのみ）。
#[cfg_attr(test, mockall::automock)]
pub trait SideEffectDispatcher: Send + Sync {
    fn dispatch(&self, job: SideEffect);
}
