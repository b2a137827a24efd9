//! UseCase: スレッドのコメント取得
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - GetThreadCommentsUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 投稿したコメントが本文・投稿者・タイムスタンプ付きで読めることを確認
//! - 参加者のプロフィールが一緒に返ることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：コメントのあるスレッド
//! - エッジケース：存在しないスレッド（空として返る）、プロフィールのない参加者
//! - 異常系：空のスレッド ID、ストア障害

use std::sync::Arc;

use crate::domain::{CommentRepository, Thread, ThreadId, UserProfile, UserRepository};

use super::error::GetThreadError;

/// スレッドとその参加者のプロフィール
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadComments {
    pub thread: Thread,
    /// プロフィールが見つかった参加者のみ
    pub profiles: Vec<UserProfile>,
}

/// スレッドのコメント取得のユースケース
pub struct GetThreadCommentsUseCase {
    comments: Arc<dyn CommentRepository>,
    users: Arc<dyn UserRepository>,
}

impl GetThreadCommentsUseCase {
    pub fn new(comments: Arc<dyn CommentRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { comments, users }
    }

    /// スレッドを取得する。存在しないスレッドは空のスレッドとして返す。
    pub async fn execute(&self, thread: String) -> Result<ThreadComments, GetThreadError> {
        let thread_id = ThreadId::new(thread)?;
        let thread = self
            .comments
            .get_thread(&thread_id)
            .await
            .map_err(|e| GetThreadError::UpstreamUnavailable(e.to_string()))?
            .unwrap_or_else(|| Thread::empty(thread_id));

        let mut profiles = Vec::with_capacity(thread.participants.len());
        for user in &thread.participants {
            match self.users.get_user(user).await {
                Ok(Some(profile)) => profiles.push(profile),
                Ok(None) => tracing::debug!(user = %user, "Participant has no profile"),
                Err(e) => return Err(GetThreadError::UpstreamUnavailable(e.to_string())),
            }
        }

        Ok(ThreadComments { thread, profiles })
    }
}
