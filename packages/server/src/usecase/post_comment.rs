//! UseCase: コメント投稿
//!
//! ## 処理の順序
//!
//! 1. スレッド ID と本文を検証（失敗時は副作用なしで InvalidArgument）
//! 2. コメントを永続化して ID を得る（失敗時は UpstreamUnavailable）
//! 3. 投稿者をスレッドの参加者に追加（失敗はログのみ）
//! 4. スパム分類ジョブを投入
//! 5. 通知ジョブを投入
//! 6. `comments_<thread>` ルームに NEW_COMMENT_RECEIVED を配信
//! 7. コメント ID を返す（3〜6 の結果に関わらず）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - PostCommentUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 永続化が分類・通知・配信より先に行われることを保証
//! - 入力不正・ストア障害のときに副作用が一切起きないことを保証
//! - 配信されるペイロードの形（comments / userData / spam プレースホルダ）を確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：空のスレッドへの初回投稿、同じ投稿者の連続投稿
//! - 異常系：空の本文、空のスレッド ID、ストア障害
//! - エッジケース：参加者の追加だけが失敗する場合

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    Comment, CommentId, CommentNotification, CommentRepository, CommentText, MessagePusher,
    NewComment, PayloadEncoder, RoomName, SideEffect, SideEffectDispatcher, ThreadId, Timestamp,
    UserProfile,
};

use super::error::PostCommentError;

/// コメント投稿のユースケース
pub struct PostCommentUseCase {
    /// CommentRepository（コメントストアの抽象化）
    comments: Arc<dyn CommentRepository>,
    /// SideEffectDispatcher（分類・通知ジョブの投入口）
    side_effects: Arc<dyn SideEffectDispatcher>,
    /// MessagePusher（スレッドのルームへの配信）
    message_pusher: Arc<dyn MessagePusher>,
    encoder: Arc<dyn PayloadEncoder>,
    clock: Arc<dyn Clock>,
}

impl PostCommentUseCase {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        side_effects: Arc<dyn SideEffectDispatcher>,
        message_pusher: Arc<dyn MessagePusher>,
        encoder: Arc<dyn PayloadEncoder>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            comments,
            side_effects,
            message_pusher,
            encoder,
            clock,
        }
    }

    /// コメント投稿を実行
    ///
    /// # Arguments
    ///
    /// * `thread` - スレッド ID（未検証の文字列）
    /// * `text` - コメント本文（未検証の文字列）
    /// * `author` - 認証済みの投稿者
    ///
    /// # Returns
    ///
    /// * `Ok(CommentId)` - ストアが採番したコメント ID
    /// * `Err(PostCommentError)` - 検証または永続化の失敗
    pub async fn execute(
        &self,
        thread: String,
        text: String,
        author: UserProfile,
    ) -> Result<CommentId, PostCommentError> {
        // 1. 検証
        let thread = ThreadId::new(thread)?;
        let text = CommentText::new(text)?;
        let timestamp = Timestamp::new(self.clock.now_millis());

        // 2. 永続化
        let comment_id = self
            .comments
            .append_comment(
                &thread,
                NewComment {
                    text: text.clone(),
                    user: author.id.clone(),
                    timestamp,
                },
            )
            .await
            .map_err(|e| PostCommentError::UpstreamUnavailable(e.to_string()))?;
        tracing::info!(thread = %thread, comment = %comment_id, user = %author.id, "Comment stored");

        // 3. 参加者に追加
        if let Err(e) = self
            .comments
            .add_participant(&thread, &author.id)
            .await
        {
            tracing::warn!(thread = %thread, user = %author.id, "Failed to add participant: {}", e);
        }

        // 4, 5. 分類と通知（結果は待たない）
        self.side_effects.dispatch(SideEffect::ClassifyComment {
            thread: thread.clone(),
            comment: comment_id.clone(),
            text: text.clone(),
        });
        self.side_effects
            .dispatch(SideEffect::NotifyComment(CommentNotification {
                sender: author.id.clone(),
                timestamp,
                thread: thread.clone(),
                text: text.clone(),
                display_name: author.display_name.clone(),
                photo_url: author.photo_url.clone(),
            }));

        // 6. 配信
        let room = RoomName::for_thread(&thread);
        let comment = Comment {
            id: comment_id.clone(),
            thread,
            text,
            user: author.id.clone(),
            timestamp,
            spam: None,
        };
        match self.encoder.comment_posted(comment, author) {
            Ok(json) => {
                let delivered = self.message_pusher.publish(&room, json).await;
                tracing::debug!(room = %room, delivered, "Broadcasted new comment");
            }
            Err(e) => tracing::error!(room = %room, "Failed to encode comment broadcast: {}", e),
        }

        // 7.
        Ok(comment_id)
    }
}
