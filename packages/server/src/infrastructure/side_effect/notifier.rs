//! 通知をログに出す Notifier
//!
//! プッシュ通知サービスの代わりに、通知内容を構造化ログとして出力する。

use async_trait::async_trait;
use hiroba_shared::time::timestamp_to_rfc3339;

use crate::domain::{CommentNotification, CommentNotifier, SideEffectError};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingCommentNotifier;

#[async_trait]
impl CommentNotifier for TracingCommentNotifier {
    async fn notify(&self, notification: CommentNotification) -> Result<(), SideEffectError> {
        let sent_at = timestamp_to_rfc3339(notification.timestamp.value());
        tracing::info!(
            sender = %notification.sender,
            thread = %notification.thread,
            sent_at = sent_at.as_deref().unwrap_or("-"),
            display_name = %notification.display_name,
            photo_url = notification.photo_url.as_deref().unwrap_or(""),
            chars = notification.text.as_str().chars().count(),
            "New comment notification"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CommentText, ThreadId, Timestamp, UserId};

    #[tokio::test]
    async fn test_notify_always_succeeds() {
        // テスト項目: ログ出力のみなので常に成功する
        // given (前提条件):
        let notifier = TracingCommentNotifier;
        let notification = CommentNotification {
            sender: UserId::new("u1".to_string()).unwrap(),
            timestamp: Timestamp::new(1),
            thread: ThreadId::new("t1".to_string()).unwrap(),
            text: CommentText::new("hello".to_string()).unwrap(),
            display_name: "Alice".to_string(),
            photo_url: None,
        };

        // when (操作):
        let result = notifier.notify(notification).await;

        // then (期待する結果):
        assert!(result.is_ok());
    }
}
