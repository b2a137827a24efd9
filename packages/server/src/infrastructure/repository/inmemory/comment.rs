//! InMemory Comment Repository 実装
//!
//! スレッド ID → Thread（ドメインモデル）の HashMap。
//! コメント ID はストア全体で単調増加する連番を 16 桁の 16 進数にしたもの。
//! 辞書順が追加順と一致し、スレッドをまたいでも重複しない。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    CommentId, CommentRepository, NewComment, RepositoryError, SpamReport, Thread, ThreadId,
    UserId,
};

#[derive(Default)]
struct Store {
    threads: HashMap<ThreadId, Thread>,
    next_sequence: u64,
}

impl Store {
    fn thread_mut(&mut self, thread: &ThreadId) -> &mut Thread {
        self.threads
            .entry(thread.clone())
            .or_insert_with(|| Thread::empty(thread.clone()))
    }
}

/// インメモリ Comment Repository 実装
#[derive(Default)]
pub struct InMemoryCommentRepository {
    store: Mutex<Store>,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn get_thread(&self, thread: &ThreadId) -> Result<Option<Thread>, RepositoryError> {
        let store = self.store.lock().await;
        Ok(store.threads.get(thread).cloned())
    }

    async fn append_comment(
        &self,
        thread: &ThreadId,
        comment: NewComment,
    ) -> Result<CommentId, RepositoryError> {
        let mut store = self.store.lock().await;
        store.next_sequence += 1;
        let id = CommentId::new(format!("{:016x}", store.next_sequence))
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?;

        store.thread_mut(thread).push_comment(id.clone(), comment);
        Ok(id)
    }

    async fn add_participant(
        &self,
        thread: &ThreadId,
        user: &UserId,
    ) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().await;
        store.thread_mut(thread).add_participant(user.clone());
        Ok(())
    }

    async fn update_spam(
        &self,
        thread: &ThreadId,
        comment: &CommentId,
        report: SpamReport,
    ) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().await;
        let thread_data = store
            .threads
            .get_mut(thread)
            .ok_or_else(|| RepositoryError::ThreadNotFound(thread.to_string()))?;
        let target = thread_data
            .find_comment_mut(comment)
            .ok_or_else(|| RepositoryError::CommentNotFound(comment.to_string()))?;
        target.spam = Some(report);
        Ok(())
    }
}
