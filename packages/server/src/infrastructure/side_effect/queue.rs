//! 副作用ジョブのキュー
//!
//! ## 概要
//!
//! UseCase は `SideEffectDispatcher::dispatch` でジョブを積むだけで結果を待たない。
//! ワーカータスクがジョブを受け取り、ジョブごとに `JoinSet` のタスクとして実行する。
//!
//! ## 終了処理
//!
//! - `SideEffectWorker::shutdown`: 新しいジョブの受付をやめ、実行中のジョブを中断する
//! - `SideEffectWorker::join`: キューのハンドルが全て drop された後、実行中のジョブの完了を待つ
//!
//! ジョブの失敗はワーカーがログに出す。呼び出し元に伝わることはない。

use std::sync::Arc;

use tokio::{
    sync::{mpsc, oneshot},
    task::{JoinError, JoinHandle, JoinSet},
};

use crate::domain::{
    CommentNotifier, CommentRepository, SideEffect, SideEffectDispatcher, SideEffectError,
    SpamClassifier,
};

/// ジョブの実行に必要な外部コラボレータ
struct SideEffectExecutor {
    classifier: Arc<dyn SpamClassifier>,
    notifier: Arc<dyn CommentNotifier>,
    comments: Arc<dyn CommentRepository>,
}

impl SideEffectExecutor {
    async fn run(&self, job: SideEffect) -> Result<(), SideEffectError> {
        match job {
            SideEffect::ClassifyComment {
                thread,
                comment,
                text,
            } => {
                let report = self.classifier.classify(text.as_str(), &comment).await?;
                self.comments
                    .update_spam(&thread, &comment, report)
                    .await
                    .map_err(|e| SideEffectError::Unavailable(e.to_string()))?;
                tracing::debug!(
                    thread = %thread,
                    comment = %comment,
                    count = report.count,
                    toxic = ?report.toxic,
                    "Stored spam report"
                );
                Ok(())
            }
            SideEffect::NotifyComment(notification) => self.notifier.notify(notification).await,
        }
    }
}

/// 副作用ジョブの投入口（clone して共有できる）
#[derive(Clone)]
pub struct SideEffectQueue {
    sender: mpsc::UnboundedSender<SideEffect>,
}

/// ワーカータスクのハンドル
///
/// drop すると `shutdown` と同じく実行中のジョブが中断される。
pub struct SideEffectWorker {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl SideEffectQueue {
    /// ワーカーを起動し、キューとワーカーのハンドルを返す
    pub fn start(
        classifier: Arc<dyn SpamClassifier>,
        notifier: Arc<dyn CommentNotifier>,
        comments: Arc<dyn CommentRepository>,
    ) -> (Self, SideEffectWorker) {
        let (sender, jobs) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let executor = Arc::new(SideEffectExecutor {
            classifier,
            notifier,
            comments,
        });

        let handle = tokio::spawn(run_worker(jobs, shutdown_rx, executor));
        tracing::info!("Side-effect worker started");

        (
            Self { sender },
            SideEffectWorker {
                shutdown: shutdown_tx,
                handle,
            },
        )
    }
}

impl SideEffectDispatcher for SideEffectQueue {
    fn dispatch(&self, job: SideEffect) {
        let kind = job.kind();
        if self.sender.send(job).is_err() {
            tracing::warn!(job = kind, "Side-effect worker is not running, dropping job");
        } else {
            tracing::debug!(job = kind, "Side-effect job queued");
        }
    }
}

impl SideEffectWorker {
    /// 受付を止め、実行中のジョブを中断して終了する
    pub async fn shutdown(self) {
        // the worker may already have stopped on its own
        let _ = self.shutdown.send(());
        if let Err(e) = self.handle.await {
            tracing::error!("Side-effect worker terminated abnormally: {}", e);
        }
    }

    /// キューのハンドルが全て drop されるのを待ち、実行中のジョブを完了させて終了する
    pub async fn join(self) {
        let Self { shutdown, handle } = self;
        if let Err(e) = handle.await {
            tracing::error!("Side-effect worker terminated abnormally: {}", e);
        }
        drop(shutdown);
    }
}

type JobOutcome = (&'static str, Result<(), SideEffectError>);

async fn run_worker(
    mut jobs: mpsc::UnboundedReceiver<SideEffect>,
    mut shutdown: oneshot::Receiver<()>,
    executor: Arc<SideEffectExecutor>,
) {
    let mut in_flight: JoinSet<JobOutcome> = JoinSet::new();

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                let aborted = in_flight.len();
                in_flight.shutdown().await;
                tracing::info!(aborted, "Side-effect worker shut down");
                return;
            }
            job = jobs.recv() => match job {
                Some(job) => {
                    let executor = executor.clone();
                    in_flight.spawn(async move {
                        let kind = job.kind();
                        (kind, executor.run(job).await)
                    });
                }
                // every queue handle is gone
                None => break,
            },
            Some(outcome) = in_flight.join_next(), if !in_flight.is_empty() => {
                log_outcome(outcome);
            }
        }
    }

    while let Some(outcome) = in_flight.join_next().await {
        log_outcome(outcome);
    }
    tracing::info!("Side-effect worker drained and stopped");
}

fn log_outcome(outcome: Result<JobOutcome, JoinError>) {
    match outcome {
        Ok((kind, Ok(()))) => tracing::debug!(job = kind, "Side-effect job finished"),
        Ok((kind, Err(e))) => tracing::warn!(job = kind, "Side-effect job failed: {}", e),
        Err(e) if e.is_cancelled() => tracing::debug!("Side-effect job cancelled"),
        Err(e) => tracing::error!("Side-effect job panicked: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use async_trait::async_trait;

    use super::*;
    use crate::{
        domain::{
            CommentId, CommentNotification, CommentText, MockCommentNotifier,
            MockSpamClassifier, NewComment, SpamReport, ThreadId, Timestamp, UserId,
        },
        infrastructure::repository::InMemoryCommentRepository,
    };

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 分類ジョブの結果がコメントに書き戻されること
    // - 通知ジョブが Notifier に渡されること
    // - 外部コラボレータの失敗がワーカーを止めないこと
    // - shutdown で実行中のジョブが中断されること
    // ========================================

    async fn seed_comment(repo: &InMemoryCommentRepository) -> (ThreadId, CommentId) {
        let thread = ThreadId::new("t1".to_string()).unwrap();
        let id = repo
            .append_comment(
                &thread,
                NewComment {
                    text: CommentText::new("hello".to_string()).unwrap(),
                    user: UserId::new("u1".to_string()).unwrap(),
                    timestamp: Timestamp::new(1000),
                },
            )
            .await
            .unwrap();
        (thread, id)
    }

    fn notification() -> CommentNotification {
        CommentNotification {
            sender: UserId::new("u1".to_string()).unwrap(),
            timestamp: Timestamp::new(1000),
            thread: ThreadId::new("t1".to_string()).unwrap(),
            text: CommentText::new("hello".to_string()).unwrap(),
            display_name: "Alice".to_string(),
            photo_url: None,
        }
    }

    #[tokio::test]
    async fn test_classify_job_updates_spam() {
        // テスト項目: 分類結果がコメントの spam に反映される
        // given (前提条件):
        let repo = Arc::new(InMemoryCommentRepository::new());
        let (thread, id) = seed_comment(&repo).await;
        let expected_id = id.clone();

        let mut classifier = MockSpamClassifier::new();
        classifier
            .expect_classify()
            .withf(move |text, correlation_id| text == "hello" && correlation_id == &expected_id)
            .returning(|_, _| {
                Ok(SpamReport {
                    count: 3,
                    toxic: Some(true),
                })
            });
        let notifier = MockCommentNotifier::new();
        let (queue, worker) =
            SideEffectQueue::start(Arc::new(classifier), Arc::new(notifier), repo.clone());

        // when (操作):
        queue.dispatch(SideEffect::ClassifyComment {
            thread: thread.clone(),
            comment: id,
            text: CommentText::new("hello".to_string()).unwrap(),
        });
        drop(queue);
        worker.join().await;

        // then (期待する結果):
        let stored = repo.get_thread(&thread).await.unwrap().unwrap();
        assert_eq!(
            stored.comments[0].spam,
            Some(SpamReport {
                count: 3,
                toxic: Some(true)
            })
        );
    }

    #[tokio::test]
    async fn test_notify_job_calls_notifier() {
        // テスト項目: 通知ジョブの内容がそのまま Notifier に渡される
        // given (前提条件):
        let repo = Arc::new(InMemoryCommentRepository::new());
        let classifier = MockSpamClassifier::new();
        let mut notifier = MockCommentNotifier::new();
        let expected = notification();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_mock = calls.clone();
        notifier
            .expect_notify()
            .withf(move |n| n == &expected)
            .returning(move |_| {
                calls_in_mock.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        let (queue, worker) =
            SideEffectQueue::start(Arc::new(classifier), Arc::new(notifier), repo);

        // when (操作):
        queue.dispatch(SideEffect::NotifyComment(notification()));
        drop(queue);
        worker.join().await;

        // then (期待する結果):
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_worker() {
        // テスト項目: 分類器・通知が失敗してもワーカーは後続のジョブを処理する
        // given (前提条件):
        let repo = Arc::new(InMemoryCommentRepository::new());
        let (thread, id) = seed_comment(&repo).await;

        let mut classifier = MockSpamClassifier::new();
        classifier
            .expect_classify()
            .returning(|_, _| Err(SideEffectError::Unavailable("timeout".to_string())));
        let mut notifier = MockCommentNotifier::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_mock = calls.clone();
        notifier.expect_notify().returning(move |_| {
            calls_in_mock.fetch_add(1, Ordering::SeqCst);
            Err(SideEffectError::Rejected("no device".to_string()))
        });
        let (queue, worker) =
            SideEffectQueue::start(Arc::new(classifier), Arc::new(notifier), repo.clone());

        // when (操作):
        queue.dispatch(SideEffect::NotifyComment(notification()));
        queue.dispatch(SideEffect::ClassifyComment {
            thread: thread.clone(),
            comment: id,
            text: CommentText::new("hello".to_string()).unwrap(),
        });
        queue.dispatch(SideEffect::NotifyComment(notification()));
        drop(queue);
        worker.join().await;

        // then (期待する結果): 2 件の通知は試行され、コメントは未分類のまま残る
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        let stored = repo.get_thread(&thread).await.unwrap().unwrap();
        assert_eq!(stored.comments[0].spam, None);
    }

    struct HangingClassifier;

    #[async_trait]
    impl SpamClassifier for HangingClassifier {
        async fn classify(
            &self,
            _text: &str,
            _correlation_id: &CommentId,
        ) -> Result<SpamReport, SideEffectError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_shutdown_cancels_in_flight_jobs() {
        // テスト項目: shutdown は応答しない分類器を待たずに終了する
        // given (前提条件):
        let repo = Arc::new(InMemoryCommentRepository::new());
        let (thread, id) = seed_comment(&repo).await;
        let (queue, worker) = SideEffectQueue::start(
            Arc::new(HangingClassifier),
            Arc::new(MockCommentNotifier::new()),
            repo.clone(),
        );
        queue.dispatch(SideEffect::ClassifyComment {
            thread: thread.clone(),
            comment: id,
            text: CommentText::new("hello".to_string()).unwrap(),
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        // when (操作):
        let result = tokio::time::timeout(Duration::from_secs(1), worker.shutdown()).await;

        // then (期待する結果):
        assert!(result.is_ok());
        let stored = repo.get_thread(&thread).await.unwrap().unwrap();
        assert_eq!(stored.comments[0].spam, None);
    }

    #[tokio::test]
    async fn test_dispatch_after_shutdown_is_dropped() {
        // テスト項目: ワーカー停止後の dispatch はパニックせずに破棄される
        // given (前提条件):
        let repo = Arc::new(InMemoryCommentRepository::new());
        let (queue, worker) = SideEffectQueue::start(
            Arc::new(MockSpamClassifier::new()),
            Arc::new(MockCommentNotifier::new()),
            repo,
        );
        worker.shutdown().await;

        // when (操作) / then (期待する結果): パニックしない
        queue.dispatch(SideEffect::NotifyComment(notification()));
    }
}
