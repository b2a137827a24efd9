//! 永続化後の副作用の実装
//!
//! - `queue`: 副作用ジョブのキューとワーカー
//! - `classifier`: 禁止語ベースのスパム分類器
//! - `notifier`: 通知をログに出す Notifier

pub mod classifier;
pub mod notifier;
pub mod queue;

pub use classifier::KeywordSpamClassifier;
pub use notifier::TracingCommentNotifier;
pub use queue::{SideEffectQueue, SideEffectWorker};
