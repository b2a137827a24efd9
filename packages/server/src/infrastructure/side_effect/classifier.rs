//! 禁止語ベースのスパム分類器
//!
//! 外部の分類サービスの代わりに使うプロセス内実装。本文中の禁止語の出現数を数える。

use async_trait::async_trait;

use crate::domain::{CommentId, SideEffectError, SpamClassifier, SpamReport};

/// 禁止語の出現数でスパムを判定する分類器
#[derive(Debug, Clone, Default)]
pub struct KeywordSpamClassifier {
    /// 小文字化済みの禁止語
    blocked_words: Vec<String>,
}

impl KeywordSpamClassifier {
    pub fn new<I, S>(blocked_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let blocked_words = blocked_words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { blocked_words }
    }

    fn score(&self, text: &str) -> SpamReport {
        let count = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .map(str::to_lowercase)
            .filter(|word| self.blocked_words.contains(word))
            .count();

        SpamReport {
            count: u32::try_from(count).unwrap_or(u32::MAX),
            toxic: Some(count > 0),
        }
    }
}

#[async_trait]
impl SpamClassifier for KeywordSpamClassifier {
    async fn classify(
        &self,
        text: &str,
        correlation_id: &CommentId,
    ) -> Result<SpamReport, SideEffectError> {
        let report = self.score(text);
        tracing::debug!(
            comment = %correlation_id,
            count = report.count,
            "Classified comment"
        );
        Ok(report)
    }
}
