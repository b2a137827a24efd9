//! 起動時のフィクスチャ読み込み
//!
//! JSON ファイル `{"users": [...], "events": [...]}` をリポジトリに投入する。

use std::path::Path;

use thiserror::Error;

use crate::{
    domain::{DomainError, Event, EventRepository, RepositoryError, UserProfile, UserRepository},
    infrastructure::dto::fixture::FixtureFile,
};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse fixture file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid fixture entry: {0}")]
    Invalid(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 投入した件数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixtureSummary {
    pub users: usize,
    pub events: usize,
}

/// フィクスチャファイルを読み込んでリポジトリに投入する
pub async fn load_fixtures(
    path: &Path,
    users: &dyn UserRepository,
    events: &dyn EventRepository,
) -> Result<FixtureSummary, FixtureError> {
    let text = tokio::fs::read_to_string(path).await?;
    let file: FixtureFile = serde_json::from_str(&text)?;
    apply_fixtures(file, users, events).await
}

/// パース済みのフィクスチャを投入する
///
/// 1 件でも不正なエントリがあれば、何も投入せずにエラーを返す。
pub async fn apply_fixtures(
    file: FixtureFile,
    users: &dyn UserRepository,
    events: &dyn EventRepository,
) -> Result<FixtureSummary, FixtureError> {
    let profiles = file
        .users
        .into_iter()
        .map(UserProfile::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    let items = file
        .events
        .into_iter()
        .map(Event::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let summary = FixtureSummary {
        users: profiles.len(),
        events: items.len(),
    };
    for profile in profiles {
        users.upsert_user(profile).await?;
    }
    for event in items {
        events.insert_event(event).await?;
    }

    tracing::info!(
        users = summary.users,
        events = summary.events,
        "Fixtures loaded"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::UserId,
        infrastructure::repository::{InMemoryEventRepository, InMemoryUserRepository},
    };

    fn parse(text: &str) -> FixtureFile {
        serde_json::from_str(text).unwrap()
    }

    #[tokio::test]
    async fn test_apply_fixtures() {
        // テスト項目: ユーザーとイベントがリポジトリに投入される
        // given (前提条件):
        let users = InMemoryUserRepository::new();
        let events = InMemoryEventRepository::new();
        let file = parse(
            r#"{
                "users": [{"id": "u1", "displayName": "Alice"}],
                "events": [
                    {"id": "e1", "latitude": 0.0, "longitude": 0.0},
                    {"id": "e2", "latitude": 1.0, "longitude": 1.0}
                ]
            }"#,
        );

        // when (操作):
        let summary = apply_fixtures(file, &users, &events).await.unwrap();

        // then (期待する結果):
        assert_eq!(summary, FixtureSummary { users: 1, events: 2 });
        let alice = users
            .get_user(&UserId::new("u1".to_string()).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(alice.display_name, "Alice");
        assert_eq!(events.scan_events().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_entry_inserts_nothing() {
        // テスト項目: 不正なエントリがあると何も投入されない
        // given (前提条件):
        let users = InMemoryUserRepository::new();
        let events = InMemoryEventRepository::new();
        let file = parse(
            r#"{
                "users": [{"id": "u1", "displayName": "Alice"}],
                "events": [{"id": "e1", "latitude": 91.0, "longitude": 0.0}]
            }"#,
        );

        // when (操作):
        let result = apply_fixtures(file, &users, &events).await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(FixtureError::Invalid(DomainError::InvalidLatitude(_)))
        ));
        assert!(events.scan_events().await.unwrap().is_empty());
        assert!(
            users
                .get_user(&UserId::new("u1".to_string()).unwrap())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        // テスト項目: 存在しないファイルは Io エラーになる
        // given (前提条件):
        let users = InMemoryUserRepository::new();
        let events = InMemoryEventRepository::new();

        // when (操作):
        let result = load_fixtures(Path::new("/nonexistent/hiroba.json"), &users, &events).await;

        // then (期待する結果):
        assert!(matches!(result, Err(FixtureError::Io(_))));
    }
}
