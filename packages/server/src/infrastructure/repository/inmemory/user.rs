//! InMemory User Repository 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{RepositoryError, UserId, UserProfile, UserRepository};

/// インメモリ User Repository 実装
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, UserProfile>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_user(&self, user: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let users = self.users.lock().await;
        Ok(users.get(user).cloned())
    }

    async fn upsert_user(&self, profile: UserProfile) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().await;
        users.insert(profile.id.clone(), profile);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_then_get() {
        // テスト項目: 登録したプロフィールを取得でき、再登録で上書きされる
        // given (前提条件):
        let repo = InMemoryUserRepository::new();
        let u1 = UserId::new("u1".to_string()).unwrap();
        repo.upsert_user(UserProfile::new(u1.clone(), "Alice".to_string(), None))
            .await
            .unwrap();

        // when (操作):
        repo.upsert_user(UserProfile::new(
            u1.clone(),
            "Alice B.".to_string(),
            Some("https://example.com/a.png".to_string()),
        ))
        .await
        .unwrap();
        let found = repo.get_user(&u1).await.unwrap();

        // then (期待する結果):
        let found = found.unwrap();
        assert_eq!(found.display_name, "Alice B.");
        assert_eq!(found.photo_url.as_deref(), Some("https://example.com/a.png"));
    }

    #[tokio::test]
    async fn test_get_unknown_user() {
        // テスト項目: 未登録のユーザーは None
        // given (前提条件):
        let repo = InMemoryUserRepository::new();

        // when (操作):
        let found = repo
            .get_user(&UserId::new("ghost".to_string()).unwrap())
            .await;

        // then (期待する結果):
        assert_eq!(found, Ok(None));
    }
}
