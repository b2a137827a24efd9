//! Value Objects
//!
//! 生成時に検証される不変の値。検証に失敗した場合は `DomainError` を返す。

use std::fmt;

use uuid::Uuid;

use super::error::DomainError;

/// コメント本文の最大文字数
pub const MAX_COMMENT_LENGTH: usize = 5000;

/// 位置情報フィードのルーム名
const GEO_FEED_ROOM: &str = "events_by_location";

/// コメントスレッドのルーム名の接頭辞
const COMMENT_ROOM_PREFIX: &str = "comments_";

fn non_empty(field: &'static str, value: String) -> Result<String, DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Empty(field));
    }
    Ok(value)
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: String) -> Result<Self, DomainError> {
                non_empty($field, value).map(Self)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// コメントスレッドの ID（イベント ID と同じ値が使われることが多い）
    ThreadId,
    "thread"
);
string_id!(
    /// ストアが採番するコメント ID
    CommentId,
    "comment id"
);
string_id!(
    /// ユーザー ID
    UserId,
    "user id"
);
string_id!(
    /// 位置情報イベントの ID
    EventId,
    "event id"
);

/// ルーム名（ブロードキャストグループのキー）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomName(String);

impl RoomName {
    pub fn new(value: String) -> Result<Self, DomainError> {
        non_empty("room", value).map(Self)
    }

    /// 位置情報フィードの固定ルーム
    pub fn geo_feed() -> Self {
        Self(GEO_FEED_ROOM.to_string())
    }

    /// スレッドごとのコメントルーム（`comments_<thread>`）
    pub fn for_thread(thread: &ThreadId) -> Self {
        Self(format!("{}{}", COMMENT_ROOM_PREFIX, thread.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// WebSocket 接続の ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// コメント本文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentText(String);

impl CommentText {
    pub fn new(value: String) -> Result<Self, DomainError> {
        let value = non_empty("text", value)?;
        let len = value.chars().count();
        if len > MAX_COMMENT_LENGTH {
            return Err(DomainError::TooLong {
                field: "text",
                len,
                max: MAX_COMMENT_LENGTH,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for CommentText {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_id_rejects_blank() {
        // テスト項目: 空白のみのスレッド ID は生成できない
        // given (前提条件):
        let value = "   ".to_string();

        // when (操作):
        let result = ThreadId::new(value);

        // then (期待する結果):
        assert_eq!(result, Err(DomainError::Empty("thread")));
    }

    #[test]
    fn test_room_name_for_thread() {
        // テスト項目: スレッドのルーム名は comments_<thread> になる
        // given (前提条件):
        let thread = ThreadId::new("t1".to_string()).unwrap();

        // when (操作):
        let room = RoomName::for_thread(&thread);

        // then (期待する結果):
        assert_eq!(room.as_str(), "comments_t1");
    }

    #[test]
    fn test_geo_feed_room_is_fixed() {
        // テスト項目: 位置情報フィードのルーム名は常に同じ
        // given (前提条件) / when (操作):
        let a = RoomName::geo_feed();
        let b = RoomName::geo_feed();

        // then (期待する結果):
        assert_eq!(a, b);
        assert_ne!(a, RoomName::for_thread(&ThreadId::new("x".to_string()).unwrap()));
    }

    #[test]
    fn test_comment_text_rejects_empty() {
        // テスト項目: 空のコメント本文はエラーになる
        // given (前提条件):
        let value = "\n\t".to_string();

        // when (操作):
        let result = CommentText::try_from(value);

        // then (期待する結果):
        assert_eq!(result, Err(DomainError::Empty("text")));
    }

    #[test]
    fn test_comment_text_rejects_too_long() {
        // テスト項目: 最大文字数を超えるコメント本文はエラーになる
        // given (前提条件):
        let value = "あ".repeat(MAX_COMMENT_LENGTH + 1);

        // when (操作):
        let result = CommentText::new(value);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(DomainError::TooLong {
                field: "text",
                len: MAX_COMMENT_LENGTH + 1,
                max: MAX_COMMENT_LENGTH,
            })
        );
    }

    #[test]
    fn test_comment_text_keeps_original_whitespace() {
        // テスト項目: 検証は trim して行うが、本文自体は加工しない
        // given (前提条件):
        let value = "  hello  ".to_string();

        // when (操作):
        let text = CommentText::new(value).unwrap();

        // then (期待する結果):
        assert_eq!(text.as_str(), "  hello  ");
    }

    #[test]
    fn test_connection_ids_are_unique() {
        // テスト項目: 接続 ID は毎回異なる値が生成される
        // given (前提条件) / when (操作):
        let a = ConnectionId::generate();
        let b = ConnectionId::generate();

        // then (期待する結果):
        assert_ne!(a, b);
    }
}
