//! ドメイン層のエラー定義

use thiserror::Error;

/// Value object の生成・検証エラー
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomainError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} is too long ({len} > {max})")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("latitude must be a finite number within [-90, 90], got {0}")]
    InvalidLatitude(f64),

    #[error("longitude must be a finite number within [-180, 180], got {0}")]
    InvalidLongitude(f64),

    #[error("{field} must be a finite, non-negative number, got {value}")]
    InvalidDistance { field: &'static str, value: f64 },
}

/// データストア（外部コラボレータ）のエラー
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RepositoryError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("thread not found: {0}")]
    ThreadNotFound(String),

    #[error("comment not found: {0}")]
    CommentNotFound(String),
}

/// 接続へのメッセージ送信エラー
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MessagePushError {
    #[error("connection '{0}' is not a member of the room")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}

/// 配信ペイロードのエンコードエラー
#[derive(Debug, Clone, Error, PartialEq)]
#[error("failed to encode payload: {0}")]
pub struct EncodeError(pub String);

/// 分類器・通知など、永続化後の副作用のエラー
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SideEffectError {
    #[error("upstream unavailable: {0}")]
    Unavailable(String),

    #[error("side effect rejected: {0}")]
    Rejected(String),
}
