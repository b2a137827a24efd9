//! UseCase 層のエラー
//!
//! テストで `assert_eq!` できるように `PartialEq` を実装する。

use thiserror::Error;

use crate::domain::DomainError;

/// コメント投稿のエラー
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PostCommentError {
    /// 入力が不正（副作用は一切起きていない）
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] DomainError),

    /// コメントの永続化に失敗
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
}

/// 位置情報クエリのエラー
#[derive(Debug, Clone, Error, PartialEq)]
pub enum QueryEventsError {
    /// クエリが不正（ストアには触れていない）
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// イベントストアの読み出しに失敗
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// 結果のエンコードに失敗
    #[error("failed to encode result: {0}")]
    Encode(String),
}

/// スレッド取得のエラー
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GetThreadError {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] DomainError),

    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
}
