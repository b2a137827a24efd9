//! HTTP API request/response DTOs.

use serde::{Deserialize, Serialize};

pub use super::websocket::CommentsData as ThreadCommentsResponse;

/// `GET /api/comments?thread=<id>`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThreadCommentsQuery {
    #[serde(default)]
    pub thread: Option<String>,
}

/// `POST /api/comments`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostCommentRequest {
    #[serde(default)]
    pub thread: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCommentResponse {
    pub id: String,
}

/// `GET /api/rooms` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub subscribers: usize,
}

/// Error body `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
