//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};

use crate::{
    domain::{UserId, UserProfile},
    infrastructure::dto::http::{
        ErrorResponse, PostCommentRequest, PostCommentResponse, RoomSummaryDto,
        ThreadCommentsQuery, ThreadCommentsResponse,
    },
    ui::state::AppState,
    usecase::{GetThreadError, PostCommentError},
};

/// Error response `(status, {"error": message})`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse::new(self.message))).into_response()
    }
}

impl From<PostCommentError> for ApiError {
    fn from(e: PostCommentError) -> Self {
        let status = match e {
            PostCommentError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            PostCommentError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self::new(status, e.to_string())
    }
}

impl From<GetThreadError> for ApiError {
    fn from(e: GetThreadError) -> Self {
        let status = match e {
            GetThreadError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            GetThreadError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self::new(status, e.to_string())
    }
}

/// Resolve `Authorization: Bearer <userId>` to a known user
async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<UserProfile, ApiError> {
    let unauthorized = || ApiError::new(StatusCode::UNAUTHORIZED, "unauthorized");

    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or_else(unauthorized)?;
    let user = UserId::new(token.to_string()).map_err(|_| unauthorized())?;

    match state.users.get_user(&user).await {
        Ok(Some(profile)) => Ok(profile),
        Ok(None) => {
            tracing::warn!(user = %user, "Unknown user in Authorization header");
            Err(unauthorized())
        }
        Err(e) => Err(ApiError::new(StatusCode::SERVICE_UNAVAILABLE, e.to_string())),
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms with live subscribers
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.list_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    let summaries = rooms
        .into_iter()
        .map(|(room, subscribers)| RoomSummaryDto {
            id: room.into_string(),
            subscribers,
        })
        .collect();

    Json(summaries)
}

/// `GET /api/comments?thread=<id>`
pub async fn get_thread_comments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ThreadCommentsQuery>,
) -> Result<Json<ThreadCommentsResponse>, ApiError> {
    let thread = query
        .thread
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "missing query parameter 'thread'"))?;

    let result = state.get_thread_comments_usecase.execute(thread).await?;

    // Domain Model から DTO への変換
    Ok(Json(ThreadCommentsResponse::from_parts(
        result.thread.comments,
        result.profiles,
    )))
}

/// `POST /api/comments` with body `{thread, text}`
pub async fn post_comment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<PostCommentRequest>, JsonRejection>,
) -> Result<Json<PostCommentResponse>, ApiError> {
    let author = authenticate(&state, &headers).await?;
    let Json(request) =
        payload.map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.body_text()))?;

    let id = state
        .post_comment_usecase
        .execute(request.thread, request.text, author)
        .await?;

    Ok(Json(PostCommentResponse {
        id: id.into_string(),
    }))
}
