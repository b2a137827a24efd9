//! WebSocket message DTOs.
//!
//! Every server → client message is an envelope
//! `{actionType, data, actionPayload?}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::{DomainError, GeoQuery, Viewport};

/// Envelope action types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    /// Geo query result broadcast to the feed room
    FeedFetchEventsByLocationFinished,
    /// Geo query rejected (sent to the requesting connection only)
    FeedFetchEventsByLocationFailed,
    /// New comment broadcast to the thread room
    NewCommentReceived,
    /// Acknowledgement sent to a connection right after it joined its room
    RoomSubscribed,
}

/// Server → client envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<D, A = ()> {
    pub action_type: ActionType,
    pub data: D,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_payload: Option<A>,
}

/// Geo query result: `data` is the feed, `actionPayload` echoes the viewport
pub type EventsByLocationBroadcast = Envelope<Vec<FeedItemDto>, ViewportPayload>;

/// New comment broadcast
pub type CommentPostedBroadcast = Envelope<CommentsData>;

/// Subscription acknowledgement
pub type RoomSubscribedMessage = Envelope<RoomSubscribedData>;

/// Per-connection error reply
pub type QueryFailedMessage = Envelope<ErrorData>;

impl EventsByLocationBroadcast {
    pub fn finished(items: Vec<FeedItemDto>, viewport: ViewportPayload) -> Self {
        Self {
            action_type: ActionType::FeedFetchEventsByLocationFinished,
            data: items,
            action_payload: Some(viewport),
        }
    }
}

impl CommentPostedBroadcast {
    pub fn new_comment(data: CommentsData) -> Self {
        Self {
            action_type: ActionType::NewCommentReceived,
            data,
            action_payload: None,
        }
    }
}

impl RoomSubscribedMessage {
    pub fn subscribed(room: String, subscribers: usize) -> Self {
        Self {
            action_type: ActionType::RoomSubscribed,
            data: RoomSubscribedData { room, subscribers },
            action_payload: None,
        }
    }
}

impl QueryFailedMessage {
    pub fn failed(message: String) -> Self {
        Self {
            action_type: ActionType::FeedFetchEventsByLocationFailed,
            data: ErrorData { message },
            action_payload: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSubscribedData {
    pub room: String,
    pub subscribers: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorData {
    pub message: String,
}

/// Viewport echoed back with a geo query result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportPayload {
    pub lat: f64,
    pub lng: f64,
    pub zoom: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationDto {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDto {
    pub id: String,
    pub location: LocationDto,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterDto {
    pub seed_id: String,
    pub representative_point: LocationDto,
    pub member_event_ids: Vec<String>,
    pub count: usize,
}

/// One entry of a geo query result, tagged by `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedItemDto {
    Event(EventDto),
    Cluster(ClusterDto),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpamDto {
    pub count: u32,
    pub toxic: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentDto {
    pub text: String,
    pub spam: SpamDto,
    pub user: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDataDto {
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub display_name: String,
}

/// `{comments: {id: comment}, userData: {uid: profile}}`
///
/// Comment ids sort in push order, so the map keeps the thread order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsData {
    pub comments: BTreeMap<String, CommentDto>,
    pub user_data: BTreeMap<String, UserDataDto>,
}

/// Inbound geo query `{lat, lng, dist, zoom?, min?}`
///
/// Numeric fields may be JSON numbers or numeric strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeoQueryRequest {
    #[serde(default)]
    pub lat: Option<Value>,
    #[serde(default)]
    pub lng: Option<Value>,
    #[serde(default)]
    pub dist: Option<Value>,
    #[serde(default)]
    pub zoom: Option<Value>,
    #[serde(default)]
    pub min: Option<Value>,
}

/// Reasons a geo query message is rejected
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GeoRequestError {
    #[error("message is not a JSON object: {0}")]
    InvalidJson(String),

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("field '{0}' must be numeric")]
    NotNumeric(&'static str),

    #[error(transparent)]
    InvalidArgument(#[from] DomainError),
}

fn numeric(field: &'static str, value: Option<&Value>) -> Result<Option<f64>, GeoRequestError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or(GeoRequestError::NotNumeric(field)),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| GeoRequestError::NotNumeric(field)),
        Some(_) => Err(GeoRequestError::NotNumeric(field)),
    }
}

fn required(field: &'static str, value: Option<&Value>) -> Result<f64, GeoRequestError> {
    numeric(field, value)?.ok_or(GeoRequestError::MissingField(field))
}

impl GeoQueryRequest {
    /// Parse a text frame.
    pub fn parse(text: &str) -> Result<Self, GeoRequestError> {
        serde_json::from_str(text).map_err(|e| GeoRequestError::InvalidJson(e.to_string()))
    }

    /// Validate into a domain query plus the viewport to echo back.
    pub fn into_query(self) -> Result<(GeoQuery, Viewport), GeoRequestError> {
        let lat = required("lat", self.lat.as_ref())?;
        let lng = required("lng", self.lng.as_ref())?;
        let dist = required("dist", self.dist.as_ref())?;
        let zoom = numeric("zoom", self.zoom.as_ref())?;
        let min = numeric("min", self.min.as_ref())?.unwrap_or(0.0);

        let query = GeoQuery::new(lat, lng, dist, min)?;
        let viewport = Viewport {
            center: query.center,
            zoom,
        };
        Ok((query, viewport))
    }
}
