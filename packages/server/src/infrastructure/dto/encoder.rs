//! JSON envelope encoder.
//!
//! Turns domain values into the `{actionType, data, actionPayload?}` text
//! frames sent over the WebSocket.

use serde::Serialize;

use crate::domain::{
    Comment, EncodeError, FeedItem, PayloadEncoder, RoomName, UserProfile, Viewport,
};

use super::websocket::{
    CommentPostedBroadcast, CommentsData, EventsByLocationBroadcast, FeedItemDto,
    QueryFailedMessage, RoomSubscribedMessage,
};

/// `PayloadEncoder` producing JSON envelopes
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPayloadEncoder;

fn to_json<T: Serialize>(message: &T) -> Result<String, EncodeError> {
    serde_json::to_string(message).map_err(|e| EncodeError(e.to_string()))
}

impl PayloadEncoder for JsonPayloadEncoder {
    fn room_subscribed(&self, room: &RoomName, subscribers: usize) -> Result<String, EncodeError> {
        to_json(&RoomSubscribedMessage::subscribed(
            room.as_str().to_string(),
            subscribers,
        ))
    }

    fn events_by_location(
        &self,
        items: Vec<FeedItem>,
        viewport: &Viewport,
    ) -> Result<String, EncodeError> {
        to_json(&EventsByLocationBroadcast::finished(
            items.into_iter().map(FeedItemDto::from).collect(),
            viewport.into(),
        ))
    }

    fn query_failed(&self, message: &str) -> Result<String, EncodeError> {
        to_json(&QueryFailedMessage::failed(message.to_string()))
    }

    fn comment_posted(
        &self,
        comment: Comment,
        author: UserProfile,
    ) -> Result<String, EncodeError> {
        to_json(&CommentPostedBroadcast::new_comment(
            CommentsData::from_parts([comment], [author]),
        ))
    }
}
