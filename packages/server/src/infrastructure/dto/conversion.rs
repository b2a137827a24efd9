//! Conversion logic between DTOs and domain entities.

use std::collections::BTreeMap;

use crate::domain::{
    Cluster, Comment, Event, FeedItem, GeoPoint, SpamReport, UserProfile, Viewport,
};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<GeoPoint> for dto::LocationDto {
    fn from(point: GeoPoint) -> Self {
        Self {
            latitude: point.latitude(),
            longitude: point.longitude(),
        }
    }
}

impl From<&Viewport> for dto::ViewportPayload {
    fn from(viewport: &Viewport) -> Self {
        Self {
            lat: viewport.center.latitude(),
            lng: viewport.center.longitude(),
            zoom: viewport.zoom,
        }
    }
}

impl From<Event> for dto::EventDto {
    fn from(model: Event) -> Self {
        Self {
            id: model.id.into_string(),
            location: model.location.into(),
            attributes: model.attributes,
        }
    }
}

impl From<Cluster> for dto::ClusterDto {
    fn from(model: Cluster) -> Self {
        Self {
            seed_id: model.seed_id.into_string(),
            representative_point: model.representative_point.into(),
            member_event_ids: model
                .member_event_ids
                .into_iter()
                .map(|id| id.into_string())
                .collect(),
            count: model.count,
        }
    }
}

impl From<FeedItem> for dto::FeedItemDto {
    fn from(model: FeedItem) -> Self {
        match model {
            FeedItem::Event(event) => Self::Event(event.into()),
            FeedItem::Cluster(cluster) => Self::Cluster(cluster.into()),
        }
    }
}

impl From<SpamReport> for dto::SpamDto {
    fn from(model: SpamReport) -> Self {
        Self {
            count: model.count,
            toxic: model.toxic,
        }
    }
}

impl From<UserProfile> for dto::UserDataDto {
    fn from(model: UserProfile) -> Self {
        Self {
            photo_url: model.photo_url,
            display_name: model.display_name,
        }
    }
}

impl From<Comment> for dto::CommentDto {
    fn from(model: Comment) -> Self {
        let spam = model.spam_or_placeholder().into();
        Self {
            text: model.text.into_string(),
            spam,
            user: model.user.into_string(),
            timestamp: model.timestamp.value(),
        }
    }
}

impl dto::CommentsData {
    /// Build `{comments, userData}` from comments and the profiles of their authors.
    ///
    /// Profiles whose user has no comment in `comments` are still included.
    pub fn from_parts(
        comments: impl IntoIterator<Item = Comment>,
        profiles: impl IntoIterator<Item = UserProfile>,
    ) -> Self {
        let comments: BTreeMap<String, dto::CommentDto> = comments
            .into_iter()
            .map(|c| (c.id.as_str().to_string(), c.into()))
            .collect();
        let user_data = profiles
            .into_iter()
            .map(|p| (p.id.as_str().to_string(), p.into()))
            .collect();
        Self {
            comments,
            user_data,
        }
    }
}
