//! Domain layer.
//!
//! Value objects, entities, the pure geo algorithms, and the traits the
//! infrastructure layer implements (dependency inversion).

pub mod entity;
pub mod error;
pub mod geo;
pub mod message_pusher;
pub mod payload;
pub mod repository;
pub mod side_effect;
pub mod value_object;

pub use entity::{Comment, NewComment, SpamReport, Subscriber, Thread, UserProfile};
pub use error::{DomainError, EncodeError, MessagePushError, RepositoryError, SideEffectError};
pub use geo::{Cluster, Event, FeedItem, GeoPoint, GeoQuery, Viewport};
pub use message_pusher::{MessagePusher, PUSHER_CHANNEL_CAPACITY, PusherChannel};
pub use payload::PayloadEncoder;
pub use repository::{CommentRepository, EventRepository, RoomRegistry, UserRepository};
pub use side_effect::{
    CommentNotification, CommentNotifier, SideEffect, SideEffectDispatcher, SpamClassifier,
};
#[cfg(test)]
pub use side_effect::{MockCommentNotifier, MockSideEffectDispatcher, MockSpamClassifier};
pub use value_object::{
    CommentId, CommentText, ConnectionId, EventId, RoomName, ThreadId, Timestamp, UserId,
};
