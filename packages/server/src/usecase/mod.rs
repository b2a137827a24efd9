//! UseCase 層
//!
//! 操作ごとに 1 つの struct。依存するコラボレータは `Arc<dyn Trait>` として
//! コンストラクタで受け取る。

mod connect_subscriber;
mod disconnect_subscriber;
mod error;
mod get_thread_comments;
mod list_rooms;
mod post_comment;
mod query_events_by_location;

pub use connect_subscriber::{ConnectSubscriberUseCase, Subscription};
pub use disconnect_subscriber::DisconnectSubscriberUseCase;
pub use error::{GetThreadError, PostCommentError, QueryEventsError};
pub use get_thread_comments::{GetThreadCommentsUseCase, ThreadComments};
pub use list_rooms::ListRoomsUseCase;
pub use post_comment::PostCommentUseCase;
pub use query_events_by_location::QueryEventsByLocationUseCase;
