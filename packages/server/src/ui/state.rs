//! Shared application state.

use std::sync::Arc;

use crate::{
    domain::UserRepository,
    usecase::{
        ConnectSubscriberUseCase, DisconnectSubscriberUseCase, GetThreadCommentsUseCase,
        ListRoomsUseCase, PostCommentUseCase, QueryEventsByLocationUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// ConnectSubscriberUseCase（ルームへの購読開始）
    pub connect_subscriber_usecase: Arc<ConnectSubscriberUseCase>,
    /// DisconnectSubscriberUseCase（ルームからの購読終了）
    pub disconnect_subscriber_usecase: Arc<DisconnectSubscriberUseCase>,
    /// QueryEventsByLocationUseCase（位置情報クエリ）
    pub query_events_usecase: Arc<QueryEventsByLocationUseCase>,
    /// PostCommentUseCase（コメント投稿）
    pub post_comment_usecase: Arc<PostCommentUseCase>,
    /// GetThreadCommentsUseCase（スレッドのコメント取得）
    pub get_thread_comments_usecase: Arc<GetThreadCommentsUseCase>,
    /// ListRoomsUseCase（ルーム一覧）
    pub list_rooms_usecase: Arc<ListRoomsUseCase>,
    /// UserRepository（Authorization ヘッダの利用者を解決する）
    pub users: Arc<dyn UserRepository>,
}
