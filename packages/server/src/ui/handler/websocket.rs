//! WebSocket connection handlers.
//!
//! One room per connection: `/ws/events` joins the geo feed room and
//! `/ws/comments/{thread}` joins `comments_<thread>`.

use std::sync::Arc;

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, PUSHER_CHANNEL_CAPACITY, RoomName, ThreadId},
    infrastructure::dto::websocket::GeoQueryRequest,
    ui::state::AppState,
    usecase::QueryEventsError,
};

/// What a connection's inbound text frames mean
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoomKind {
    /// Text frames are geo queries
    GeoFeed,
    /// Text frames are ignored; the room is fed by comment posts
    Comments,
}

pub async fn events_websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| {
        handle_socket(socket, state, RoomName::geo_feed(), RoomKind::GeoFeed)
    })
}

pub async fn comments_websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(thread): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let thread = match ThreadId::try_from(thread) {
        Ok(thread) => thread,
        Err(e) => {
            tracing::warn!("Invalid thread id: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };
    let room = RoomName::for_thread(&thread);

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, room, RoomKind::Comments)))
}

/// Spawns a task that forwards room payloads from `rx` to the WebSocket sink.
///
/// The task ends when the sink fails or every sender for `rx` is gone.
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, room: RoomName, kind: RoomKind) {
    // frames pushed before the socket is split wait on the channel
    let (tx, rx) = mpsc::channel(PUSHER_CHANNEL_CAPACITY);
    let subscription = state
        .connect_subscriber_usecase
        .execute(room.clone(), tx)
        .await;
    let connection_id = subscription.connection_id;
    tracing::info!(
        room = %room,
        connection = %connection_id,
        subscribers = subscription.subscribers,
        "Connection joined room"
    );

    let (sender, mut receiver) = socket.split();

    let state_clone = state.clone();
    let room_clone = room.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!(connection = %connection_id, "WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => match kind {
                    RoomKind::GeoFeed => {
                        handle_geo_query(&state_clone, &room_clone, &connection_id, text.as_str())
                            .await
                    }
                    RoomKind::Comments => {
                        tracing::debug!(
                            connection = %connection_id,
                            "Ignoring text frame on comments socket"
                        );
                    }
                },
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                }
                Message::Close(_) => {
                    tracing::info!(connection = %connection_id, "Client requested close");
                    break;
                }
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let remaining = state
        .disconnect_subscriber_usecase
        .execute(&room, &connection_id)
        .await;
    tracing::info!(
        room = %room,
        connection = %connection_id,
        remaining,
        "Connection left room"
    );
}

async fn handle_geo_query(
    state: &AppState,
    room: &RoomName,
    connection_id: &ConnectionId,
    text: &str,
) {
    let usecase = &state.query_events_usecase;
    let parsed = GeoQueryRequest::parse(text).and_then(GeoQueryRequest::into_query);
    let result = match parsed {
        Ok((query, viewport)) => usecase.execute(room, &query, &viewport).await,
        Err(e) => Err(QueryEventsError::InvalidArgument(e.to_string())),
    };

    match result {
        Ok(delivered) => {
            tracing::debug!(connection = %connection_id, delivered, "Published geo query result");
        }
        Err(e) => {
            tracing::warn!(connection = %connection_id, "Geo query failed: {}", e);
            usecase.reply_failure(room, connection_id, &e).await;
        }
    }
}
