//! HTTP / WebSocket handlers.

mod http;
mod websocket;

pub use http::{get_rooms, get_thread_comments, health_check, post_comment};
pub use websocket::{comments_websocket_handler, events_websocket_handler};
