//! インメモリ実装
//!
//! 外部ストアの代わりにプロセス内の HashMap を使う。

mod comment;
mod event;
mod room;
mod user;

pub use comment::InMemoryCommentRepository;
pub use event::InMemoryEventRepository;
pub use room::InMemoryRoomRegistry;
pub use user::InMemoryUserRepository;
