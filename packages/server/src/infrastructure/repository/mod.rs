//! Repository 実装
//!
//! - `inmemory`: HashMap をストアとして使うインメモリ実装
//! - `fixture`: 起動時にフィクスチャファイルを投入する

pub mod fixture;
pub mod inmemory;

pub use inmemory::{
    InMemoryCommentRepository, InMemoryEventRepository, InMemoryRoomRegistry,
    InMemoryUserRepository,
};
pub use fixture::{FixtureError, FixtureSummary, load_fixtures};
