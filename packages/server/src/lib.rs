//! Hiroba server: room-based live feeds over WebSocket.
//!
//! - `domain`: value objects, entities, geo clustering, and collaborator traits
//! - `infrastructure`: in-memory stores, the room broadcast hub, side-effect queue, DTOs
//! - `usecase`: one struct per operation
//! - `ui`: axum router and handlers

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
