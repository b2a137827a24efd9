//! Data Transfer Objects (DTOs).
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket envelopes and the inbound geo query
//! - `http`: HTTP API request/response bodies
//! - `fixture`: startup fixture file format
//! - `conversion`: Domain ⇔ DTO conversions
//! - `encoder`: JSON implementation of the domain `PayloadEncoder`

pub mod conversion;
pub mod encoder;
pub mod fixture;
pub mod http;
pub mod websocket;
