//! Infrastructure layer.
//!
//! ドメイン層の trait の具体的な実装と、通信用の DTO。

pub mod dto;
pub mod message_pusher;
pub mod repository;
pub mod side_effect;
