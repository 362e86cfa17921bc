//! Infrastructure layer
//!
//! ドメイン層が定義するインターフェースの具体的な実装と、
//! 通信プロトコルの DTO を提供します。

pub mod dto;
pub mod message_pusher;
pub mod repository;
