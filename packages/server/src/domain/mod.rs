//! Domain layer
//!
//! リレーのドメインモデル（値オブジェクト、エンティティ）と、
//! UseCase 層が依存するインターフェース（Repository, MessagePusher）を定義します。

pub mod entity;
pub mod error;
pub mod factory;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{
    Audience, CachedFeatureState, RoomDeparture, RoomEntered, RoomMember, RoomSnapshot,
    ScopeFilter,
};
pub use error::{MessagePushError, RoomError, ValueObjectError};
pub use factory::{ConnectionIdFactory, RoomCodeFactory};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::{FeatureStateCache, RoomRegistry};
pub use value_object::{
    ConnectionId, FeatureKind, FeatureState, RoomCode, RoomName, RoomScope, Timestamp,
};
