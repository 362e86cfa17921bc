//! In-memory implementations backed by `HashMap`s behind `tokio::sync::Mutex`.
//!
//! Membership and cached state live in this process only.

mod room_registry;
mod state_cache;

pub use room_registry::InMemoryRoomRegistry;
pub use state_cache::InMemoryFeatureStateCache;
