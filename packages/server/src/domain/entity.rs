//! Entities returned by the registry and the restoration cache.
//!
//! A room has no record of its own outside the registry: a `RoomSnapshot` is
//! a point-in-time copy taken while the room had at least one member.

use serde::Serialize;

use super::value_object::{
    ConnectionId, FeatureKind, FeatureState, RoomCode, RoomName, RoomScope, Timestamp,
};

/// One connection's membership in a room through a given scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomMember {
    pub connection_id: ConnectionId,
    pub scope: RoomScope,
    pub joined_at: Timestamp,
}

/// Point-in-time view of a room entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomSnapshot {
    pub code: RoomCode,
    /// Set by `create-room`; cleared once the session scope empties.
    pub name: Option<RoomName>,
    pub created_at: Timestamp,
    /// Members sorted by (scope, joined_at, connection_id)
    pub members: Vec<RoomMember>,
}

impl RoomSnapshot {
    pub fn count_in(&self, scope: RoomScope) -> usize {
        self.members_in(scope).count()
    }

    pub fn members_in(&self, scope: RoomScope) -> impl Iterator<Item = &RoomMember> {
        self.members.iter().filter(move |m| m.scope == scope)
    }

    pub fn has_member(&self, connection_id: &ConnectionId) -> bool {
        self.members
            .iter()
            .any(|m| &m.connection_id == connection_id)
    }
}

/// Membership removed from a room when a connection leaves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDeparture {
    pub code: RoomCode,
    pub scope: RoomScope,
    /// The room entry had no members left in any scope and was dropped.
    pub room_removed: bool,
}

/// Result of entering a room through one scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomEntered {
    pub room: RoomSnapshot,
    /// Room of the same scope the connection was moved out of, if any
    pub moved_out: Option<RoomDeparture>,
}

/// Last state pushed for a feature of a room.
///
/// `published_by` is informational only: whoever pushed last wins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CachedFeatureState {
    pub feature: FeatureKind,
    pub state: FeatureState,
    pub published_by: ConnectionId,
    pub published_at: Timestamp,
}

/// Which membership scopes a fan-out reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeFilter {
    Only(RoomScope),
    /// Union of every scope, each connection counted once
    Any,
}

impl ScopeFilter {
    pub fn matches(&self, scope: RoomScope) -> bool {
        match self {
            ScopeFilter::Only(only) => *only == scope,
            ScopeFilter::Any => true,
        }
    }
}

/// Delivery mode of a relayed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Audience {
    pub scope: ScopeFilter,
    pub include_sender: bool,
}

impl Audience {
    /// Everyone in the given scope except the sender.
    pub const fn others_in(scope: ScopeFilter) -> Self {
        Self {
            scope,
            include_sender: false,
        }
    }

    /// Everyone in the given scope, sender included.
    pub const fn everyone_in(scope: ScopeFilter) -> Self {
        Self {
            scope,
            include_sender: true,
        }
    }
}
