//! Conversion logic between DTOs and domain entities.

use chalkboard_shared::time::timestamp_to_rfc3339;

use crate::domain::{RoomMember, RoomScope, RoomSnapshot};
use crate::infrastructure::dto::{http, websocket as ws};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&RoomSnapshot> for ws::RoomAdmission {
    fn from(snapshot: &RoomSnapshot) -> Self {
        Self {
            room_code: snapshot.code.as_str().to_string(),
            room_name: snapshot.name.as_ref().map(|n| n.as_str().to_string()),
        }
    }
}

impl From<&RoomSnapshot> for http::RoomSummaryDto {
    fn from(snapshot: &RoomSnapshot) -> Self {
        Self {
            code: snapshot.code.as_str().to_string(),
            name: snapshot.name.as_ref().map(|n| n.as_str().to_string()),
            session_members: snapshot.count_in(RoomScope::Session),
            board_members: snapshot.count_in(RoomScope::Board),
            created_at: timestamp_to_rfc3339(snapshot.created_at.value()),
        }
    }
}

impl From<&RoomMember> for http::MemberDetailDto {
    fn from(member: &RoomMember) -> Self {
        Self {
            connection_id: member.connection_id.as_str().to_string(),
            scope: member.scope,
            joined_at: timestamp_to_rfc3339(member.joined_at.value()),
        }
    }
}
