//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::{FeatureKind, RoomScope};

/// Room summary for `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub code: String,
    pub name: Option<String>,
    pub session_members: usize,
    pub board_members: usize,
    pub created_at: String,
}

/// Member entry of a room detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetailDto {
    pub connection_id: String,
    pub scope: RoomScope,
    pub joined_at: String,
}

/// Room detail for `GET /api/rooms/{code}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub code: String,
    pub name: Option<String>,
    pub created_at: String,
    pub members: Vec<MemberDetailDto>,
    pub cached_features: Vec<FeatureKind>,
}
