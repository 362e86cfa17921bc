//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use chalkboard_shared::time::timestamp_to_rfc3339;

use crate::{
    infrastructure::dto::http::{MemberDetailDto, RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
    usecase::GetRoomDetailError,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms that currently have members
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;
    Json(rooms.iter().map(RoomSummaryDto::from).collect())
}

/// Get room detail by code
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.get_room_detail_usecase.execute(code).await {
        Ok(detail) => {
            // Domain Model から DTO への変換
            let room = detail.room;
            Ok(Json(RoomDetailDto {
                code: room.code.as_str().to_string(),
                name: room.name.as_ref().map(|n| n.as_str().to_string()),
                created_at: timestamp_to_rfc3339(room.created_at.value()),
                members: room.members.iter().map(MemberDetailDto::from).collect(),
                cached_features: detail.cached_features,
            }))
        }
        Err(GetRoomDetailError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
        Err(GetRoomDetailError::InvalidRoomCode(e)) => {
            tracing::debug!("Rejected room detail request: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
    }
}
