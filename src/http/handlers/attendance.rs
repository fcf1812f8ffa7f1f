use crate::error::EngineError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct VerifyAttendanceRequest {
    pub user_id: Uuid,
    pub token: String,
}

pub async fn verify(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<VerifyAttendanceRequest>,
) -> Result<impl IntoResponse, EngineError> {
    let participant = state
        .attendance_service
        .verify(event_id, req.user_id, &req.token)
        .await?;
    Ok(Json(participant))
}
