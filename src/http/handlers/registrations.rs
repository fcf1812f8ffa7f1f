use crate::error::EngineError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub user_id: Uuid,
}

pub async fn register(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, EngineError> {
    let participant = state
        .registration_service
        .register_free(event_id, req.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(participant)))
}
