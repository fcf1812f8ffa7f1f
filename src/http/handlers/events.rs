use crate::domain::event::CreateEventRequest;
use crate::error::EngineError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use uuid::Uuid;

pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, EngineError> {
    let event = state.events_service.create(req).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": event.id }))))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, EngineError> {
    let view = state.events_service.get_view(id).await?;
    Ok(Json(view))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, EngineError> {
    state.events_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
