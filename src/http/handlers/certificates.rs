use crate::error::EngineError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

pub async fn issue(
    State(state): State<AppState>,
    Path((event_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, EngineError> {
    let cert = state.certificate_service.issue(event_id, user_id).await?;
    Ok((StatusCode::CREATED, Json(cert)))
}

pub async fn issue_all(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<impl IntoResponse, EngineError> {
    let report = state.certificate_service.issue_all_eligible(event_id).await?;
    Ok(Json(report))
}

pub async fn download(
    State(state): State<AppState>,
    Path(certificate_id): Path<Uuid>,
) -> Result<impl IntoResponse, EngineError> {
    let cert = state.certificate_service.record_download(certificate_id).await?;
    Ok(Json(cert))
}
