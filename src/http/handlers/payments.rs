use crate::domain::payment::TicketSelection;
use crate::error::EngineError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub selection: TicketSelection,
}

pub async fn checkout(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, EngineError> {
    let resp = state
        .payment_service
        .checkout(event_id, req.user_id, req.selection)
        .await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    pub approver_id: Uuid,
}

pub async fn approve(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
    Json(req): Json<ApproveRequest>,
) -> Result<impl IntoResponse, EngineError> {
    let approved = state
        .payment_service
        .approve(payment_id, req.approver_id)
        .await?;
    Ok(Json(json!({ "approved": approved })))
}
