use crate::error::EngineError;
use crate::service::callback_service::CallbackOutcome;
use crate::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

pub async fn payment_callback(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<impl IntoResponse, EngineError> {
    let outcome = state.callback_service.apply_gateway_callback(payload).await?;
    let body = match outcome {
        CallbackOutcome::Applied(status) => json!({ "applied": true, "status": status }),
        CallbackOutcome::Duplicate => json!({ "applied": false, "duplicate": true }),
    };
    Ok(Json(body))
}
