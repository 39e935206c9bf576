// ============================================================
// Layer 1 — Prediction API Handlers
// ============================================================

use axum::{extract::State, http::StatusCode, Json};

use crate::web::types::{ErrorResponse, HealthResponse, PredictRequest, PredictResponse};
use crate::web::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse { error: error.into() }))
}

/// POST /predict
pub async fn predict_handler(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let input = request.validate().map_err(|msg| {
        tracing::debug!("Rejected prediction request {request:?}: {msg}");
        api_error(StatusCode::UNPROCESSABLE_ENTITY, msg)
    })?;

    let demand = state.predictor.predict_one(input).map_err(|e| {
        tracing::error!("Prediction failed for {request:?}: {e:#}");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("prediction failed: {e}"))
    })?;

    tracing::debug!("Predicted demand {demand} for {request:?}");
    Ok(Json(PredictResponse { demand }))
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model:  state.predictor.model_name(),
    })
}
