use axum::extract::State;
use http::StatusCode;

use crate::audit::Origin;
use crate::core::ServerState;
use crate::utils::{ApiJson, ApiResponse, AppResult, ok};
use shared::models::{Lab, LabCreate};

/// POST /api/labs
pub async fn create(
    State(state): State<ServerState>,
    origin: Origin,
    ApiJson(input): ApiJson<LabCreate>,
) -> AppResult<(StatusCode, ApiResponse<Lab>)> {
    let lab = state.orders.create_lab(input, &origin).await?;
    Ok((StatusCode::CREATED, ok(lab)))
}
