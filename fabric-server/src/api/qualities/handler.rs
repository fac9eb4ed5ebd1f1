use axum::extract::State;
use http::StatusCode;
use serde_json::json;

use crate::audit::{AuditAction, AuditEvent, Origin};
use crate::core::ServerState;
use crate::db::repository::{RepoError, quality};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{ApiJson, ApiResponse, AppError, AppResult, ErrorCode, ok, with_budget};
use shared::models::{Quality, QualityCreate};

const RESOURCE: &str = "quality";

/// GET /api/qualities
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<Quality>>> {
    let qualities = with_budget(
        state.config.query_timeout(),
        "list qualities",
        quality::find_all(&state.pool),
    )
    .await?;
    Ok(ok(qualities))
}

/// POST /api/qualities
pub async fn create(
    State(state): State<ServerState>,
    origin: Origin,
    ApiJson(payload): ApiJson<QualityCreate>,
) -> AppResult<(StatusCode, ApiResponse<Quality>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.weaver, "weaver", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let name = payload.name.trim().to_string();
    let created = with_budget(state.config.write_timeout(), "create quality", async {
        match quality::create(&state.pool, payload).await {
            Err(RepoError::Duplicate(_)) => Err(AppError::with_message(
                ErrorCode::QualityNameExists,
                format!("Quality '{name}' already exists"),
            )
            .with_detail("name", name.clone())),
            other => other.map_err(AppError::from),
        }
    })
    .await?;

    state.audit.record(
        AuditEvent::new(AuditAction::Create, RESOURCE)
            .resource_id(created.id)
            .details(json!({ "name": created.name }))
            .origin(&origin),
    );
    Ok((StatusCode::CREATED, ok(created)))
}
