use axum::extract::State;
use http::StatusCode;
use serde_json::json;

use crate::audit::{AuditAction, AuditEvent, Origin};
use crate::core::ServerState;
use crate::db::repository::party;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{ApiJson, ApiResponse, AppResult, ok, with_budget};
use shared::models::{Party, PartyCreate};

const RESOURCE: &str = "party";

/// GET /api/parties
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<Party>>> {
    let parties = with_budget(
        state.config.query_timeout(),
        "list parties",
        party::find_all(&state.pool),
    )
    .await?;
    Ok(ok(parties))
}

/// POST /api/parties
pub async fn create(
    State(state): State<ServerState>,
    origin: Origin,
    ApiJson(payload): ApiJson<PartyCreate>,
) -> AppResult<(StatusCode, ApiResponse<Party>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.contact_name, "contactName", MAX_NAME_LEN)?;
    validate_optional_text(&payload.contact_phone, "contactPhone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;

    let created = with_budget(
        state.config.write_timeout(),
        "create party",
        party::create(&state.pool, payload),
    )
    .await?;

    state.audit.record(
        AuditEvent::new(AuditAction::Create, RESOURCE)
            .resource_id(created.id)
            .details(json!({ "name": created.name }))
            .origin(&origin),
    );
    Ok((StatusCode::CREATED, ok(created)))
}
