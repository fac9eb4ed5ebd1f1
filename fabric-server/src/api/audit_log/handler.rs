//! 审计日志 API Handlers

use axum::extract::State;
use serde::Deserialize;

use crate::audit::{AuditListResponse, AuditQuery, AuditStats, DEFAULT_RECENT_ENTRIES};
use crate::core::ServerState;
use crate::utils::{ApiQuery, ApiResponse, AppResult, ok};

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    #[serde(default = "default_recent")]
    recent: i64,
}

fn default_recent() -> i64 {
    DEFAULT_RECENT_ENTRIES
}

/// GET /api/logs
pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(query): ApiQuery<AuditQuery>,
) -> AppResult<ApiResponse<AuditListResponse>> {
    let result = state.audit.query(query).await?;
    Ok(ok(result))
}

/// GET /api/logs/stats
pub async fn stats(
    State(state): State<ServerState>,
    ApiQuery(query): ApiQuery<StatsQuery>,
) -> AppResult<ApiResponse<AuditStats>> {
    let stats = state.audit.stats(query.recent).await?;
    Ok(ok(stats))
}
