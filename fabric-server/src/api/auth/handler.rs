//! Authentication Handlers

use std::time::Duration;

use axum::extract::State;
use serde_json::json;
use validator::Validate;

use crate::audit::{AuditAction, AuditEvent, Origin, RequestMeta};
use crate::auth::{CurrentUser, verify_password};
use crate::core::ServerState;
use crate::db::repository::user;
use crate::utils::{ApiJson, ApiResponse, AppError, AppResult, ErrorCode, ok, ok_with_message, with_budget};
use shared::client::{LoginRequest, LoginResponse, UserInfo};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

const RESOURCE_AUTH: &str = "auth";

fn login_failed(state: &ServerState, meta: RequestMeta, username: &str, reason: &str) -> AppError {
    state.audit.record(
        AuditEvent::new(AuditAction::LoginFailed, RESOURCE_AUTH)
            .resource_id(format!("user:{username}"))
            .details(json!({ "reason": reason }))
            .origin(&Origin { actor: None, meta })
            .failed("invalid credentials"),
    );
    tracing::warn!(username = %username, reason, "Login failed");
    AppError::invalid_credentials()
}

/// Login handler
///
/// 用户不存在和密码错误返回同一错误，避免用户名枚举
pub async fn login(
    State(state): State<ServerState>,
    meta: RequestMeta,
    ApiJson(req): ApiJson<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let account = with_budget(
        state.config.query_timeout(),
        "find user",
        user::find_by_username(&state.pool, &req.username),
    )
    .await?;

    // Fixed delay (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let account = match account {
        None => return Err(login_failed(&state, meta, &req.username, "user_not_found")),
        Some(a) if !verify_password(&req.password, &a.password_hash) => {
            return Err(login_failed(&state, meta, &req.username, "invalid_password"));
        }
        Some(a) if !a.is_active => {
            state.audit.record(
                AuditEvent::new(AuditAction::LoginFailed, RESOURCE_AUTH)
                    .resource_id(format!("user:{}", a.username))
                    .origin(&Origin { actor: None, meta })
                    .failed("account disabled"),
            );
            return Err(AppError::with_message(
                ErrorCode::AccountDisabled,
                "Account has been disabled",
            ));
        }
        Some(a) => a,
    };

    let user_id = account.id.to_string();
    let token = state
        .get_jwt_service()
        .generate_token(&user_id, &account.username, &account.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    let current = CurrentUser {
        id: user_id.clone(),
        username: account.username.clone(),
        role: account.role.clone(),
    };
    state.audit.record(
        AuditEvent::new(AuditAction::Login, RESOURCE_AUTH)
            .resource_id(format!("user:{}", account.username))
            .origin(&Origin::user(&current, meta)),
    );
    tracing::info!(username = %account.username, role = %account.role, "User logged in");

    Ok(ok(LoginResponse {
        token,
        user: UserInfo {
            id: user_id,
            username: account.username,
            role: account.role,
        },
    }))
}

/// Get current user info
pub async fn me(user: CurrentUser) -> ApiResponse<UserInfo> {
    ok(UserInfo {
        id: user.id,
        username: user.username,
        role: user.role,
    })
}

/// Logout (令牌无状态，仅记录审计)
pub async fn logout(State(state): State<ServerState>, origin: Origin) -> ApiResponse<()> {
    let username = origin
        .actor
        .as_ref()
        .map(|a| a.username.clone())
        .unwrap_or_default();
    state.audit.record(
        AuditEvent::new(AuditAction::Logout, RESOURCE_AUTH)
            .resource_id(format!("user:{username}"))
            .origin(&origin),
    );
    tracing::info!(username = %username, "User logged out");
    ok_with_message("Logged out")
}
