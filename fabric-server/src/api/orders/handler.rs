//! Order API Handlers

use axum::extract::{Path, State};
use http::StatusCode;
use serde::Serialize;

use crate::audit::{AuditEntry, MAX_RESOURCE_HISTORY, Origin, RequestMeta};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::orders::{OrderListQuery, RESOURCE_ORDER};
use crate::security_log;
use crate::utils::validation::parse_path_id;
use crate::utils::{ApiJson, ApiQuery, ApiResponse, AppError, AppResult, ok, ok_with_message};
use shared::models::{
    BulkOrderCreate, DeleteAllResult, Lab, Order, OrderCreate, OrderPage, OrderStatusChanged,
    OrderStatusUpdate,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedOrder {
    order_id: String,
}

fn ensure_admin(user: &CurrentUser, operation: &str) -> AppResult<()> {
    if user.is_admin() {
        return Ok(());
    }
    security_log!(
        "WARN",
        "admin_required",
        user_id = user.id.clone(),
        username = user.username.clone(),
        operation = operation.to_string()
    );
    Err(AppError::admin_required())
}

/// GET /api/orders
pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(query): ApiQuery<OrderListQuery>,
) -> AppResult<ApiResponse<OrderPage>> {
    let page = state.orders.list(&query).await?;
    Ok(ok(page))
}

/// POST /api/orders
pub async fn create(
    State(state): State<ServerState>,
    origin: Origin,
    ApiJson(input): ApiJson<OrderCreate>,
) -> AppResult<(StatusCode, ApiResponse<Order>)> {
    let order = state.orders.create(input, &origin).await?;
    Ok((StatusCode::CREATED, ok(order)))
}

/// POST /api/orders/bulk
pub async fn create_bulk(
    State(state): State<ServerState>,
    origin: Origin,
    ApiJson(input): ApiJson<BulkOrderCreate>,
) -> AppResult<(StatusCode, ApiResponse<Order>)> {
    let order = state.orders.create_bulk(input, &origin).await?;
    Ok((StatusCode::CREATED, ok(order)))
}

/// PATCH /api/orders/status
pub async fn update_status(
    State(state): State<ServerState>,
    origin: Origin,
    ApiJson(input): ApiJson<OrderStatusUpdate>,
) -> AppResult<ApiResponse<OrderStatusChanged>> {
    let changed = state.orders.update_status(input, &origin).await?;
    Ok(ok(changed))
}

/// DELETE /api/orders (管理员)
pub async fn delete_all(
    State(state): State<ServerState>,
    user: CurrentUser,
    meta: RequestMeta,
) -> AppResult<ApiResponse<DeleteAllResult>> {
    ensure_admin(&user, "delete_all_orders")?;
    let result = state.orders.delete_all(&Origin::user(&user, meta)).await?;
    Ok(ok(result))
}

/// POST /api/orders/reset-counter (管理员)
pub async fn reset_counter(
    State(state): State<ServerState>,
    user: CurrentUser,
    meta: RequestMeta,
) -> AppResult<ApiResponse<()>> {
    ensure_admin(&user, "reset_counter")?;
    state.orders.reset_counter(&Origin::user(&user, meta)).await?;
    Ok(ok_with_message("Order counter reset"))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Order>> {
    let id = parse_path_id(&id, "id")?;
    let order = state.orders.get(id).await?;
    Ok(ok(order))
}

/// PUT /api/orders/{id}
pub async fn replace(
    State(state): State<ServerState>,
    origin: Origin,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<OrderCreate>,
) -> AppResult<ApiResponse<Order>> {
    let id = parse_path_id(&id, "id")?;
    let order = state.orders.replace(id, input, &origin).await?;
    Ok(ok(order))
}

/// DELETE /api/orders/{id}
pub async fn delete_one(
    State(state): State<ServerState>,
    origin: Origin,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<DeletedOrder>> {
    let id = parse_path_id(&id, "id")?;
    let order_id = state.orders.delete_one(id, &origin).await?;
    Ok(ApiResponse::success_with_message(
        "Order deleted",
        DeletedOrder { order_id },
    ))
}

/// GET /api/orders/{id}/logs
pub async fn logs(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<AuditEntry>>> {
    let id = parse_path_id(&id, "id")?;
    let entries = state
        .audit
        .for_resource(RESOURCE_ORDER, &id.to_string(), MAX_RESOURCE_HISTORY)
        .await?;
    Ok(ok(entries))
}

/// GET /api/orders/{id}/labs
pub async fn labs(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<Lab>>> {
    let id = parse_path_id(&id, "id")?;
    let labs = state.orders.labs_for_order(id).await?;
    Ok(ok(labs))
}
