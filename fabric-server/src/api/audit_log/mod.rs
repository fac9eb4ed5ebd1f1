//! 审计日志 API (只读，管理员)
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/logs | GET | 条件查询 (分页) |
//! | /api/logs/stats | GET | 统计面板 (`?recent=N`，默认 10) |

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/logs", get(handler::list))
        .route("/api/logs/stats", get(handler::stats))
        .route_layer(middleware::from_fn(require_admin))
}
