//! Lab API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/labs | POST | 为订单行创建化验记录 |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/labs", post(handler::create))
}
