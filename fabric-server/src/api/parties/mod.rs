//! Party API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/parties | GET | 全部客户 (按名称) |
//! | /api/parties | POST | 新建客户 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/parties", get(handler::list).post(handler::create))
}
