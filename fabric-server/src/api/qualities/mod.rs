//! Quality API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/qualities | GET | 全部面料品质 (按名称) |
//! | /api/qualities | POST | 新建品质 (名称唯一) |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/qualities", get(handler::list).post(handler::create))
}
