//! Order API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/orders | GET | 分页列表 |
//! | /api/orders | POST | 创建 (分配序号) |
//! | /api/orders | DELETE | 删除全部并重置序号 (管理员) |
//! | /api/orders/bulk | POST | 创建散货订单 |
//! | /api/orders/status | PATCH | 更新状态 |
//! | /api/orders/reset-counter | POST | 重置序号 (管理员，仅无订单时) |
//! | /api/orders/{id} | GET / PUT / DELETE | 单个订单 |
//! | /api/orders/{id}/logs | GET | 审计历史 (最多 50 条) |
//! | /api/orders/{id}/labs | GET | 有效化验记录 |

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/orders",
            get(handler::list)
                .post(handler::create)
                .delete(handler::delete_all),
        )
        .route("/api/orders/bulk", post(handler::create_bulk))
        .route("/api/orders/status", patch(handler::update_status))
        .route("/api/orders/reset-counter", post(handler::reset_counter))
        .route(
            "/api/orders/{id}",
            get(handler::get_by_id)
                .put(handler::replace)
                .delete(handler::delete_one),
        )
        .route("/api/orders/{id}/logs", get(handler::logs))
        .route("/api/orders/{id}/labs", get(handler::labs))
}
