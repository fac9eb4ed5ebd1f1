//! HTTP API
//!
//! # 路由
//!
//! | 模块 | 前缀 | 认证 |
//! |------|------|------|
//! | health | /health | 无 |
//! | auth | /api/auth | 登录无需认证 |
//! | orders | /api/orders | 需要登录，删除全部/重置计数需管理员 |
//! | labs | /api/labs | 需要登录 |
//! | audit_log | /api/logs | 管理员 |
//! | parties | /api/parties | 需要登录 |
//! | qualities | /api/qualities | 需要登录 |

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;
use crate::middleware;

pub mod audit_log;
pub mod auth;
pub mod health;
pub mod labs;
pub mod orders;
pub mod parties;
pub mod qualities;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// 注册全部路由 (无中间件、无 state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(orders::router())
        .merge(labs::router())
        .merge(audit_log::router())
        .merge(parties::router())
        .merge(qualities::router())
}

/// 完整应用：路由 + 中间件 + state
///
/// HTTP 服务器和集成测试 (oneshot) 共用。
/// 后添加的 layer 在外层：请求 ID 最先生成，认证最靠近路由，
/// 因此 401 响应同样带有 `x-request-id` 并被日志记录。
pub fn build_app(state: ServerState) -> Router {
    build_router()
        // JWT 认证 - 注入 CurrentUser，内部跳过公共路由
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        .with_state(state)
}
