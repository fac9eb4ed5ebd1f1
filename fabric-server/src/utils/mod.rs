//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型 (from shared::error)
//! - [`ApiResponse`] - API 响应结构 (from shared::error)
//! - 时间预算、日期、输入校验、日志等工具

pub mod extract;
pub mod logger;
pub mod time;
pub mod timeout;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use extract::{ApiJson, ApiQuery};
pub use timeout::with_budget;

/// 成功响应 (带数据)
pub fn ok<T>(data: T) -> ApiResponse<T> {
    ApiResponse::success(data)
}

/// 成功响应 (仅消息)
pub fn ok_with_message(message: impl Into<String>) -> ApiResponse<()> {
    ApiResponse::ok_with_message(message)
}
