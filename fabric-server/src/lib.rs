//! Fabric Server - 面料贸易订单管理后台服务
//!
//! # 架构概述
//!
//! - **订单** (`orders`): 序号分配器 + 订单生命周期管理
//! - **审计** (`audit`): 非阻塞审计日志 (mpsc → worker → audit_log 表)
//! - **数据库** (`db`): SQLite (sqlx, WAL)
//! - **认证** (`auth`): JWT + Argon2
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! fabric-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、中间件
//! ├── audit/         # 审计日志
//! ├── orders/        # 序号分配、订单管理
//! ├── api/           # HTTP 路由和处理器
//! ├── middleware/    # 请求日志
//! ├── utils/         # 工具函数
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod audit;
pub mod auth;
pub mod core;
pub mod db;
pub mod middleware;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use audit::{AuditService, AuditWorker};
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::{OrdersManager, SequenceAllocator};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::init_logger;

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    ______      __         _
   / ____/___ _/ /_  _____(_)____
  / /_  / __ `/ __ \/ ___/ / ___/
 / __/ / /_/ / /_/ / /  / / /__
/_/    \__,_/_.___/_/  /_/\___/
    "#
    );
}
