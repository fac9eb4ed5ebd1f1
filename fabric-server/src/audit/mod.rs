//! 审计日志模块
//!
//! 记录业务操作 (订单创建/删除、序号重置、登录等)。
//! 写入异步进行，审计失败不影响业务结果。

mod service;
mod storage;
mod types;
mod worker;

pub use service::{AuditService, DEFAULT_RECENT_ENTRIES, MAX_RESOURCE_HISTORY};
pub use storage::AuditStorage;
pub use types::*;
pub use worker::AuditWorker;
