//! 订单模块
//!
//! - **sequence**: 订单序号分配 (数据库原子计数器)
//! - **manager**: 订单生命周期 (创建 / 状态 / 替换 / 删除 / 列表 / lab)
//!
//! ```text
//! HTTP handler → OrdersManager ─┬→ SequenceAllocator → counter
//!                               ├→ repository (SQLite)
//!                               └→ AuditService (fire-and-forget)
//! ```

pub mod manager;
pub mod sequence;

pub use manager::{
    BULK_ID_PREFIX, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, OrderListQuery, OrdersManager,
    RESOURCE_COUNTER, RESOURCE_LAB, RESOURCE_ORDER,
};
pub use sequence::{ORDER_COUNTER, SequenceAllocator};
