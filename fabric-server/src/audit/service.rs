//! 审计日志服务
//!
//! `AuditService` 提供：
//! - 日志写入（`record` 非阻塞投递到 mpsc 通道，由 worker 落库）
//! - 日志查询（直接读取 audit_log 表，受读超时约束）
//!
//! 写入是 fire-and-forget：通道已满或已关闭时丢弃并告警，
//! 绝不让审计失败影响业务请求。

use std::time::Duration;

use sqlx::SqlitePool;
use tokio::sync::mpsc;

use super::storage::AuditStorage;
use super::types::*;
use crate::utils::{AppError, AppResult, with_budget};

/// 单个资源的历史记录上限
pub const MAX_RESOURCE_HISTORY: i64 = 50;

/// 统计面板中 "最近" 条目数 (默认)
pub const DEFAULT_RECENT_ENTRIES: i64 = 10;

/// 列表查询分页上限
const MAX_QUERY_LIMIT: i64 = 100;

/// 审计日志服务
#[derive(Clone)]
pub struct AuditService {
    storage: AuditStorage,
    tx: mpsc::Sender<AuditEvent>,
    read_budget: Duration,
}

impl std::fmt::Debug for AuditService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditService")
            .field("read_budget", &self.read_budget)
            .finish_non_exhaustive()
    }
}

impl AuditService {
    /// 创建审计服务，返回 (服务, worker 接收端)
    pub fn new(
        pool: SqlitePool,
        buffer_size: usize,
        read_budget: Duration,
    ) -> (Self, mpsc::Receiver<AuditEvent>) {
        let (tx, rx) = mpsc::channel(buffer_size.max(1));
        let service = Self {
            storage: AuditStorage::new(pool),
            tx,
            read_budget,
        };
        (service, rx)
    }

    pub fn storage(&self) -> &AuditStorage {
        &self.storage
    }

    /// 记录审计事件（非阻塞，永不失败）
    pub fn record(&self, event: AuditEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(event)) => {
                tracing::warn!(
                    action = %event.action,
                    resource = %event.resource_type,
                    "Audit channel full, event dropped"
                );
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                tracing::warn!(
                    action = %event.action,
                    resource = %event.resource_type,
                    "Audit channel closed, event dropped"
                );
            }
        }
    }

    /// 统计：总数 + 按操作/资源类型分组 + 最近 `recent` 条记录
    pub async fn stats(&self, recent: i64) -> AppResult<AuditStats> {
        let recent = recent.clamp(1, MAX_RESOURCE_HISTORY);
        with_budget(self.read_budget, "audit stats", async {
            let total = self.storage.count_all().await?;
            let by_action = self.storage.count_by_action().await?;
            let by_resource_type = self.storage.count_by_resource_type().await?;
            let recent = self.storage.recent(recent).await?;
            Ok::<_, AppError>(AuditStats {
                total,
                by_action,
                by_resource_type,
                recent,
            })
        })
        .await
    }

    /// 某资源的历史记录（新 → 旧，最多 50 条）
    pub async fn for_resource(
        &self,
        resource_type: &str,
        resource_id: &str,
        limit: i64,
    ) -> AppResult<Vec<AuditEntry>> {
        let limit = limit.clamp(1, MAX_RESOURCE_HISTORY);
        with_budget(
            self.read_budget,
            "audit history",
            self.storage.for_resource(resource_type, resource_id, limit),
        )
        .await
    }

    /// 条件查询
    pub async fn query(&self, mut q: AuditQuery) -> AppResult<AuditListResponse> {
        q.limit = q.limit.clamp(1, MAX_QUERY_LIMIT);
        q.offset = q.offset.max(0);
        let (items, total) =
            with_budget(self.read_budget, "audit query", self.storage.query(&q)).await?;
        Ok(AuditListResponse { items, total })
    }
}
