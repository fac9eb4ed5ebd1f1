//! 审计日志后台 Worker
//!
//! 从 mpsc 通道消费 AuditEvent，写入 audit_log 表。
//! 通道关闭时（所有 sender 被 drop）处理完剩余事件后退出。

use tokio::sync::mpsc;

use super::storage::AuditStorage;
use super::types::AuditEvent;

/// 审计日志后台 Worker
pub struct AuditWorker {
    storage: AuditStorage,
}

impl AuditWorker {
    pub fn new(storage: AuditStorage) -> Self {
        Self { storage }
    }

    /// 运行 worker（阻塞直到通道关闭）
    pub async fn run(self, mut rx: mpsc::Receiver<AuditEvent>) {
        tracing::info!("📋 Audit log worker started");

        while let Some(event) = rx.recv().await {
            match self.storage.append(&event).await {
                Ok(id) => {
                    tracing::debug!(
                        audit_id = id,
                        action = %event.action,
                        resource = %event.resource_type,
                        "Audit entry recorded"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        action = %event.action,
                        resource = %event.resource_type,
                        "Failed to write audit entry: {e}"
                    );
                }
            }
        }

        tracing::info!("Audit log channel closed, worker stopping");
    }
}
