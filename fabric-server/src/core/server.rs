//! Server Implementation
//!
//! HTTP 服务器启动和管理

use std::time::Duration;

use crate::api;
use crate::core::{Config, Result, ServerError, ServerState};

/// 关闭时等待审计 worker 写完剩余事件的最长时间
const AUDIT_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP Server
pub struct Server {
    config: Config,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> Result<()> {
        let (state, audit_rx) = ServerState::initialize(&self.config).await?;
        let audit_worker = state.spawn_audit_worker(audit_rx);

        let app = api::build_app(state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("🧵 Fabric Server listening on {}", addr);

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Internal(e.into()))?;

        // Router (及其中的 AuditService sender) 已释放，worker 排空通道后退出
        match tokio::time::timeout(AUDIT_DRAIN_TIMEOUT, audit_worker).await {
            Ok(_) => tracing::info!("Audit worker drained"),
            Err(_) => tracing::warn!("Audit worker did not drain in time, remaining events dropped"),
        }

        Ok(())
    }
}
