//! 服务器状态
//!
//! `ServerState` 持有所有服务的共享引用，作为 axum State 在 handler 间克隆传递
//! (内部都是 Arc / 连接池，克隆开销很小)。

use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::audit::{AuditEvent, AuditService, AuditWorker};
use crate::auth::{JwtService, hash_password};
use crate::core::{Config, Result, ServerError};
use crate::db::DbService;
use crate::db::repository::user;
use crate::orders::OrdersManager;
use shared::models::ROLE_ADMIN;

#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// JWT 令牌服务
    pub jwt_service: Arc<JwtService>,
    /// 审计日志
    pub audit: AuditService,
    /// 订单生命周期
    pub orders: OrdersManager,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 1. 工作目录
    /// 2. 数据库 (WAL + migrations)
    /// 3. 审计服务 (返回 worker 接收端，由调用方启动)
    /// 4. 订单管理器
    /// 5. 初始管理员 (仅当没有任何用户且配置了 ADMIN_PASSWORD)
    pub async fn initialize(config: &Config) -> Result<(Self, mpsc::Receiver<AuditEvent>)> {
        config.ensure_work_dir()?;

        let db = DbService::new(&config.database_url).await?;
        let pool = db.pool;

        // 生产环境隐藏内部错误细节
        shared::error::hide_internal_details(config.is_production());

        let (audit, audit_rx) = AuditService::new(
            pool.clone(),
            config.audit_buffer_size,
            config.query_timeout(),
        );
        let orders = OrdersManager::new(
            pool.clone(),
            audit.clone(),
            config.query_timeout(),
            config.write_timeout(),
        );
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        let state = Self {
            config: config.clone(),
            pool,
            jwt_service,
            audit,
            orders,
        };
        state.ensure_admin().await?;

        Ok((state, audit_rx))
    }

    /// 启动审计 worker；所有 AuditService 克隆被 drop 后自动退出
    pub fn spawn_audit_worker(&self, rx: mpsc::Receiver<AuditEvent>) -> JoinHandle<()> {
        let worker = AuditWorker::new(self.audit.storage().clone());
        tokio::spawn(worker.run(rx))
    }

    async fn ensure_admin(&self) -> Result<()> {
        let Some(password) = &self.config.admin_password else {
            return Ok(());
        };
        if user::count(&self.pool).await.map_err(|e| ServerError::Database(e.to_string()))? > 0 {
            return Ok(());
        }

        let hash = hash_password(password)
            .map_err(|e| ServerError::Config(format!("Failed to hash admin password: {e}")))?;
        let admin = user::create(&self.pool, &self.config.admin_username, &hash, ROLE_ADMIN)
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;
        tracing::info!(username = %admin.username, "Initial admin account created");
        Ok(())
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
