use std::path::PathBuf;
use std::time::Duration;

use crate::auth::JwtConfig;
use crate::core::ServerError;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、日志) |
/// | DATABASE_URL | sqlite:<WORK_DIR>/fabric.db | SQLite 连接串 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | QUERY_TIMEOUT_MS | 5000 | 读操作时间预算(毫秒) |
/// | WRITE_TIMEOUT_MS | 10000 | 写操作时间预算(毫秒) |
/// | AUDIT_BUFFER_SIZE | 1024 | 审计通道容量 |
/// | JWT_SECRET | (开发环境自动生成) | JWT 密钥, 至少 32 字符 |
/// | JWT_EXPIRATION_MINUTES | 1440 | 令牌有效期 |
/// | ADMIN_USERNAME | admin | 初始管理员用户名 |
/// | ADMIN_PASSWORD | - | 初始管理员密码, 未设置则不创建 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 格式日志 |
/// | LOG_DIR | - | 日志文件目录 (按天滚动) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/fabric HTTP_PORT=8080 ADMIN_PASSWORD=secret cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// 数据库连接串
    pub database_url: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 读操作 (列表/查询) 时间预算 (毫秒)
    pub query_timeout_ms: u64,
    /// 写操作时间预算 (毫秒)
    pub write_timeout_ms: u64,
    /// 审计 mpsc 通道容量
    pub audit_buffer_size: usize,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 初始管理员
    pub admin_username: String,
    pub admin_password: Option<String>,
    /// 日志
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值。生产环境缺少 JWT_SECRET 时返回错误。
    pub fn from_env() -> Result<Self, ServerError> {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let is_production = environment == "production";

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| default_database_url(&work_dir));

        let jwt = JwtConfig::from_env(is_production)
            .map_err(|e| ServerError::Config(e.to_string()))?;

        Ok(Self {
            database_url,
            http_port: env_parse("HTTP_PORT", 3000),
            query_timeout_ms: env_parse("QUERY_TIMEOUT_MS", 5000),
            write_timeout_ms: env_parse("WRITE_TIMEOUT_MS", 10000),
            audit_buffer_size: env_parse::<usize>("AUDIT_BUFFER_SIZE", 1024).max(1),
            jwt,
            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            admin_password: std::env::var("ADMIN_PASSWORD").ok().filter(|p| !p.is_empty()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_parse("LOG_JSON", false),
            log_dir: std::env::var("LOG_DIR").ok(),
            work_dir,
            environment,
        })
    }

    /// 测试用配置：数据库位于 `work_dir`，固定 JWT 密钥
    pub fn for_work_dir(work_dir: impl Into<String>) -> Self {
        let work_dir = work_dir.into();
        Self {
            database_url: default_database_url(&work_dir),
            http_port: 0,
            environment: "test".into(),
            query_timeout_ms: 5000,
            write_timeout_ms: 10000,
            audit_buffer_size: 1024,
            jwt: JwtConfig {
                secret: "fabric-test-secret-key-at-least-32-chars".into(),
                expiration_minutes: 60,
                issuer: "fabric-server".into(),
                audience: "fabric-admin".into(),
            },
            admin_username: "admin".into(),
            admin_password: None,
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
            work_dir,
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    pub fn work_dir_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir)
    }

    /// 确保工作目录存在
    pub fn ensure_work_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.work_dir_path())
    }
}

fn default_database_url(work_dir: &str) -> String {
    format!("sqlite:{}/fabric.db", work_dir.trim_end_matches('/'))
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
