//! 审计日志类型定义

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::auth::CurrentUser;

/// 审计操作类型（枚举，非自由文本）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    /// 批量删除全部订单 (并重置序号)
    DeleteAll,
    /// 序号计数器重置
    ResetCounter,
    View,
    Login,
    LoginFailed,
    Logout,
    Error,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::DeleteAll => "delete_all",
            Self::ResetCounter => "reset_counter",
            Self::View => "view",
            Self::Login => "login",
            Self::LoginFailed => "login_failed",
            Self::Logout => "logout",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 严重级别
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

/// 操作人 (系统事件为 None)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub username: String,
    pub role: String,
}

impl From<&CurrentUser> for Actor {
    fn from(user: &CurrentUser) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            role: user.role.clone(),
        }
    }
}

/// 请求元数据
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestMeta {
    /// 从请求头解析客户端 IP (`x-forwarded-for` 第一跳，其次 `x-real-ip`) 和 UA
    pub fn from_headers(headers: &http::HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let ip_address = header("x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .or_else(|| header("x-real-ip"))
            .map(str::to_string);

        Self {
            ip_address,
            user_agent: header("user-agent").map(str::to_string),
        }
    }
}

/// 触发操作的一方：谁 + 从哪里
#[derive(Debug, Clone, Default)]
pub struct Origin {
    pub actor: Option<Actor>,
    pub meta: RequestMeta,
}

impl Origin {
    /// 系统内部触发 (无用户)
    pub fn system() -> Self {
        Self::default()
    }

    pub fn user(user: &CurrentUser, meta: RequestMeta) -> Self {
        Self {
            actor: Some(Actor::from(user)),
            meta,
        }
    }
}

/// 待写入的审计事件
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub timestamp: i64,
    pub actor: Option<Actor>,
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub details: serde_json::Value,
    pub success: bool,
    pub severity: Severity,
    pub meta: RequestMeta,
}

impl AuditEvent {
    pub fn new(action: AuditAction, resource_type: impl Into<String>) -> Self {
        Self {
            timestamp: shared::util::now_millis(),
            actor: None,
            action,
            resource_type: resource_type.into(),
            resource_id: None,
            details: serde_json::Value::Object(Default::default()),
            success: true,
            severity: Severity::Info,
            meta: RequestMeta::default(),
        }
    }

    pub fn resource_id(mut self, id: impl ToString) -> Self {
        self.resource_id = Some(id.to_string());
        self
    }

    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn origin(mut self, origin: &Origin) -> Self {
        self.actor = origin.actor.clone();
        self.meta = origin.meta.clone();
        self
    }

    /// 标记失败；info 级别自动升为 warning
    pub fn failed(mut self, reason: impl Into<String>) -> Self {
        self.success = false;
        if self.severity == Severity::Info {
            self.severity = Severity::Warning;
        }
        if let serde_json::Value::Object(map) = &mut self.details {
            map.insert("error".into(), serde_json::Value::String(reason.into()));
        }
        self
    }
}

/// 审计日志条目（已落库，不可变）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    #[serde(rename = "_id")]
    pub id: i64,
    pub timestamp: i64,
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub role: Option<String>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub details: serde_json::Value,
    pub success: bool,
    pub severity: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// 审计日志查询参数
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    /// 起始时间（Unix 毫秒，含）
    pub from: Option<i64>,
    /// 截止时间（Unix 毫秒，含）
    pub to: Option<i64>,
    pub action: Option<AuditAction>,
    pub resource_type: Option<String>,
    pub user_id: Option<String>,
    pub success: Option<bool>,
    #[serde(default)]
    pub offset: i64,
    /// 分页大小（默认 50，最大 100）
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

/// 审计日志列表响应
#[derive(Debug, Serialize)]
pub struct AuditListResponse {
    pub items: Vec<AuditEntry>,
    pub total: i64,
}

/// 统计面板数据
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStats {
    pub total: i64,
    pub by_action: HashMap<String, i64>,
    pub by_resource_type: HashMap<String, i64>,
    pub recent: Vec<AuditEntry>,
}
