//! 审计日志存储 (audit_log 表)
//!
//! Append-only：只有 INSERT 和 SELECT，无更新/删除接口。

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::HashMap;

use super::types::{AuditEntry, AuditEvent, AuditQuery};
use crate::db::repository::RepoResult;

const ENTRY_SELECT: &str = "SELECT id, timestamp, user_id, username, role, action, resource_type, \
     resource_id, details, success, severity, ip_address, user_agent FROM audit_log";

#[derive(sqlx::FromRow)]
struct AuditRow {
    id: i64,
    timestamp: i64,
    user_id: Option<String>,
    username: Option<String>,
    role: Option<String>,
    action: String,
    resource_type: String,
    resource_id: Option<String>,
    details: sqlx::types::Json<serde_json::Value>,
    success: bool,
    severity: String,
    ip_address: Option<String>,
    user_agent: Option<String>,
}

impl From<AuditRow> for AuditEntry {
    fn from(row: AuditRow) -> Self {
        Self {
            id: row.id,
            timestamp: row.timestamp,
            user_id: row.user_id,
            username: row.username,
            role: row.role,
            action: row.action,
            resource_type: row.resource_type,
            resource_id: row.resource_id,
            details: row.details.0,
            success: row.success,
            severity: row.severity,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
        }
    }
}

/// 审计存储
#[derive(Clone)]
pub struct AuditStorage {
    pool: SqlitePool,
}

impl AuditStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 追加一条审计记录
    pub async fn append(&self, event: &AuditEvent) -> RepoResult<i64> {
        let id = shared::util::snowflake_id();
        let (user_id, username, role) = match &event.actor {
            Some(a) => (Some(&a.id), Some(&a.username), Some(&a.role)),
            None => (None, None, None),
        };
        sqlx::query(
            "INSERT INTO audit_log (id, timestamp, user_id, username, role, action, resource_type, resource_id, details, success, severity, ip_address, user_agent) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )
        .bind(id)
        .bind(event.timestamp)
        .bind(user_id)
        .bind(username)
        .bind(role)
        .bind(event.action.as_str())
        .bind(&event.resource_type)
        .bind(&event.resource_id)
        .bind(sqlx::types::Json(&event.details))
        .bind(event.success)
        .bind(event.severity.as_str())
        .bind(&event.meta.ip_address)
        .bind(&event.meta.user_agent)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    /// 最近 N 条 (新 → 旧)
    pub async fn recent(&self, limit: i64) -> RepoResult<Vec<AuditEntry>> {
        let rows = sqlx::query_as::<_, AuditRow>(&format!(
            "{ENTRY_SELECT} ORDER BY timestamp DESC, id DESC LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(AuditEntry::from).collect())
    }

    /// 某资源的最近记录 (新 → 旧)
    pub async fn for_resource(
        &self,
        resource_type: &str,
        resource_id: &str,
        limit: i64,
    ) -> RepoResult<Vec<AuditEntry>> {
        let rows = sqlx::query_as::<_, AuditRow>(&format!(
            "{ENTRY_SELECT} WHERE resource_type = ? AND resource_id = ? ORDER BY timestamp DESC, id DESC LIMIT ?"
        ))
        .bind(resource_type)
        .bind(resource_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(AuditEntry::from).collect())
    }

    /// 按列分组计数 (`column` 只能是内部常量)
    async fn count_by(&self, column: &'static str) -> RepoResult<HashMap<String, i64>> {
        let rows = sqlx::query_as::<_, (String, i64)>(&format!(
            "SELECT {column}, COUNT(*) FROM audit_log GROUP BY {column}"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().collect())
    }

    pub async fn count_by_action(&self) -> RepoResult<HashMap<String, i64>> {
        self.count_by("action").await
    }

    pub async fn count_by_resource_type(&self) -> RepoResult<HashMap<String, i64>> {
        self.count_by("resource_type").await
    }

    pub async fn count_all(&self) -> RepoResult<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM audit_log")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, q: &AuditQuery) {
        qb.push(" WHERE 1 = 1");
        if let Some(from) = q.from {
            qb.push(" AND timestamp >= ").push_bind(from);
        }
        if let Some(to) = q.to {
            qb.push(" AND timestamp <= ").push_bind(to);
        }
        if let Some(action) = q.action {
            qb.push(" AND action = ").push_bind(action.as_str());
        }
        if let Some(resource_type) = &q.resource_type {
            qb.push(" AND resource_type = ").push_bind(resource_type.clone());
        }
        if let Some(user_id) = &q.user_id {
            qb.push(" AND user_id = ").push_bind(user_id.clone());
        }
        if let Some(success) = q.success {
            qb.push(" AND success = ").push_bind(success);
        }
    }

    /// 分页查询 (新 → 旧)，返回 (条目, 总数)
    pub async fn query(&self, q: &AuditQuery) -> RepoResult<(Vec<AuditEntry>, i64)> {
        let mut count_qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM audit_log");
        Self::push_filter(&mut count_qb, q);
        let total = count_qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut qb = QueryBuilder::<Sqlite>::new(ENTRY_SELECT);
        Self::push_filter(&mut qb, q);
        qb.push(" ORDER BY timestamp DESC, id DESC LIMIT ")
            .push_bind(q.limit)
            .push(" OFFSET ")
            .push_bind(q.offset);
        let rows = qb.build_query_as::<AuditRow>().fetch_all(&self.pool).await?;

        Ok((rows.into_iter().map(AuditEntry::from).collect(), total))
    }
}
