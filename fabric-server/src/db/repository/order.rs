//! Order Repository
//!
//! 订单行内嵌 items JSON 数组；读取时 LEFT JOIN party 填充 party_name。

use super::RepoResult;
use chrono::NaiveDate;
use shared::models::{Order, OrderItem, OrderStatus, OrderStatusChanged, OrderType};
use sqlx::types::Json;
use sqlx::{Executor, QueryBuilder, Sqlite, SqlitePool};

const ORDER_SELECT: &str = "SELECT o.id, o.order_id, o.order_type, o.arrival_date, o.delivery_date, \
     o.po_number, o.style_no, o.party_id, p.name AS party_name, o.items, o.status, \
     o.created_at, o.updated_at \
     FROM fabric_order o LEFT JOIN party p ON p.id = o.party_id";

/// Row payload for insert / replace
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub order_type: OrderType,
    pub arrival_date: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    pub po_number: Option<String>,
    pub style_no: Option<String>,
    pub party_id: i64,
    pub items: Vec<OrderItem>,
}

/// List filter, already validated and clamped by the caller
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub order_type: Option<OrderType>,
    /// created_at >= from (Unix millis)
    pub from: Option<i64>,
    /// created_at < to (Unix millis)
    pub to: Option<i64>,
    pub limit: i64,
    pub offset: i64,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!("{ORDER_SELECT} WHERE o.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(order)
}

#[cfg(test)]
pub(crate) async fn count_all<'e, E>(executor: E) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM fabric_order")
        .fetch_one(executor)
        .await?;
    Ok(count)
}

pub async fn insert(
    pool: &SqlitePool,
    id: i64,
    order_id: &str,
    record: &OrderRecord,
    now: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO fabric_order (id, order_id, order_type, arrival_date, delivery_date, po_number, style_no, party_id, items, status, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
    )
    .bind(id)
    .bind(order_id)
    .bind(record.order_type)
    .bind(record.arrival_date)
    .bind(record.delivery_date)
    .bind(&record.po_number)
    .bind(&record.style_no)
    .bind(record.party_id)
    .bind(Json(&record.items))
    .bind(OrderStatus::Pending)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

/// Replace mutable fields; order_id and status are kept. Returns false if no such order.
pub async fn replace(pool: &SqlitePool, id: i64, record: &OrderRecord, now: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE fabric_order SET order_type = ?1, arrival_date = ?2, delivery_date = ?3, po_number = ?4, \
         style_no = ?5, party_id = ?6, items = ?7, updated_at = ?8 WHERE id = ?9",
    )
    .bind(record.order_type)
    .bind(record.arrival_date)
    .bind(record.delivery_date)
    .bind(&record.po_number)
    .bind(&record.style_no)
    .bind(record.party_id)
    .bind(Json(&record.items))
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Partial update: only status (and updated_at) is written
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    status: OrderStatus,
    now: i64,
) -> RepoResult<Option<OrderStatusChanged>> {
    let row = sqlx::query_as::<_, (i64, String, OrderStatus)>(
        "UPDATE fabric_order SET status = ?1, updated_at = ?2 WHERE id = ?3 RETURNING id, order_id, status",
    )
    .bind(status)
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|(id, order_id, status)| OrderStatusChanged {
        id,
        order_id,
        status,
    }))
}

/// Hard delete, returns the deleted order number
pub async fn delete<'e, E>(executor: E, id: i64) -> RepoResult<Option<String>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let order_id = sqlx::query_scalar::<_, String>(
        "DELETE FROM fabric_order WHERE id = ? RETURNING order_id",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(order_id)
}

pub async fn delete_all<'e, E>(executor: E) -> RepoResult<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query("DELETE FROM fabric_order").execute(executor).await?;
    Ok(rows.rows_affected())
}

fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &OrderFilter) {
    qb.push(" WHERE 1 = 1");
    if let Some(order_type) = filter.order_type {
        qb.push(" AND o.order_type = ").push_bind(order_type);
    }
    if let Some(from) = filter.from {
        qb.push(" AND o.created_at >= ").push_bind(from);
    }
    if let Some(to) = filter.to {
        qb.push(" AND o.created_at < ").push_bind(to);
    }
}

/// Filtered page (newest first) plus the total count of matching rows
pub async fn find_page(pool: &SqlitePool, filter: &OrderFilter) -> RepoResult<(Vec<Order>, i64)> {
    let mut count_qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM fabric_order o");
    push_filter(&mut count_qb, filter);
    let total = count_qb
        .build_query_scalar::<i64>()
        .fetch_one(pool)
        .await?;

    let mut qb = QueryBuilder::<Sqlite>::new(ORDER_SELECT);
    push_filter(&mut qb, filter);
    qb.push(" ORDER BY o.created_at DESC, o.id DESC LIMIT ")
        .push_bind(filter.limit)
        .push(" OFFSET ")
        .push_bind(filter.offset);
    let orders = qb.build_query_as::<Order>().fetch_all(pool).await?;

    Ok((orders, total))
}
