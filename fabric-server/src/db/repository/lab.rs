//! Lab Repository

use super::RepoResult;
use chrono::NaiveDate;
use shared::models::{Lab, LabStatus};
use sqlx::{Executor, Sqlite, SqlitePool};

const LAB_SELECT: &str = "SELECT id, order_id, order_item_id, status, lab_send_date, lab_send_number, \
     remarks, soft_deleted, created_at, updated_at FROM lab";

#[derive(Debug, Clone)]
pub struct LabRecord {
    pub order_id: i64,
    pub order_item_id: i64,
    pub status: LabStatus,
    pub lab_send_date: Option<NaiveDate>,
    pub lab_send_number: Option<String>,
    pub remarks: Option<String>,
}

/// Insert a lab only while its parent order exists and still carries the item.
///
/// Existence check and insert are one statement, so a concurrent order delete
/// cannot leave an active lab behind. Returns None when nothing was inserted.
pub async fn insert(
    pool: &SqlitePool,
    id: i64,
    record: &LabRecord,
    now: i64,
) -> RepoResult<Option<Lab>> {
    let rows = sqlx::query(
        "INSERT INTO lab (id, order_id, order_item_id, status, lab_send_date, lab_send_number, remarks, soft_deleted, created_at, updated_at) \
         SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, ?8 \
         WHERE EXISTS (SELECT 1 FROM fabric_order o, json_each(o.items) AS item \
                       WHERE o.id = ?2 AND json_extract(item.value, '$._id') = ?3)",
    )
    .bind(id)
    .bind(record.order_id)
    .bind(record.order_item_id)
    .bind(record.status)
    .bind(record.lab_send_date)
    .bind(&record.lab_send_number)
    .bind(&record.remarks)
    .bind(now)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Ok(None);
    }

    let lab = sqlx::query_as::<_, Lab>(&format!("{LAB_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(Some(lab))
}

/// Active (not soft-deleted) labs of an order
pub async fn find_active_by_order(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<Lab>> {
    let labs = sqlx::query_as::<_, Lab>(&format!(
        "{LAB_SELECT} WHERE order_id = ? AND soft_deleted = 0 ORDER BY created_at, id"
    ))
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(labs)
}

/// All labs of an order, soft-deleted included
#[cfg(test)]
pub(crate) async fn find_all_by_order(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<Lab>> {
    let labs = sqlx::query_as::<_, Lab>(&format!(
        "{LAB_SELECT} WHERE order_id = ? ORDER BY created_at, id"
    ))
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(labs)
}

pub async fn soft_delete_by_order<'e, E>(executor: E, order_id: i64, now: i64) -> RepoResult<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(
        "UPDATE lab SET soft_deleted = 1, updated_at = ?1 WHERE order_id = ?2 AND soft_deleted = 0",
    )
    .bind(now)
    .bind(order_id)
    .execute(executor)
    .await?;
    Ok(rows.rows_affected())
}

pub async fn soft_delete_all<'e, E>(executor: E, now: i64) -> RepoResult<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query("UPDATE lab SET soft_deleted = 1, updated_at = ?1 WHERE soft_deleted = 0")
        .bind(now)
        .execute(executor)
        .await?;
    Ok(rows.rows_affected())
}
