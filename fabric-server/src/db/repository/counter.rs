//! Named Counter Repository
//!
//! 计数器只能通过单条原子语句修改 (upsert + RETURNING)，
//! 不允许应用层先读后写。

use super::RepoResult;
use sqlx::{Executor, Sqlite};

/// Atomically increment the counter (creating it on first use) and return the new value
pub async fn increment<'e, E>(executor: E, name: &str) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let seq = sqlx::query_scalar::<_, i64>(
        "INSERT INTO counter (name, seq) VALUES (?1, 1) \
         ON CONFLICT(name) DO UPDATE SET seq = seq + 1 \
         RETURNING seq",
    )
    .bind(name)
    .fetch_one(executor)
    .await?;
    Ok(seq)
}

/// Set the counter to zero (creating it if missing)
pub async fn reset<'e, E>(executor: E, name: &str) -> RepoResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO counter (name, seq) VALUES (?1, 0) \
         ON CONFLICT(name) DO UPDATE SET seq = 0",
    )
    .bind(name)
    .execute(executor)
    .await?;
    Ok(())
}

/// Zero the counter only while `fabric_order` is empty, in one statement.
///
/// Returns false when orders exist (nothing written).
pub async fn reset_if_no_orders<'e, E>(executor: E, name: &str) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(
        "INSERT INTO counter (name, seq) \
         SELECT ?1, 0 WHERE NOT EXISTS (SELECT 1 FROM fabric_order) \
         ON CONFLICT(name) DO UPDATE SET seq = 0",
    )
    .bind(name)
    .execute(executor)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Current value, 0 if the counter was never used
pub async fn current<'e, E>(executor: E, name: &str) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let seq = sqlx::query_scalar::<_, i64>("SELECT seq FROM counter WHERE name = ?1")
        .bind(name)
        .fetch_optional(executor)
        .await?;
    Ok(seq.unwrap_or(0))
}
