//! Quality Repository

use super::RepoResult;
use shared::models::{Quality, QualityCreate};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Quality>> {
    let qualities = sqlx::query_as::<_, Quality>(
        "SELECT id, name, weaver, description, created_at FROM quality ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(qualities)
}

/// Ids among `ids` that have no quality row
pub async fn find_missing(pool: &SqlitePool, ids: &[i64]) -> RepoResult<Vec<i64>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT id FROM quality WHERE id IN (");
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
    let found: Vec<i64> = qb.build_query_scalar().fetch_all(pool).await?;

    let mut missing: Vec<i64> = ids.iter().copied().filter(|id| !found.contains(id)).collect();
    missing.dedup();
    Ok(missing)
}

/// Insert; a duplicate name surfaces as `RepoError::Duplicate`
pub async fn create(pool: &SqlitePool, data: QualityCreate) -> RepoResult<Quality> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let name = data.name.trim().to_string();
    sqlx::query(
        "INSERT INTO quality (id, name, weaver, description, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(id)
    .bind(&name)
    .bind(&data.weaver)
    .bind(&data.description)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Quality {
        id,
        name,
        weaver: data.weaver,
        description: data.description,
        created_at: now,
    })
}
