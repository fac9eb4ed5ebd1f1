//! Party Repository

use super::RepoResult;
use shared::models::{Party, PartyCreate};
use sqlx::SqlitePool;

const PARTY_SELECT: &str =
    "SELECT id, name, contact_name, contact_phone, address, created_at FROM party";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Party>> {
    let parties = sqlx::query_as::<_, Party>(&format!("{PARTY_SELECT} ORDER BY name"))
        .fetch_all(pool)
        .await?;
    Ok(parties)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Party>> {
    let party = sqlx::query_as::<_, Party>(&format!("{PARTY_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(party)
}

pub async fn create(pool: &SqlitePool, data: PartyCreate) -> RepoResult<Party> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO party (id, name, contact_name, contact_phone, address, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(&data.contact_name)
    .bind(&data.contact_phone)
    .bind(&data.address)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Party {
        id,
        name: data.name.trim().to_string(),
        contact_name: data.contact_name,
        contact_phone: data.contact_phone,
        address: data.address,
        created_at: now,
    })
}
