//! User Account Repository

use super::RepoResult;
use shared::models::UserAccount;
use sqlx::SqlitePool;

const USER_SELECT: &str =
    "SELECT id, username, password_hash, role, is_active, created_at FROM user_account";

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<UserAccount>> {
    let user = sqlx::query_as::<_, UserAccount>(&format!("{USER_SELECT} WHERE username = ?"))
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<UserAccount>> {
    let user = sqlx::query_as::<_, UserAccount>(&format!("{USER_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user_account")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn create(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
    role: &str,
) -> RepoResult<UserAccount> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO user_account (id, username, password_hash, role, is_active, created_at) VALUES (?1, ?2, ?3, ?4, 1, ?5)",
    )
    .bind(id)
    .bind(username)
    .bind(password_hash)
    .bind(role)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(UserAccount {
        id,
        username: username.to_string(),
        password_hash: password_hash.to_string(),
        role: role.to_string(),
        is_active: true,
        created_at: now,
    })
}
