use chrono::Utc;
use sqlx::SqlitePool;

use super::users::UserRow;

pub async fn subscribe(pool: &SqlitePool, user_id: i64, author_id: i64) -> sqlx::Result<()> {
    sqlx::query("INSERT INTO subscriptions (user_id, author_id, created) VALUES (?1, ?2, ?3)")
        .bind(user_id)
        .bind(author_id)
        .bind(Utc::now())
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn exists(pool: &SqlitePool, user_id: i64, author_id: i64) -> sqlx::Result<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM subscriptions WHERE user_id = ?1 AND author_id = ?2",
    )
    .bind(user_id)
    .bind(author_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// Returns the number of rows removed (0 when there was no subscription).
pub async fn unsubscribe(pool: &SqlitePool, user_id: i64, author_id: i64) -> sqlx::Result<u64> {
    let result =
        sqlx::query("DELETE FROM subscriptions WHERE user_id = ?1 AND author_id = ?2")
            .bind(user_id)
            .bind(author_id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected())
}

/// Authors the user follows, newest subscription first.
pub async fn authors(
    pool: &SqlitePool,
    user_id: i64,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<UserRow>> {
    sqlx::query_as(
        "SELECT u.id, u.email, u.username, u.first_name, u.last_name, u.password_hash
         FROM subscriptions s
         JOIN users u ON u.id = s.author_id
         WHERE s.user_id = ?1
         ORDER BY s.id DESC
         LIMIT ?2 OFFSET ?3",
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count(pool: &SqlitePool, user_id: i64) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE user_id = ?1")
        .bind(user_id)
        .fetch_one(pool)
        .await
}
