use sqlx::SqlitePool;

pub async fn add(pool: &SqlitePool, user_id: i64, recipe_id: i64) -> sqlx::Result<()> {
    sqlx::query("INSERT INTO favorites (user_id, recipe_id) VALUES (?1, ?2)")
        .bind(user_id)
        .bind(recipe_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn exists(pool: &SqlitePool, user_id: i64, recipe_id: i64) -> sqlx::Result<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM favorites WHERE user_id = ?1 AND recipe_id = ?2")
            .bind(user_id)
            .bind(recipe_id)
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}

/// Returns the number of rows removed (0 when nothing was favorited).
pub async fn remove(pool: &SqlitePool, user_id: i64, recipe_id: i64) -> sqlx::Result<u64> {
    let result =
        sqlx::query("DELETE FROM favorites WHERE user_id = ?1 AND recipe_id = ?2")
            .bind(user_id)
            .bind(recipe_id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected())
}
