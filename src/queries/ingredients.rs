use serde::Serialize;
use sqlx::SqlitePool;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct IngredientRow {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

/// Lookup-table listing with optional name prefix search (`?name=`).
pub async fn list(pool: &SqlitePool, name_prefix: Option<&str>) -> sqlx::Result<Vec<IngredientRow>> {
    match name_prefix {
        Some(prefix) => {
            // LIKE wildcards in the prefix itself are escaped so user input
            // stays a literal prefix.
            let escaped = prefix.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
            sqlx::query_as(
                "SELECT id, name, measurement_unit FROM ingredients
                 WHERE name LIKE ?1 ESCAPE '\\' ORDER BY name",
            )
            .bind(format!("{escaped}%"))
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as("SELECT id, name, measurement_unit FROM ingredients ORDER BY name")
                .fetch_all(pool)
                .await
        }
    }
}

pub async fn find(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<IngredientRow>> {
    sqlx::query_as("SELECT id, name, measurement_unit FROM ingredients WHERE id = ?1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn exists(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ingredients WHERE id = ?1")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}
