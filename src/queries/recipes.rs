use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::tags::TagRow;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecipeRow {
    pub id: i64,
    pub author_id: i64,
    pub name: String,
    pub text: String,
    pub cooking_time: i64,
}

/// Trimmed recipe shape used by favorites and subscription payloads.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct ShortRecipeRow {
    pub id: i64,
    pub name: String,
    pub cooking_time: i64,
}

/// One ingredient line of a recipe joined with its lookup-table entry.
/// `id` is the ingredient id, `amount` the recipe-specific quantity.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct RecipeLineRow {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// Validated input for creating or replacing a recipe.
/// `ingredients` holds (ingredient_id, amount) pairs.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub name: String,
    pub text: String,
    pub cooking_time: i64,
    pub ingredients: Vec<(i64, i64)>,
    pub tags: Vec<i64>,
}

/// Listing filters. The viewer-relative ones only apply for an
/// authenticated requester; the handlers pass `None` otherwise.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    pub author: Option<i64>,
    pub tag_slugs: Vec<String>,
    pub favorited_by: Option<i64>,
    pub in_cart_of: Option<i64>,
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, filter: &RecipeFilter) {
    builder.push(" WHERE 1 = 1");
    if let Some(author) = filter.author {
        builder.push(" AND r.author_id = ").push_bind(author);
    }
    if !filter.tag_slugs.is_empty() {
        builder.push(
            " AND r.id IN (SELECT rt.recipe_id FROM recipe_tags rt \
             JOIN tags t ON t.id = rt.tag_id WHERE t.slug IN (",
        );
        {
            let mut separated = builder.separated(", ");
            for slug in &filter.tag_slugs {
                separated.push_bind(slug.clone());
            }
        }
        builder.push("))");
    }
    if let Some(user_id) = filter.favorited_by {
        builder
            .push(" AND r.id IN (SELECT recipe_id FROM favorites WHERE user_id = ")
            .push_bind(user_id)
            .push(")");
    }
    if let Some(user_id) = filter.in_cart_of {
        builder
            .push(" AND r.id IN (SELECT recipe_id FROM shopping_cart WHERE user_id = ")
            .push_bind(user_id)
            .push(")");
    }
}

/// Recipes newest first, filtered and paginated.
pub async fn list(
    pool: &SqlitePool,
    filter: &RecipeFilter,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<RecipeRow>> {
    let mut builder = QueryBuilder::new(
        "SELECT r.id, r.author_id, r.name, r.text, r.cooking_time FROM recipes r",
    );
    push_filters(&mut builder, filter);
    builder
        .push(" ORDER BY r.pub_date DESC, r.id DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    builder.build_query_as::<RecipeRow>().fetch_all(pool).await
}

pub async fn count(pool: &SqlitePool, filter: &RecipeFilter) -> sqlx::Result<i64> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM recipes r");
    push_filters(&mut builder, filter);

    builder.build_query_scalar::<i64>().fetch_one(pool).await
}

pub async fn find(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<RecipeRow>> {
    sqlx::query_as(
        "SELECT id, author_id, name, text, cooking_time FROM recipes WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Ingredient lines in stored line order.
pub async fn lines(pool: &SqlitePool, recipe_id: i64) -> sqlx::Result<Vec<RecipeLineRow>> {
    sqlx::query_as(
        "SELECT i.id, i.name, i.measurement_unit, ri.amount
         FROM recipe_ingredients ri
         JOIN ingredients i ON i.id = ri.ingredient_id
         WHERE ri.recipe_id = ?1
         ORDER BY ri.id",
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await
}

pub async fn tags(pool: &SqlitePool, recipe_id: i64) -> sqlx::Result<Vec<TagRow>> {
    sqlx::query_as(
        "SELECT t.id, t.name, t.color, t.slug
         FROM recipe_tags rt
         JOIN tags t ON t.id = rt.tag_id
         WHERE rt.recipe_id = ?1
         ORDER BY rt.id",
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await
}

pub async fn create(pool: &SqlitePool, author_id: i64, recipe: &NewRecipe) -> sqlx::Result<i64> {
    let mut tx = pool.begin().await?;

    let recipe_id: i64 = sqlx::query_scalar(
        "INSERT INTO recipes (author_id, name, text, cooking_time, pub_date)
         VALUES (?1, ?2, ?3, ?4, ?5)
         RETURNING id",
    )
    .bind(author_id)
    .bind(&recipe.name)
    .bind(&recipe.text)
    .bind(recipe.cooking_time)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    insert_lines_and_tags(&mut tx, recipe_id, recipe).await?;

    tx.commit().await?;
    Ok(recipe_id)
}

/// Wholesale replacement: scalar fields updated, ingredient lines and tag
/// links dropped and reinserted, all in one transaction.
pub async fn update(pool: &SqlitePool, recipe_id: i64, recipe: &NewRecipe) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE recipes SET name = ?1, text = ?2, cooking_time = ?3 WHERE id = ?4")
        .bind(&recipe.name)
        .bind(&recipe.text)
        .bind(recipe.cooking_time)
        .bind(recipe_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = ?1")
        .bind(recipe_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = ?1")
        .bind(recipe_id)
        .execute(&mut *tx)
        .await?;

    insert_lines_and_tags(&mut tx, recipe_id, recipe).await?;

    tx.commit().await?;
    Ok(())
}

async fn insert_lines_and_tags(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    recipe_id: i64,
    recipe: &NewRecipe,
) -> sqlx::Result<()> {
    for (ingredient_id, amount) in &recipe.ingredients {
        sqlx::query(
            "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) VALUES (?1, ?2, ?3)",
        )
        .bind(recipe_id)
        .bind(ingredient_id)
        .bind(amount)
        .execute(&mut **tx)
        .await?;
    }
    for tag_id in &recipe.tags {
        sqlx::query("INSERT INTO recipe_tags (recipe_id, tag_id) VALUES (?1, ?2)")
            .bind(recipe_id)
            .bind(tag_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

pub async fn delete(pool: &SqlitePool, recipe_id: i64) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM recipes WHERE id = ?1")
        .bind(recipe_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// An author's recipes, newest first, optionally trimmed (`recipes_limit`).
pub async fn by_author(
    pool: &SqlitePool,
    author_id: i64,
    limit: Option<i64>,
) -> sqlx::Result<Vec<ShortRecipeRow>> {
    // SQLite treats LIMIT -1 as "no limit".
    sqlx::query_as(
        "SELECT id, name, cooking_time FROM recipes
         WHERE author_id = ?1
         ORDER BY pub_date DESC, id DESC
         LIMIT ?2",
    )
    .bind(author_id)
    .bind(limit.unwrap_or(-1))
    .fetch_all(pool)
    .await
}

pub async fn count_by_author(pool: &SqlitePool, author_id: i64) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM recipes WHERE author_id = ?1")
        .bind(author_id)
        .fetch_one(pool)
        .await
}
