use sqlx::SqlitePool;
use tastebook_shopping::{CartRecipe, IngredientLine};

pub async fn add(pool: &SqlitePool, user_id: i64, recipe_id: i64) -> sqlx::Result<()> {
    sqlx::query("INSERT INTO shopping_cart (user_id, recipe_id) VALUES (?1, ?2)")
        .bind(user_id)
        .bind(recipe_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn exists(pool: &SqlitePool, user_id: i64, recipe_id: i64) -> sqlx::Result<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM shopping_cart WHERE user_id = ?1 AND recipe_id = ?2",
    )
    .bind(user_id)
    .bind(recipe_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// Returns the number of rows removed (0 when the recipe was not in the cart).
pub async fn remove(pool: &SqlitePool, user_id: i64, recipe_id: i64) -> sqlx::Result<u64> {
    let result =
        sqlx::query("DELETE FROM shopping_cart WHERE user_id = ?1 AND recipe_id = ?2")
            .bind(user_id)
            .bind(recipe_id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected())
}

#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    recipe_id: i64,
    name: String,
    measurement_unit: String,
    amount: i64,
}

/// Cart resolution: every recipe in the user's cart with its ingredient
/// lines, in cart-insertion and stored line order. The snapshot the pool
/// hands back here is what the aggregator works on; an empty cart is an
/// empty vec, not an error.
pub async fn cart_recipes(pool: &SqlitePool, user_id: i64) -> sqlx::Result<Vec<CartRecipe>> {
    let rows: Vec<CartLineRow> = sqlx::query_as(
        "SELECT ri.recipe_id, i.name, i.measurement_unit, ri.amount
         FROM shopping_cart sc
         JOIN recipe_ingredients ri ON ri.recipe_id = sc.recipe_id
         JOIN ingredients i ON i.id = ri.ingredient_id
         WHERE sc.user_id = ?1
         ORDER BY sc.id, ri.id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut recipes: Vec<CartRecipe> = Vec::new();
    let mut current_recipe: Option<i64> = None;
    for row in rows {
        if current_recipe != Some(row.recipe_id) {
            current_recipe = Some(row.recipe_id);
            recipes.push(CartRecipe::default());
        }
        if let Some(recipe) = recipes.last_mut() {
            recipe.lines.push(IngredientLine {
                name: row.name,
                unit: row.measurement_unit,
                quantity: row.amount.max(0) as u64,
            });
        }
    }

    Ok(recipes)
}
