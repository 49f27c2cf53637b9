use std::collections::HashSet;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use axum_extra::extract::Query;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use validator::Validate;

use crate::auth::{identify, require_user, CurrentUser};
use crate::error::{ApiError, ApiResult};
use crate::pagination::{Page, PageQuery};
use crate::queries::recipes::{NewRecipe, RecipeFilter, RecipeRow, ShortRecipeRow};
use crate::queries::{favorites, ingredients, recipes, shopping, tags, users};
use crate::routes::users::{user_response, UserResponse};
use crate::routes::AppState;

const MIN_COOKING_TIME: i64 = 1;
const MIN_INGREDIENT_AMOUNT: i64 = 1;

/// Full recipe payload; the viewer-relative flags default to false for
/// anonymous requests.
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub author: UserResponse,
    pub tags: Vec<crate::queries::tags::TagRow>,
    pub ingredients: Vec<crate::queries::recipes::RecipeLineRow>,
    pub name: String,
    pub text: String,
    pub cooking_time: i64,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

async fn recipe_response(
    pool: &SqlitePool,
    recipe: &RecipeRow,
    viewer: Option<i64>,
) -> ApiResult<RecipeResponse> {
    let author_row = users::find_by_id(pool, recipe.author_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    let author = user_response(pool, &author_row, viewer).await?;

    let tags = recipes::tags(pool, recipe.id).await?;
    let ingredients = recipes::lines(pool, recipe.id).await?;

    let (is_favorited, is_in_shopping_cart) = match viewer {
        Some(viewer_id) => (
            favorites::exists(pool, viewer_id, recipe.id).await?,
            shopping::exists(pool, viewer_id, recipe.id).await?,
        ),
        None => (false, false),
    };

    Ok(RecipeResponse {
        id: recipe.id,
        author,
        tags,
        ingredients,
        name: recipe.name.clone(),
        text: recipe.text.clone(),
        cooking_time: recipe.cooking_time,
        is_favorited,
        is_in_shopping_cart,
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct RecipeListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub author: Option<i64>,
    /// Repeated `?tags=slug` parameters.
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
}

fn flag(value: &Option<String>) -> bool {
    matches!(value.as_deref(), Some("1") | Some("true") | Some("True"))
}

/// GET /recipes/ - newest first, filterable, paginated. The favorited and
/// shopping-cart filters only bite for an authenticated requester.
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RecipeListQuery>,
) -> ApiResult<Json<Page<RecipeResponse>>> {
    let viewer = identify(&headers, &state).await;

    let filter = RecipeFilter {
        author: query.author,
        tag_slugs: query.tags.clone(),
        favorited_by: viewer.filter(|_| flag(&query.is_favorited)),
        in_cart_of: viewer.filter(|_| flag(&query.is_in_shopping_cart)),
    };

    let page_query = PageQuery {
        page: query.page,
        limit: query.limit,
    };

    let count = recipes::count(&state.pool, &filter).await?;
    let rows = recipes::list(
        &state.pool,
        &filter,
        i64::from(page_query.limit()),
        page_query.offset(),
    )
    .await?;

    let mut results = Vec::with_capacity(rows.len());
    for row in &rows {
        results.push(recipe_response(&state.pool, row, viewer).await?);
    }

    Ok(Json(Page::new("/recipes/", &page_query, count, results)))
}

#[derive(Debug, Deserialize)]
pub struct RecipeIngredientInput {
    pub id: i64,
    pub amount: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecipeInput {
    pub ingredients: Vec<RecipeIngredientInput>,
    pub tags: Vec<i64>,
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub text: String,
    pub cooking_time: i64,
}

/// Cross-field validation the derive cannot express: list rules and
/// referential checks against the lookup tables.
async fn validate_recipe_input(pool: &SqlitePool, input: &RecipeInput) -> ApiResult<NewRecipe> {
    input.validate()?;

    let mut errors = Vec::new();

    if input.ingredients.is_empty() {
        errors.push("ingredients: add at least one ingredient".to_string());
    }
    let mut seen_ingredients = HashSet::new();
    for ingredient in &input.ingredients {
        if ingredient.amount < MIN_INGREDIENT_AMOUNT {
            errors.push(format!(
                "ingredients: amount for ingredient {} must be at least {}",
                ingredient.id, MIN_INGREDIENT_AMOUNT
            ));
        }
        if !seen_ingredients.insert(ingredient.id) {
            errors.push(format!(
                "ingredients: ingredient {} is listed more than once",
                ingredient.id
            ));
        } else if !ingredients::exists(pool, ingredient.id).await? {
            errors.push(format!(
                "ingredients: ingredient {} does not exist",
                ingredient.id
            ));
        }
    }

    let mut seen_tags = HashSet::new();
    for tag_id in &input.tags {
        if !seen_tags.insert(*tag_id) {
            errors.push(format!("tags: tag {} is listed more than once", tag_id));
        } else if !tags::exists(pool, *tag_id).await? {
            errors.push(format!("tags: tag {} does not exist", tag_id));
        }
    }

    if input.cooking_time < MIN_COOKING_TIME {
        errors.push(format!(
            "cooking_time: must be at least {} minute",
            MIN_COOKING_TIME
        ));
    }

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    Ok(NewRecipe {
        name: input.name.clone(),
        text: input.text.clone(),
        cooking_time: input.cooking_time,
        ingredients: input
            .ingredients
            .iter()
            .map(|i| (i.id, i.amount))
            .collect(),
        tags: input.tags.clone(),
    })
}

/// POST /recipes/
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<RecipeInput>,
) -> ApiResult<(StatusCode, Json<RecipeResponse>)> {
    let user_id = require_user(&headers, &state).await?;

    let new_recipe = validate_recipe_input(&state.pool, &input).await?;
    let recipe_id = recipes::create(&state.pool, user_id, &new_recipe).await?;

    tracing::info!(user_id, recipe_id, "Recipe created");

    let recipe = recipes::find(&state.pool, recipe_id)
        .await?
        .ok_or(ApiError::NotFound("Recipe"))?;

    Ok((
        StatusCode::CREATED,
        Json(recipe_response(&state.pool, &recipe, Some(user_id)).await?),
    ))
}

/// GET /recipes/{id}/
pub async fn detail(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<Json<RecipeResponse>> {
    let viewer = identify(&headers, &state).await;
    let recipe = recipes::find(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("Recipe"))?;

    Ok(Json(recipe_response(&state.pool, &recipe, viewer).await?))
}

/// PATCH /recipes/{id}/ - author only; tags and ingredient lines are
/// replaced wholesale.
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(input): Json<RecipeInput>,
) -> ApiResult<Json<RecipeResponse>> {
    let user_id = require_user(&headers, &state).await?;

    let recipe = recipes::find(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("Recipe"))?;
    if recipe.author_id != user_id {
        return Err(ApiError::PermissionDenied);
    }

    let new_recipe = validate_recipe_input(&state.pool, &input).await?;
    recipes::update(&state.pool, id, &new_recipe).await?;

    tracing::info!(user_id, recipe_id = id, "Recipe updated");

    let updated = recipes::find(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("Recipe"))?;

    Ok(Json(
        recipe_response(&state.pool, &updated, Some(user_id)).await?,
    ))
}

/// DELETE /recipes/{id}/ - author only.
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let user_id = require_user(&headers, &state).await?;

    let recipe = recipes::find(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("Recipe"))?;
    if recipe.author_id != user_id {
        return Err(ApiError::PermissionDenied);
    }

    recipes::delete(&state.pool, id).await?;
    tracing::info!(user_id, recipe_id = id, "Recipe deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /recipes/{id}/favorite/
pub async fn favorite(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<(StatusCode, Json<ShortRecipeRow>)> {
    let recipe = recipes::find(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("Recipe"))?;

    if favorites::exists(&state.pool, current.user_id, recipe.id).await? {
        return Err(ApiError::BadRequest(
            "Recipe is already in favorites.".to_string(),
        ));
    }
    favorites::add(&state.pool, current.user_id, recipe.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ShortRecipeRow {
            id: recipe.id,
            name: recipe.name,
            cooking_time: recipe.cooking_time,
        }),
    ))
}

/// DELETE /recipes/{id}/favorite/
pub async fn unfavorite(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let removed = favorites::remove(&state.pool, current.user_id, id).await?;
    if removed == 0 {
        return Err(ApiError::BadRequest(
            "Recipe is not in favorites.".to_string(),
        ));
    }
    Ok(StatusCode::NO_CONTENT)
}
