use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use tastebook_shopping::{aggregate, render_text, ShoppingListError};

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::queries::recipes::ShortRecipeRow;
use crate::queries::{recipes, shopping};
use crate::routes::AppState;

const SHOPPING_LIST_FILENAME: &str = "shopping_list.txt";

/// POST /recipes/{id}/shopping_cart/
pub async fn add(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<(StatusCode, Json<ShortRecipeRow>)> {
    let recipe = recipes::find(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("Recipe"))?;

    if shopping::exists(&state.pool, current.user_id, recipe.id).await? {
        return Err(ApiError::BadRequest(
            "Recipe is already in the shopping cart.".to_string(),
        ));
    }
    shopping::add(&state.pool, current.user_id, recipe.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ShortRecipeRow {
            id: recipe.id,
            name: recipe.name,
            cooking_time: recipe.cooking_time,
        }),
    ))
}

/// DELETE /recipes/{id}/shopping_cart/
pub async fn remove(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let removed = shopping::remove(&state.pool, current.user_id, id).await?;
    if removed == 0 {
        return Err(ApiError::BadRequest(
            "Recipe is not in the shopping cart.".to_string(),
        ));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /recipes/download_shopping_cart/
///
/// Resolve the cart, merge ingredient lines by (name, unit), and serve the
/// rendered list as a plain-text attachment. Built fresh on every request;
/// nothing is cached.
pub async fn download(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Response> {
    let cart = shopping::cart_recipes(&state.pool, current.user_id).await?;
    if cart.is_empty() {
        return Err(ShoppingListError::EmptyCart.into());
    }

    let list = aggregate(&cart)?;
    let body = render_text(&list);

    tracing::info!(
        user_id = current.user_id,
        recipes = cart.len(),
        items = list.len(),
        "Shopping list rendered"
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={SHOPPING_LIST_FILENAME}"),
            ),
        ],
        body,
    )
        .into_response())
}
