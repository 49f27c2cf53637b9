use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::queries::ingredients;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct IngredientSearch {
    pub name: Option<String>,
}

/// GET /ingredients/ - lookup table with optional `?name=` prefix search.
pub async fn list(
    State(state): State<AppState>,
    Query(search): Query<IngredientSearch>,
) -> ApiResult<Json<Vec<ingredients::IngredientRow>>> {
    let rows = ingredients::list(&state.pool, search.name.as_deref()).await?;
    Ok(Json(rows))
}

/// GET /ingredients/{id}/
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ingredients::IngredientRow>> {
    let ingredient = ingredients::find(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("Ingredient"))?;
    Ok(Json(ingredient))
}
