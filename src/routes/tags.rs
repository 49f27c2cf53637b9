use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::{ApiError, ApiResult};
use crate::queries::tags;
use crate::routes::AppState;

/// GET /tags/ - the whole lookup table, no pagination.
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<tags::TagRow>>> {
    Ok(Json(tags::list(&state.pool).await?))
}

/// GET /tags/{id}/
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<tags::TagRow>> {
    let tag = tags::find(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("Tag"))?;
    Ok(Json(tag))
}
