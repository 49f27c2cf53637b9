use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::pagination::{Page, PageQuery};
use crate::queries::recipes::ShortRecipeRow;
use crate::queries::{recipes, subscriptions, users};
use crate::routes::AppState;

/// Subscribed-author payload: the profile plus a (possibly trimmed) list
/// of their recipes. `is_subscribed` is always true here by construction.
#[derive(Debug, Serialize)]
pub struct AuthorResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub recipes: Vec<ShortRecipeRow>,
    pub recipes_count: i64,
}

async fn author_response(
    pool: &SqlitePool,
    author: &users::UserRow,
    recipes_limit: Option<i64>,
) -> ApiResult<AuthorResponse> {
    let recipes_list = recipes::by_author(pool, author.id, recipes_limit).await?;
    let recipes_count = recipes::count_by_author(pool, author.id).await?;

    Ok(AuthorResponse {
        id: author.id,
        email: author.email.clone(),
        username: author.username.clone(),
        first_name: author.first_name.clone(),
        last_name: author.last_name.clone(),
        is_subscribed: true,
        recipes: recipes_list,
        recipes_count,
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub recipes_limit: Option<i64>,
}

/// POST /users/{id}/subscribe/
pub async fn subscribe(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(author_id): Path<i64>,
    Query(query): Query<SubscriptionQuery>,
) -> ApiResult<(StatusCode, Json<AuthorResponse>)> {
    let author = users::find_by_id(&state.pool, author_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    if author.id == current.user_id {
        return Err(ApiError::BadRequest(
            "You cannot subscribe to yourself.".to_string(),
        ));
    }
    if subscriptions::exists(&state.pool, current.user_id, author.id).await? {
        return Err(ApiError::BadRequest(
            "Subscription already exists.".to_string(),
        ));
    }

    subscriptions::subscribe(&state.pool, current.user_id, author.id).await?;
    tracing::info!(
        user_id = current.user_id,
        author_id = author.id,
        "Subscribed"
    );

    Ok((
        StatusCode::CREATED,
        Json(author_response(&state.pool, &author, query.recipes_limit).await?),
    ))
}

/// DELETE /users/{id}/subscribe/
pub async fn unsubscribe(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(author_id): Path<i64>,
) -> ApiResult<StatusCode> {
    let removed = subscriptions::unsubscribe(&state.pool, current.user_id, author_id).await?;
    if removed == 0 {
        return Err(ApiError::BadRequest(
            "Subscription does not exist.".to_string(),
        ));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /users/subscriptions/ - paginated list of subscribed authors with
/// their recipes.
pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<SubscriptionQuery>,
) -> ApiResult<Json<Page<AuthorResponse>>> {
    let page_query = PageQuery {
        page: query.page,
        limit: query.limit,
    };

    let count = subscriptions::count(&state.pool, current.user_id).await?;
    let authors = subscriptions::authors(
        &state.pool,
        current.user_id,
        i64::from(page_query.limit()),
        page_query.offset(),
    )
    .await?;

    let mut results = Vec::with_capacity(authors.len());
    for author in &authors {
        results.push(author_response(&state.pool, author, query.recipes_limit).await?);
    }

    Ok(Json(Page::new(
        "/users/subscriptions/",
        &page_query,
        count,
        results,
    )))
}
