use std::sync::LazyLock;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::auth::{identify, CurrentUser};
use crate::error::{ApiError, ApiResult};
use crate::pagination::{Page, PageQuery};
use crate::password::{hash_password, verify_password};
use crate::queries::{subscriptions, users};
use crate::routes::AppState;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid username regex"));

/// Public user payload; `is_subscribed` is relative to the requester.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

pub(super) async fn user_response(
    pool: &SqlitePool,
    user: &users::UserRow,
    viewer: Option<i64>,
) -> ApiResult<UserResponse> {
    let is_subscribed = match viewer {
        Some(viewer_id) => subscriptions::exists(pool, viewer_id, user.id).await?,
        None => false,
    };

    Ok(UserResponse {
        id: user.id,
        email: user.email.clone(),
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        is_subscribed,
    })
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(email(message = "enter a valid email address"))]
    pub email: String,
    #[validate(
        length(min = 1, max = 150, message = "must be 1-150 characters"),
        regex(path = *USERNAME_RE, message = "may contain only letters, digits and @/./+/-/_")
    )]
    pub username: String,
    #[validate(length(min = 1, max = 150, message = "must be 1-150 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 150, message = "must be 1-150 characters"))]
    pub last_name: String,
    #[validate(length(min = 8, max = 128, message = "must be 8-128 characters"))]
    pub password: String,
}

/// POST /users/ - register a new user.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    input.validate()?;

    if users::email_taken(&state.pool, &input.email).await? {
        return Err(ApiError::BadRequest(
            "A user with that email already exists.".to_string(),
        ));
    }
    if users::username_taken(&state.pool, &input.username).await? {
        return Err(ApiError::BadRequest(
            "A user with that username already exists.".to_string(),
        ));
    }

    let password_hash = hash_password(&input.password)?;
    let user_id = users::create(
        &state.pool,
        &input.email,
        &input.username,
        &input.first_name,
        &input.last_name,
        &password_hash,
    )
    .await?;

    tracing::info!(user_id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            id: user_id,
            email: input.email,
            username: input.username,
            first_name: input.first_name,
            last_name: input.last_name,
            is_subscribed: false,
        }),
    ))
}

/// GET /users/ - paginated user listing.
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(page_query): Query<PageQuery>,
) -> ApiResult<Json<Page<UserResponse>>> {
    let viewer = identify(&headers, &state).await;

    let count = users::count(&state.pool).await?;
    let rows = users::list(
        &state.pool,
        i64::from(page_query.limit()),
        page_query.offset(),
    )
    .await?;

    let mut results = Vec::with_capacity(rows.len());
    for row in &rows {
        results.push(user_response(&state.pool, row, viewer).await?);
    }

    Ok(Json(Page::new("/users/", &page_query, count, results)))
}

/// GET /users/{id}/
pub async fn detail(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserResponse>> {
    let viewer = identify(&headers, &state).await;
    let user = users::find_by_id(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(user_response(&state.pool, &user, viewer).await?))
}

/// GET /users/me/
pub async fn me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<UserResponse>> {
    let user = users::find_by_id(&state.pool, current.user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(
        user_response(&state.pool, &user, Some(current.user_id)).await?,
    ))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SetPasswordInput {
    #[validate(length(min = 8, max = 128, message = "must be 8-128 characters"))]
    pub new_password: String,
    pub current_password: String,
}

/// POST /users/set_password/
pub async fn set_password(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(input): Json<SetPasswordInput>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    input.validate()?;

    let user = users::find_by_id(&state.pool, current.user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    if !verify_password(&input.current_password, &user.password_hash)? {
        return Err(ApiError::BadRequest(
            "Wrong current password.".to_string(),
        ));
    }

    let password_hash = hash_password(&input.new_password)?;
    users::update_password(&state.pool, user.id, &password_hash).await?;

    tracing::info!(user_id = user.id, "Password changed");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Password changed." })),
    ))
}
