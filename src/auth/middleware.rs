//! Authentication middleware and header helpers for Axum

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use super::jwt::validate_token;
use crate::error::{ApiError, ApiResult};
use crate::routes::AppState;

/// Authenticated user extracted from the Authorization header.
/// Inserted into request extensions by [`auth_middleware`].
#[derive(Clone, Copy, Debug)]
pub struct CurrentUser {
    pub user_id: i64,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Token ")
        .or_else(|| value.strip_prefix("Bearer "))
}

/// Resolve the Authorization header to an existing user id.
///
/// Rejects with `Unauthorized` when the header is missing, the token does
/// not validate, or the user it names no longer exists.
pub async fn require_user(headers: &HeaderMap, state: &AppState) -> ApiResult<i64> {
    let token = bearer_token(headers).ok_or(ApiError::Unauthorized)?;

    let user_id = validate_token(token, &state.config.jwt.secret).map_err(|e| {
        tracing::debug!("Rejected auth token: {}", e);
        ApiError::Unauthorized
    })?;

    let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE id = ?1")
        .bind(user_id)
        .fetch_one(&state.pool)
        .await?;

    if exists == 0 {
        tracing::warn!(user_id, "Token for deleted user");
        return Err(ApiError::Unauthorized);
    }

    Ok(user_id)
}

/// Best-effort identification for endpoints that anonymous users may also
/// call (recipe/user listings with viewer-relative flags).
pub async fn identify(headers: &HeaderMap, state: &AppState) -> Option<i64> {
    require_user(headers, state).await.ok()
}

/// Middleware guarding routes where every method requires authentication.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = require_user(req.headers(), &state).await?;
    req.extensions_mut().insert(CurrentUser { user_id });
    Ok(next.run(req).await)
}
