use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::json;

use crate::auth::generate_token;
use crate::error::{ApiError, ApiResult};
use crate::password::verify_password;
use crate::queries::users;
use crate::routes::AppState;

const BAD_CREDENTIALS: &str = "Unable to log in with provided credentials.";

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// POST /auth/token/login/ - exchange credentials for an auth token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> ApiResult<Json<serde_json::Value>> {
    let user = users::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| ApiError::BadRequest(BAD_CREDENTIALS.to_string()))?;

    if !verify_password(&input.password, &user.password_hash)? {
        return Err(ApiError::BadRequest(BAD_CREDENTIALS.to_string()));
    }

    let lifetime_seconds = state.config.jwt.expiration_days.max(0) as u64 * 86_400;
    let token = generate_token(user.id, &state.config.jwt.secret, lifetime_seconds)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(json!({ "auth_token": token })))
}

/// POST /auth/token/logout/ - tokens are stateless, nothing to revoke
/// server-side; clients drop the token.
pub async fn logout() -> StatusCode {
    StatusCode::NO_CONTENT
}
