use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tastebook_shopping::ShoppingListError;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("{0}")]
    BadRequest(String),

    #[error("Authentication credentials were not provided or are invalid")]
    Unauthorized,

    #[error("You do not have permission to perform this action")]
    PermissionDenied,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    ShoppingList(#[from] ShoppingListError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages = Vec::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                match &error.message {
                    Some(message) => messages.push(format!("{}: {}", field, message)),
                    None => messages.push(format!("{}: invalid value", field)),
                }
            }
        }
        ApiError::Validation(messages)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "errors": errors })),
            )
                .into_response(),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "errors": message })),
            )
                .into_response(),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({
                    "detail": "Authentication credentials were not provided."
                })),
            )
                .into_response(),
            ApiError::PermissionDenied => (
                StatusCode::FORBIDDEN,
                Json(serde_json::json!({
                    "detail": "You do not have permission to perform this action."
                })),
            )
                .into_response(),
            ApiError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "detail": format!("{} not found.", what) })),
            )
                .into_response(),
            // An empty cart is a client mistake, not a server fault: 400
            // with an empty body, matching the existing download contract.
            ApiError::ShoppingList(ShoppingListError::EmptyCart) => {
                StatusCode::BAD_REQUEST.into_response()
            }
            ApiError::ShoppingList(err @ ShoppingListError::AggregationOverflow { .. }) => {
                tracing::error!("Shopping list aggregation failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "detail": "Internal server error." })),
                )
                    .into_response()
            }
            ApiError::Database(err) => {
                tracing::error!("Database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "detail": "Internal server error." })),
                )
                    .into_response()
            }
            ApiError::Internal(message) => {
                tracing::error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "detail": "Internal server error." })),
                )
                    .into_response()
            }
        }
    }
}
