pub mod auth;
pub mod config;
pub mod error;
pub mod observability;
pub mod pagination;
pub mod password;
pub mod queries;
pub mod routes;

pub use routes::AppState;

/// Create the app router for testing.
///
/// Builds the full Axum router against the given pool without binding a
/// listener, so integration tests can drive it with `tower::ServiceExt`.
pub fn create_app(pool: sqlx::SqlitePool, jwt_secret: &str) -> axum::Router {
    let mut config = config::Config::test_defaults();
    config.jwt.secret = jwt_secret.to_owned();

    routes::router(AppState { pool, config })
}
