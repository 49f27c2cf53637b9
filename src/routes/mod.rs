use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;

use crate::auth::auth_middleware;
use crate::config::Config;

mod auth;
mod health;
mod ingredients;
mod recipes;
mod shopping_cart;
mod subscriptions;
mod tags;
mod users;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
}

/// Build the full application router.
///
/// Routes where every method needs authentication sit behind the auth
/// middleware; mixed paths (public reads, authenticated writes) resolve the
/// requester inside the handler instead.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/auth/token/logout/", post(auth::logout))
        .route("/users/me/", get(users::me))
        .route("/users/set_password/", post(users::set_password))
        .route("/users/subscriptions/", get(subscriptions::list))
        .route(
            "/users/{id}/subscribe/",
            post(subscriptions::subscribe).delete(subscriptions::unsubscribe),
        )
        .route(
            "/recipes/download_shopping_cart/",
            get(shopping_cart::download),
        )
        .route(
            "/recipes/{id}/favorite/",
            post(recipes::favorite).delete(recipes::unfavorite),
        )
        .route(
            "/recipes/{id}/shopping_cart/",
            post(shopping_cart::add).delete(shopping_cart::remove),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        // Health check endpoints (no auth required)
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(state.pool.clone())
        .merge(
            Router::new()
                .route("/auth/token/login/", post(auth::login))
                .route("/users/", get(users::list).post(users::register))
                .route("/users/{id}/", get(users::detail))
                .route("/tags/", get(tags::list))
                .route("/tags/{id}/", get(tags::detail))
                .route("/ingredients/", get(ingredients::list))
                .route("/ingredients/{id}/", get(ingredients::detail))
                .route("/recipes/", get(recipes::list).post(recipes::create))
                .route(
                    "/recipes/{id}/",
                    get(recipes::detail)
                        .patch(recipes::update)
                        .delete(recipes::delete),
                )
                .merge(protected)
                .with_state(state),
        )
}
