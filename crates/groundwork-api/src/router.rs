//! Route definitions for the Groundwork HTTP API.
//!
//! All routes are mounted under `/api`.

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(issue_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state.config.server);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Auth endpoints: login, logout, refresh, me, password reset
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/me", get(handlers::auth::me))
        .route(
            "/auth/password-reset",
            post(handlers::auth::request_password_reset),
        )
        .route(
            "/auth/password-reset/{token}",
            put(handlers::auth::confirm_password_reset),
        )
}

fn issue_routes() -> Router<AppState> {
    Router::new().route(
        "/projects/{id}/issues",
        post(handlers::issue::create_issue),
    )
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
