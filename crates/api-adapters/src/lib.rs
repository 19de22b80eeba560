//! # api-adapters
//!
//! The web routing and orchestration layer for the campus-admin backend.

pub mod dto;

#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod middleware;
#[cfg(feature = "web-axum")]
pub mod state;

#[cfg(feature = "web-axum")]
use axum::routing::{delete, get, post, put};
#[cfg(feature = "web-axum")]
use axum::Router;
#[cfg(feature = "web-axum")]
use state::AppState;

/// Builds the REST router over the shared state.
///
/// Mounted at the root; the binary may nest it under a prefix (e.g.
/// `/api`) if needed.
#[cfg(feature = "web-axum")]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/colleges",
            get(handlers::list_colleges).post(handlers::create_college),
        )
        .route(
            "/colleges/{id}",
            put(handlers::update_college).delete(handlers::delete_college),
        )
        .route(
            "/colleges/{id}/programmes",
            get(handlers::list_programmes).post(handlers::create_programme),
        )
        .route(
            "/colleges/{id}/programmes/{programme_id}",
            put(handlers::update_programme).delete(handlers::delete_programme),
        )
        .route(
            "/announcements",
            get(handlers::list_announcements).post(handlers::create_announcement),
        )
        .route(
            "/announcements/{id}",
            put(handlers::update_announcement).delete(handlers::delete_announcement),
        )
        .route("/users", get(handlers::list_users).post(handlers::create_user))
        .route("/users/{id}", delete(handlers::delete_user))
        .route("/upload", post(handlers::upload_images))
        .layer(middleware::trace_layer())
        .layer(middleware::cors_policy())
        .with_state(state)
}
