//! Route definitions for the SecureStore HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState` and
//! passes it to handlers through Axum's `State` extractor.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let server = &state.config.server;
    let max_upload = server.max_upload_bytes;
    let timeout = Duration::from_secs(server.request_timeout_seconds);
    let cors = build_cors_layer(&server.cors);

    let api_routes = Router::new()
        .merge(account_routes())
        .merge(file_routes())
        .merge(share_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(RequestBodyLimitLayer::new(max_upload))
        .layer(TimeoutLayer::new(timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Registration and login
fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
}

/// File lifecycle and the share links on a file
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files", get(handlers::file::list_files))
        .route("/files/presigned", post(handlers::file::begin_presigned_upload))
        .route("/files/encrypted", post(handlers::file::upload_encrypted))
        .route("/files/{id}", delete(handlers::file::delete_file))
        .route("/files/{id}/finalize", post(handlers::file::finalize_upload))
        .route("/files/{id}/download", get(handlers::file::download_file))
        .route("/files/{id}/shares", get(handlers::share::list_shares))
}

/// Share links. `{id}` is the link id for DELETE and the public token for
/// the unauthenticated GET and validate routes.
fn share_routes() -> Router<AppState> {
    Router::new()
        .route("/shares", post(handlers::share::create_share))
        .route(
            "/shares/{id}",
            get(handlers::share::access_share).delete(handlers::share::delete_share),
        )
        .route("/shares/{id}/validate", post(handlers::share::validate_share))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
