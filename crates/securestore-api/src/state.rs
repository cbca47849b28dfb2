//! Application state shared across all handlers and extractors.

use std::sync::Arc;

use securestore_auth::jwt::JwtDecoder;
use securestore_core::config::AppConfig;
use securestore_service::{AccessService, FileService, ShareService, UserService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// File lifecycle service
    pub file_service: Arc<FileService>,
    /// Share link management
    pub share_service: Arc<ShareService>,
    /// Public share access
    pub access_service: Arc<AccessService>,
    /// Accounts and login
    pub user_service: Arc<UserService>,
}
