//! Schema migrations for the SecureStore record store.
//!
//! The scripts under `migrations/` create the `users`, `files` and
//! `share_links` tables together with the `file_status` enum. They are
//! embedded at compile time, so the server and the CLI always carry the
//! schema they were built against.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use securestore_core::error::{AppError, ErrorKind};

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply every embedded migration not yet recorded in `_sqlx_migrations`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!(
        known = MIGRATOR.iter().count(),
        "Applying SecureStore schema migrations"
    );

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Schema migration failed: {e}"),
            e,
        )
    })?;

    info!("SecureStore schema is up to date");
    Ok(())
}
