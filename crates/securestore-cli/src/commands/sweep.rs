//! One-shot background sweeps.

use clap::{Args, ValueEnum};

use securestore_api::{Backends, build_state, close_pool};
use securestore_core::error::AppError;

use crate::output;

/// Arguments for the sweep command
#[derive(Debug, Args)]
pub struct SweepArgs {
    /// Which sweep to run
    #[arg(value_enum)]
    pub task: SweepTask,
}

/// The available sweeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SweepTask {
    /// Purge stale pending records whose blob never arrived
    Cleanup,
    /// Promote pending records whose blob exists
    Reconcile,
    /// Delete expired share links
    Shares,
}

/// Execute a sweep and print its report
pub async fn execute(args: &SweepArgs, env: &str) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let backends = Backends::connect(&config).await?;
    let pool = backends.pool.clone();
    let state = build_state(config, backends)?;

    tracing::info!(task = ?args.task, "Running sweep");
    let report = match args.task {
        SweepTask::Cleanup => state.file_service.cleanup_deleted_files().await,
        SweepTask::Reconcile => state.file_service.reconcile_pending_files().await,
        SweepTask::Shares => state.share_service.cleanup_expired_shares().await,
    };
    close_pool(pool).await;

    output::print_json(&report?)
}
