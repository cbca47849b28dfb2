//! Built-in periodic sweeps.

pub mod cleanup;
pub mod reconcile;
pub mod shares;

use std::sync::Arc;

use securestore_core::config::WorkerConfig;
use securestore_service::{FileService, ShareService};

use crate::scheduler::TaskScheduler;

pub use cleanup::FileCleanupTask;
pub use reconcile::ReconcileTask;
pub use shares::ShareSweepTask;

/// Register the three built-in sweeps with their configured intervals.
pub fn register_default_tasks(
    scheduler: &mut TaskScheduler,
    files: Arc<FileService>,
    shares: Arc<ShareService>,
    config: &WorkerConfig,
) {
    scheduler.register(Arc::new(FileCleanupTask::new(
        Arc::clone(&files),
        config.cleanup_interval(),
    )));
    scheduler.register(Arc::new(ReconcileTask::new(
        files,
        config.reconcile_interval(),
    )));
    scheduler.register(Arc::new(ShareSweepTask::new(
        shares,
        config.share_sweep_interval(),
    )));
}
