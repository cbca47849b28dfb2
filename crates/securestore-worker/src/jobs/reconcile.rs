//! Pending-file reconciliation task.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use securestore_core::result::AppResult;
use securestore_service::FileService;

use crate::task::PeriodicTask;

/// Promotes or purges `pending` records against the blob store (default every
/// 15 minutes).
#[derive(Debug)]
pub struct ReconcileTask {
    files: Arc<FileService>,
    interval: Duration,
}

impl ReconcileTask {
    /// Create a new reconciliation task
    pub fn new(files: Arc<FileService>, interval: Duration) -> Self {
        Self { files, interval }
    }
}

#[async_trait]
impl PeriodicTask for ReconcileTask {
    fn name(&self) -> &str {
        "reconcile_pending_files"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn run(&self) -> AppResult<Value> {
        let report = self.files.reconcile_pending_files().await?;
        Ok(serde_json::to_value(report)?)
    }
}
