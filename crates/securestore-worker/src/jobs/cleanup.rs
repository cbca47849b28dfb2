//! Stale file cleanup task.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use securestore_core::result::AppResult;
use securestore_service::FileService;

use crate::task::PeriodicTask;

/// Purges abandoned `pending` records (default every 10 minutes).
#[derive(Debug)]
pub struct FileCleanupTask {
    /// File service
    files: Arc<FileService>,
    /// Run interval
    interval: Duration,
}

impl FileCleanupTask {
    /// Create a new cleanup task
    pub fn new(files: Arc<FileService>, interval: Duration) -> Self {
        Self { files, interval }
    }
}

#[async_trait]
impl PeriodicTask for FileCleanupTask {
    fn name(&self) -> &str {
        "cleanup_deleted_files"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn run(&self) -> AppResult<Value> {
        let report = self.files.cleanup_deleted_files().await?;
        Ok(serde_json::to_value(report)?)
    }
}
