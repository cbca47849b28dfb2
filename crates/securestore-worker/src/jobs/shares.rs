//! Expired share-link sweep.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use securestore_core::result::AppResult;
use securestore_service::ShareService;

use crate::task::PeriodicTask;

/// Deletes share links past their expiry (default every 30 minutes).
#[derive(Debug)]
pub struct ShareSweepTask {
    shares: Arc<ShareService>,
    interval: Duration,
}

impl ShareSweepTask {
    /// Create a new share sweep task
    pub fn new(shares: Arc<ShareService>, interval: Duration) -> Self {
        Self { shares, interval }
    }
}

#[async_trait]
impl PeriodicTask for ShareSweepTask {
    fn name(&self) -> &str {
        "cleanup_expired_shares"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn run(&self) -> AppResult<Value> {
        let report = self.shares.cleanup_expired_shares().await?;
        Ok(serde_json::to_value(report)?)
    }
}
