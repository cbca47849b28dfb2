//! Periodic task trait.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use securestore_core::result::AppResult;

/// Work executed by the [`TaskScheduler`](crate::TaskScheduler) on a fixed
/// interval.
#[async_trait]
pub trait PeriodicTask: Send + Sync + std::fmt::Debug + 'static {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Time between runs. The first run happens one interval after start.
    fn interval(&self) -> Duration;

    /// Run once and return a JSON summary.
    ///
    /// An error is logged and the task is retried at its next tick.
    async fn run(&self) -> AppResult<Value>;
}
