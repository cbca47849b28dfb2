//! Background sweep configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Periodic task configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the scheduler is started with the server.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Interval between stale-record cleanup sweeps.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,
    /// Interval between pending-file reconciliation sweeps.
    #[serde(default = "default_reconcile_interval")]
    pub reconcile_interval_seconds: u64,
    /// Interval between expired share-link sweeps.
    #[serde(default = "default_share_sweep_interval")]
    pub share_sweep_interval_seconds: u64,
    /// Age after which a `pending` record with no blob is considered abandoned.
    #[serde(default = "default_stale_pending")]
    pub stale_pending_seconds: u64,
    /// Whether the cleanup sweep also checks the blob of every `uploaded`
    /// record and drops records whose blob has vanished.
    #[serde(default)]
    pub verify_uploaded_blobs: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cleanup_interval_seconds: default_cleanup_interval(),
            reconcile_interval_seconds: default_reconcile_interval(),
            share_sweep_interval_seconds: default_share_sweep_interval(),
            stale_pending_seconds: default_stale_pending(),
            verify_uploaded_blobs: false,
        }
    }
}

impl WorkerConfig {
    /// Cleanup interval as a [`Duration`].
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_seconds)
    }

    /// Reconcile interval as a [`Duration`].
    pub fn reconcile_interval(&self) -> Duration {
        Duration::from_secs(self.reconcile_interval_seconds)
    }

    /// Share sweep interval as a [`Duration`].
    pub fn share_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.share_sweep_interval_seconds)
    }

    /// Staleness threshold as a [`Duration`].
    pub fn stale_pending(&self) -> Duration {
        Duration::from_secs(self.stale_pending_seconds)
    }
}

fn default_true() -> bool {
    true
}

fn default_cleanup_interval() -> u64 {
    10 * 60
}

fn default_reconcile_interval() -> u64 {
    15 * 60
}

fn default_share_sweep_interval() -> u64 {
    30 * 60
}

fn default_stale_pending() -> u64 {
    60 * 60
}
