//! Background sweeps that bring file records back in line with the blob store.
//!
//! Per-item failures are logged and counted; they never abort the sweep.
//! Only a failure to list the records fails the sweep as a whole.
//!
//! Purges go through `delete_if_pending` so a sweep can never remove a
//! record that a concurrent finalize has just promoted. A delete racing a
//! finalize on the request path is not serialized; whatever it leaves behind
//! is picked up by the next sweep.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use securestore_core::error::AppError;
use securestore_entity::file::{File, FileStatus};

use super::service::FileService;

/// Outcome of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Sweep name.
    pub task: &'static str,
    /// Records examined.
    pub scanned: u64,
    /// Records moved to `uploaded`.
    pub promoted: u64,
    /// Records removed.
    pub purged: u64,
    /// Records whose repair failed; retried next tick.
    pub failed: u64,
}

impl SweepReport {
    pub(crate) fn new(task: &'static str) -> Self {
        Self {
            task,
            ..Self::default()
        }
    }
}

enum Outcome {
    Promoted,
    Purged,
    Untouched,
}

impl FileService {
    /// Promotes `pending` records whose blob exists and purges stale ones
    /// whose blob does not.
    ///
    /// A record is marked `uploaded` if and only if its blob is present.
    #[tracing::instrument(skip(self))]
    pub async fn reconcile_pending_files(&self) -> Result<SweepReport, AppError> {
        let mut report = SweepReport::new("reconcile_pending_files");
        let pending = self.files.list_by_status(FileStatus::Pending).await?;

        for file in pending {
            report.scanned += 1;
            match self.reconcile_one(&file).await {
                Ok(Outcome::Promoted) => report.promoted += 1,
                Ok(Outcome::Purged) => report.purged += 1,
                Ok(Outcome::Untouched) => {}
                Err(e) => {
                    report.failed += 1;
                    warn!(file_id = %file.id, error = %e, "Failed to reconcile pending file");
                }
            }
        }

        info!(
            scanned = report.scanned,
            promoted = report.promoted,
            purged = report.purged,
            failed = report.failed,
            "Pending file reconciliation finished"
        );
        Ok(report)
    }

    async fn reconcile_one(&self, file: &File) -> Result<Outcome, AppError> {
        if self.storage.exists(&file.storage_key).await? {
            return match self.files.mark_uploaded(file.id, Utc::now()).await? {
                Some(_) => {
                    info!(file_id = %file.id, "Pending file promoted, blob present");
                    Ok(Outcome::Promoted)
                }
                None => Ok(Outcome::Untouched),
            };
        }
        self.purge_if_stale(file).await
    }

    /// Purges abandoned `pending` records.
    ///
    /// A `pending` record past the staleness threshold with no blob is
    /// removed; records with a blob are left for the reconciler. With
    /// `verify_uploaded_blobs` set, `uploaded` records whose blob has
    /// disappeared are removed as well.
    #[tracing::instrument(skip(self))]
    pub async fn cleanup_deleted_files(&self) -> Result<SweepReport, AppError> {
        let mut report = SweepReport::new("cleanup_deleted_files");
        let now = Utc::now();
        let threshold = self.stale_threshold()?;

        let pending = self.files.list_by_status(FileStatus::Pending).await?;
        for file in pending.iter().filter(|f| f.is_stale(now, threshold)) {
            report.scanned += 1;
            match self.purge_if_missing(file).await {
                Ok(Outcome::Purged) => report.purged += 1,
                Ok(_) => {}
                Err(e) => {
                    report.failed += 1;
                    warn!(file_id = %file.id, error = %e, "Failed to clean up pending file");
                }
            }
        }

        if self.settings.verify_uploaded_blobs {
            let uploaded = self.files.list_by_status(FileStatus::Uploaded).await?;
            for file in &uploaded {
                report.scanned += 1;
                match self.drop_if_blob_missing(file).await {
                    Ok(true) => report.purged += 1,
                    Ok(false) => {}
                    Err(e) => {
                        report.failed += 1;
                        warn!(file_id = %file.id, error = %e, "Failed to verify uploaded blob");
                    }
                }
            }
        }

        info!(
            scanned = report.scanned,
            purged = report.purged,
            failed = report.failed,
            "File cleanup finished"
        );
        Ok(report)
    }

    async fn purge_if_missing(&self, file: &File) -> Result<Outcome, AppError> {
        if self.storage.exists(&file.storage_key).await? {
            debug!(file_id = %file.id, "Stale pending file has a blob, leaving it for reconciliation");
            return Ok(Outcome::Untouched);
        }
        self.purge_if_stale(file).await
    }

    async fn purge_if_stale(&self, file: &File) -> Result<Outcome, AppError> {
        if !file.is_stale(Utc::now(), self.stale_threshold()?) {
            return Ok(Outcome::Untouched);
        }
        if self.files.delete_if_pending(file.id).await? {
            info!(
                file_id = %file.id,
                storage_key = %file.storage_key,
                "Abandoned pending file purged"
            );
            Ok(Outcome::Purged)
        } else {
            Ok(Outcome::Untouched)
        }
    }

    async fn drop_if_blob_missing(&self, file: &File) -> Result<bool, AppError> {
        if self.storage.exists(&file.storage_key).await? {
            return Ok(false);
        }
        warn!(
            file_id = %file.id,
            storage_key = %file.storage_key,
            "Uploaded file has no blob, removing record"
        );
        self.files.delete(file.id).await
    }

    fn stale_threshold(&self) -> Result<chrono::Duration, AppError> {
        chrono::Duration::from_std(self.settings.stale_pending)
            .map_err(|_| AppError::configuration("Staleness threshold out of range"))
    }
}
