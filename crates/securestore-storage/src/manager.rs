//! Provider construction from configuration.

use std::sync::Arc;

use tracing::info;

use securestore_core::config::{StorageBackend, StorageConfig};
use securestore_core::result::AppResult;
use securestore_core::traits::storage::StorageProvider;

use crate::providers::MemoryStorageProvider;

/// Build the configured blob store.
pub async fn build_provider(config: &StorageConfig) -> AppResult<Arc<dyn StorageProvider>> {
    let provider: Arc<dyn StorageProvider> = match config.provider {
        StorageBackend::Memory => Arc::new(MemoryStorageProvider::new(&config.bucket)),
        #[cfg(feature = "s3")]
        StorageBackend::S3 => Arc::new(crate::providers::S3StorageProvider::new(config).await?),
        #[cfg(not(feature = "s3"))]
        StorageBackend::S3 => {
            return Err(securestore_core::error::AppError::configuration(
                "storage.provider = \"s3\" requires the `s3` feature",
            ));
        }
    };
    info!(
        provider = provider.provider_type(),
        bucket = %config.bucket,
        "Blob store ready"
    );
    Ok(provider)
}
