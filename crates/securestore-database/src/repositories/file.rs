//! File repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use securestore_core::error::{AppError, ErrorKind};
use securestore_core::result::AppResult;
use securestore_entity::file::{CreateFile, File, FileStatus};

use super::insert_error;
use crate::store::FileStore;

/// Repository for file metadata rows.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileStore for FileRepository {
    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "INSERT INTO files (id, user_id, file_path, size_bytes, is_encrypted, storage_key, status) \
             VALUES ($1, $2, $3, $4, $5, $6, 'pending') RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(data.user_id)
        .bind(&data.file_path)
        .bind(data.size_bytes)
        .bind(data.is_encrypted)
        .bind(data.storage_key())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| insert_error(e, "A file already exists at this path", "Failed to create file"))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    async fn find_by_owner_and_path(
        &self,
        user_id: Uuid,
        file_path: &str,
    ) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE user_id = $1 AND file_path = $2")
            .bind(user_id)
            .bind(file_path)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find file by path", e)
            })
    }

    async fn list_by_owner(&self, user_id: Uuid) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    async fn list_by_status(&self, status: FileStatus) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE status = $1 ORDER BY created_at ASC")
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list files by status", e)
            })
    }

    async fn mark_uploaded(&self, id: Uuid, uploaded_at: DateTime<Utc>) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET status = 'uploaded', uploaded_at = $2 \
             WHERE id = $1 AND status = 'pending' RETURNING *",
        )
        .bind(id)
        .bind(uploaded_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark file uploaded", e))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_if_pending(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1 AND status = 'pending'")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete pending file", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
