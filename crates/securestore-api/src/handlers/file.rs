//! File upload, finalize, download, delete and list handlers.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use uuid::Uuid;

use securestore_core::error::AppError;
use securestore_entity::file::{DownloadContent, File};

use crate::dto::request::PresignedUploadRequest;
use crate::dto::response::{ApiResponse, PresignedUploadResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::handlers::attachment_response;
use crate::state::AppState;

/// GET /api/files
pub async fn list_files(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<File>>>, ApiError> {
    let files = state.file_service.list_files(&auth).await?;
    Ok(Json(ApiResponse::ok(files)))
}

/// POST /api/files/presigned
pub async fn begin_presigned_upload(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<PresignedUploadRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PresignedUploadResponse>>), ApiError> {
    let upload = state
        .file_service
        .begin_presigned_upload(&auth, &req.file_path, req.size_bytes)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(PresignedUploadResponse::from(upload))),
    ))
}

/// POST /api/files/encrypted (multipart: `file_path`, `file`)
pub async fn upload_encrypted(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<File>>), ApiError> {
    let mut file_path: Option<String> = None;
    let mut data: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file_path") => file_path = Some(field.text().await?),
            Some("file") => data = Some(field.bytes().await?),
            _ => {}
        }
    }

    let file_path = file_path.ok_or_else(|| AppError::validation("file_path field is required"))?;
    let data = data.ok_or_else(|| AppError::validation("file field is required"))?;

    let file = state
        .file_service
        .upload_encrypted(&auth, &file_path, data)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(file))))
}

/// POST /api/files/{id}/finalize
pub async fn finalize_upload(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<File>>, ApiError> {
    let file = state.file_service.finalize_upload(&auth, id).await?;
    Ok(Json(ApiResponse::ok(file)))
}

/// GET /api/files/{id}/download
///
/// Encrypted files stream back decrypted; plaintext files redirect to a
/// presigned read URL.
pub async fn download_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let (file, content) = state.file_service.download(&auth, id).await?;

    match content {
        DownloadContent::Bytes(data) => Ok(attachment_response(&file, data)?),
        DownloadContent::RedirectUrl(url) => {
            Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
        }
    }
}

/// DELETE /api/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.file_service.delete_file(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
