//! Share link handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use securestore_core::error::AppError;
use securestore_entity::file::{DownloadContent, File};

use crate::dto::request::{CreateShareRequest, ShareValidateRequest};
use crate::dto::response::{ApiResponse, DownloadUrlResponse, ShareLinkResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::handlers::attachment_response;
use crate::state::AppState;

/// POST /api/shares
pub async fn create_share(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateShareRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ShareLinkResponse>>), ApiError> {
    let ttl = chrono::Duration::try_hours(req.expiry_hours)
        .ok_or_else(|| AppError::validation("expiry_hours is out of range"))?;

    let link = state
        .share_service
        .create_share_link(&auth, req.file_id, ttl, req.password.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(ShareLinkResponse::from(link))),
    ))
}

/// GET /api/files/{id}/shares
pub async fn list_shares(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(file_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ShareLinkResponse>>>, ApiError> {
    let links = state.share_service.list_links(&auth, file_id).await?;
    Ok(Json(ApiResponse::ok(
        links.into_iter().map(ShareLinkResponse::from).collect(),
    )))
}

/// DELETE /api/shares/{id}
pub async fn delete_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.share_service.delete_link(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/shares/{token}
///
/// Public, no password. Protected links answer `401 PASSWORD_REQUIRED`.
pub async fn access_share(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Response, ApiError> {
    let (file, content) = state.access_service.access_share_link(&token).await?;
    shared_content_response(&file, content)
}

/// POST /api/shares/{token}/validate
pub async fn validate_share(
    State(state): State<AppState>,
    Path(token): Path<String>,
    ValidatedJson(req): ValidatedJson<ShareValidateRequest>,
) -> Result<Response, ApiError> {
    let (file, content) = state
        .access_service
        .validate_and_download(&token, req.password.as_deref())
        .await?;
    shared_content_response(&file, content)
}

fn shared_content_response(file: &File, content: DownloadContent) -> Result<Response, ApiError> {
    match content {
        DownloadContent::Bytes(data) => Ok(attachment_response(file, data)?),
        DownloadContent::RedirectUrl(download_url) => {
            Ok(Json(ApiResponse::ok(DownloadUrlResponse { download_url })).into_response())
        }
    }
}
