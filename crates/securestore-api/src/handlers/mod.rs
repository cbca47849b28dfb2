//! HTTP request handlers.

pub mod auth;
pub mod file;
pub mod health;
pub mod share;

use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::Response;

use securestore_core::error::AppError;
use securestore_entity::file::File;

/// Builds an attachment response carrying decrypted bytes.
pub(crate) fn attachment_response(file: &File, data: bytes::Bytes) -> Result<Response, AppError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", attachment_name(&file.file_path)),
        )
        .header(header::CONTENT_LENGTH, data.len())
        .body(Body::from(data))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))
}

/// Last path segment, with characters that would break the header quoted out.
fn attachment_name(file_path: &str) -> String {
    file_path
        .rsplit('/')
        .next()
        .unwrap_or(file_path)
        .chars()
        .filter(|c| *c != '"' && *c != '\\' && !c.is_control())
        .collect()
}
