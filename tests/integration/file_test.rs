//! Integration tests for the file lifecycle over HTTP.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::{StatusCode, header};
use bytes::Bytes;

use securestore_core::result::AppResult;
use securestore_core::traits::storage::StorageProvider;
use securestore_storage::{FailOn, MemoryStorageProvider};

use crate::helpers::{TestApp, context, parse_id};

#[tokio::test]
async fn test_presigned_upload_finalize_and_redirect() {
    let app = TestApp::new();
    let (token, user_id) = app.create_user("alice").await;

    let response = app
        .request(
            "POST",
            "/api/files/presigned",
            Some(serde_json::json!({ "file_path": "docs/report.pdf", "size_bytes": 11 })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let file_id = parse_id(&response.body["data"]["file_id"]);
    let upload_url = response.body["data"]["upload_url"].as_str().unwrap();
    assert!(upload_url.contains(&format!("{user_id}/docs/report.pdf")));
    assert!(upload_url.contains("op=put"));

    let listed = app.request("GET", "/api/files", None, Some(&token)).await;
    assert_eq!(listed.body["data"][0]["status"], "pending");

    app.blobs.put_raw(
        &format!("{user_id}/docs/report.pdf"),
        Bytes::from_static(b"hello world"),
    );
    let response = app
        .request("POST", &format!("/api/files/{file_id}/finalize"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "uploaded");
    assert!(response.body["data"]["uploaded_at"].is_string());

    let response = app
        .request("GET", &format!("/api/files/{file_id}/download"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::FOUND);
    let location = response.headers[header::LOCATION].to_str().unwrap();
    assert!(location.contains("op=get"));
}

#[tokio::test]
async fn test_finalize_is_idempotent() {
    let app = TestApp::new();
    let (token, user_id) = app.create_user("alice").await;
    let file_id = app
        .plaintext_file(&token, user_id, "a.txt", b"abc")
        .await;

    let response = app
        .request("POST", &format!("/api/files/{file_id}/finalize"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "uploaded");
}

#[tokio::test]
async fn test_encrypted_upload_round_trip() {
    let app = TestApp::new();
    let (token, user_id) = app.create_user("alice").await;
    let plaintext = b"the quarterly numbers";

    let file_id = app.encrypted_file(&token, "secret/q3.txt", plaintext).await;

    let stored = app
        .blobs
        .get_raw(&format!("{user_id}/secret/q3.txt"))
        .expect("blob missing");
    assert_ne!(stored.as_ref(), plaintext.as_slice());
    assert_eq!(stored.len(), 12 + plaintext.len() + 16);

    let response = app
        .request("GET", &format!("/api/files/{file_id}/download"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.bytes.as_ref(), plaintext.as_slice());
    let disposition = response.headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.contains("q3.txt"));
}

#[tokio::test]
async fn test_tampered_blob_fails_without_details() {
    let app = TestApp::new();
    let (token, user_id) = app.create_user("alice").await;
    let file_id = app.encrypted_file(&token, "x.bin", b"payload").await;

    let key = format!("{user_id}/x.bin");
    let mut stored = app.blobs.get_raw(&key).unwrap().to_vec();
    let last = stored.len() - 1;
    stored[last] ^= 0x01;
    app.blobs.put_raw(&key, Bytes::from(stored));

    let response = app
        .request("GET", &format!("/api/files/{file_id}/download"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["message"], "An internal error occurred");
}

#[tokio::test]
async fn test_encrypted_upload_write_failure_leaves_no_record() {
    let app = TestApp::new();
    let (token, _) = app.create_user("alice").await;
    app.blobs.fail_on(FailOn::Write, true);

    let response = app.upload_encrypted(&token, "doomed.txt", b"data").await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(app.file_records.is_empty());
    assert_eq!(app.blobs.object_count(), 0);

    app.blobs.fail_on(FailOn::Write, false);
    let response = app.upload_encrypted(&token, "doomed.txt", b"data").await;
    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_encrypted_upload_with_empty_path_is_rejected() {
    let app = TestApp::new();
    let (token, _) = app.create_user("alice").await;

    let response = app.upload_encrypted(&token, "", b"data").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(app.file_records.is_empty());
}

#[tokio::test]
async fn test_path_traversal_is_rejected() {
    let app = TestApp::new();
    let (token, _) = app.create_user("alice").await;

    let response = app
        .request(
            "POST",
            "/api/files/presigned",
            Some(serde_json::json!({ "file_path": "../other/secret", "size_bytes": 1 })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(app.file_records.is_empty());
}

#[tokio::test]
async fn test_download_before_finalize_conflicts() {
    let app = TestApp::new();
    let (token, _) = app.create_user("alice").await;
    let response = app
        .request(
            "POST",
            "/api/files/presigned",
            Some(serde_json::json!({ "file_path": "later.txt", "size_bytes": 3 })),
            Some(&token),
        )
        .await;
    let file_id = parse_id(&response.body["data"]["file_id"]);

    let response = app
        .request("GET", &format!("/api/files/{file_id}/download"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_other_users_files_are_not_found() {
    let app = TestApp::new();
    let (alice, _) = app.create_user("alice").await;
    let (mallory, _) = app.create_user("mallory").await;
    let file_id = app.encrypted_file(&alice, "mine.txt", b"private").await;

    for (method, uri) in [
        ("GET", format!("/api/files/{file_id}/download")),
        ("POST", format!("/api/files/{file_id}/finalize")),
        ("DELETE", format!("/api/files/{file_id}")),
    ] {
        let response = app.request(method, &uri, None, Some(&mallory)).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{method} {uri}");
    }

    let listed = app.request("GET", "/api/files", None, Some(&mallory)).await;
    assert_eq!(listed.body["data"], serde_json::json!([]));
}

#[tokio::test]
async fn test_delete_removes_blob_then_record() {
    let app = TestApp::new();
    let (token, _) = app.create_user("alice").await;
    let file_id = app.encrypted_file(&token, "gone.txt", b"bye").await;

    let response = app
        .request("DELETE", &format!("/api/files/{file_id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert!(app.file_records.is_empty());
    assert_eq!(app.blobs.object_count(), 0);

    let response = app
        .request("DELETE", &format!("/api/files/{file_id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_blob_failure_keeps_record() {
    let app = TestApp::new();
    let (token, _) = app.create_user("alice").await;
    let file_id = app.encrypted_file(&token, "sticky.txt", b"still here").await;
    app.blobs.fail_on(FailOn::Delete, true);

    let response = app
        .request("DELETE", &format!("/api/files/{file_id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(app.file_records.len(), 1);

    app.blobs.fail_on(FailOn::Delete, false);
    let response = app
        .request("GET", &format!("/api/files/{file_id}/download"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.bytes.as_ref(), b"still here");
}

/// Blob store whose writes never complete.
#[derive(Debug)]
struct StalledWrites(MemoryStorageProvider);

#[async_trait]
impl StorageProvider for StalledWrites {
    fn provider_type(&self) -> &str {
        "stalled"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn presign_upload(&self, key: &str, ttl: Duration) -> AppResult<String> {
        self.0.presign_upload(key, ttl).await
    }

    async fn presign_download(&self, key: &str, ttl: Duration) -> AppResult<String> {
        self.0.presign_download(key, ttl).await
    }

    async fn read_bytes(&self, key: &str) -> AppResult<Bytes> {
        self.0.read_bytes(key).await
    }

    async fn write(&self, _key: &str, _data: Bytes) -> AppResult<()> {
        std::future::pending().await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.0.delete(key).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.0.exists(key).await
    }
}

#[tokio::test]
async fn test_cancelled_encrypted_upload_removes_pending_record() {
    let app = TestApp::with_storage(Arc::new(StalledWrites(MemoryStorageProvider::new("b"))));
    let ctx = context(uuid::Uuid::new_v4());

    let upload = app
        .state
        .file_service
        .upload_encrypted(&ctx, "abandoned.txt", Bytes::from_static(b"data"));
    let outcome = tokio::time::timeout(Duration::from_millis(200), upload).await;
    assert!(outcome.is_err(), "write should not have completed");

    for _ in 0..100 {
        if app.file_records.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(app.file_records.is_empty());
}
