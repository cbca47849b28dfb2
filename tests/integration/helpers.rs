//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use securestore_api::{AppState, Backends, build_app, build_state};
use securestore_core::config::{AppConfig, AuthConfig, CryptoConfig, StorageBackend, StorageConfig};
use securestore_core::traits::storage::StorageProvider;
use securestore_crypto::FileKey;
use securestore_database::memory::{MemoryFileStore, MemoryShareStore, MemoryUserStore};
use securestore_service::RequestContext;
use securestore_storage::MemoryStorageProvider;

const BOUNDARY: &str = "securestore-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Handler state, for driving services directly
    pub state: AppState,
    /// Blob store contents
    pub blobs: MemoryStorageProvider,
    /// File records
    pub file_records: Arc<MemoryFileStore>,
    /// Share link records
    pub share_records: Arc<MemoryShareStore>,
}

/// Captured response
pub struct TestResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw body
    pub bytes: Bytes,
    /// Body parsed as JSON, `Null` when it is not JSON
    pub body: Value,
}

impl TestResponse {
    /// The `error` code of an error body.
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

impl TestApp {
    /// Create a new test application over the in-memory blob store
    pub fn new() -> Self {
        let blobs = MemoryStorageProvider::new("test-bucket");
        Self::build(blobs.clone(), Arc::new(blobs))
    }

    /// Create a test application whose services write through `storage`
    pub fn with_storage(storage: Arc<dyn StorageProvider>) -> Self {
        Self::build(MemoryStorageProvider::new("unused"), storage)
    }

    fn build(blobs: MemoryStorageProvider, storage: Arc<dyn StorageProvider>) -> Self {
        let file_records = Arc::new(MemoryFileStore::new());
        let share_records = Arc::new(MemoryShareStore::new());

        let backends = Backends {
            files: file_records.clone(),
            shares: share_records.clone(),
            users: Arc::new(MemoryUserStore::new()),
            storage,
            pool: None,
        };

        let state = build_state(test_config(), backends).expect("Failed to build state");
        let router = build_app(state.clone());

        Self {
            router,
            state,
            blobs,
            file_records,
            share_records,
        }
    }

    /// Send a JSON request
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(Method::from_bytes(method.as_bytes()).expect("Invalid method"))
            .uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send(request).await
    }

    /// Send a multipart encrypted upload
    pub async fn upload_encrypted(&self, token: &str, file_path: &str, data: &[u8]) -> TestResponse {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file_path\"\r\n\r\n{file_path}\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"upload.bin\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/files/encrypted")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("Failed to build request");

        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            bytes,
            body,
        }
    }

    /// Register a user and log in, returning the bearer token and user id
    pub async fn create_user(&self, username: &str) -> (String, Uuid) {
        let email = format!("{username}@example.com");
        let password = "correct-horse-battery";

        let response = self
            .request(
                "POST",
                "/api/register",
                Some(serde_json::json!({
                    "username": username,
                    "email": email,
                    "password": password,
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        let user_id: Uuid = response.body["data"]["id"]
            .as_str()
            .and_then(|s| s.parse().ok())
            .expect("Missing user id");

        let response = self
            .request(
                "POST",
                "/api/login",
                Some(serde_json::json!({ "email": email, "password": password })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        let token = response.body["data"]["token"]
            .as_str()
            .expect("Missing token")
            .to_string();

        (token, user_id)
    }

    /// Upload an encrypted file over HTTP and return its id
    pub async fn encrypted_file(&self, token: &str, file_path: &str, data: &[u8]) -> Uuid {
        let response = self.upload_encrypted(token, file_path, data).await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        parse_id(&response.body["data"]["id"])
    }

    /// Run the presigned flow, drop the blob in place and finalize
    pub async fn plaintext_file(&self, token: &str, user_id: Uuid, file_path: &str, data: &[u8]) -> Uuid {
        let response = self
            .request(
                "POST",
                "/api/files/presigned",
                Some(serde_json::json!({ "file_path": file_path, "size_bytes": data.len() })),
                Some(token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        let file_id = parse_id(&response.body["data"]["file_id"]);

        self.blobs
            .put_raw(&format!("{user_id}/{file_path}"), Bytes::copy_from_slice(data));

        let response = self
            .request(
                "POST",
                &format!("/api/files/{file_id}/finalize"),
                None,
                Some(token),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        file_id
    }

    /// Create a share link over HTTP, returning its JSON data
    pub async fn share(&self, token: &str, file_id: Uuid, password: Option<&str>) -> Value {
        let response = self
            .request(
                "POST",
                "/api/shares",
                Some(serde_json::json!({
                    "file_id": file_id,
                    "expiry_hours": 24,
                    "password": password,
                })),
                Some(token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["data"].clone()
    }
}

/// Request context for a user, for calling services directly
pub fn context(user_id: Uuid) -> RequestContext {
    RequestContext::new(user_id)
}

/// Parse a JSON string value as a UUID
pub fn parse_id(value: &Value) -> Uuid {
    value
        .as_str()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| panic!("Not a UUID: {value}"))
}

fn test_config() -> AppConfig {
    AppConfig {
        storage: StorageConfig {
            provider: StorageBackend::Memory,
            bucket: "test-bucket".to_string(),
            ..StorageConfig::default()
        },
        auth: AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            ..AuthConfig::default()
        },
        crypto: CryptoConfig {
            file_key: FileKey::generate().to_base64(),
        },
        ..AppConfig::default()
    }
}
