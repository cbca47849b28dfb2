//! Integration tests for registration, login and bearer auth.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_register_and_login() {
    let app = TestApp::new();
    let (token, _) = app.create_user("alice").await;
    assert!(!token.is_empty());

    let response = app.request("GET", "/api/files", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"], serde_json::json!([]));
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = TestApp::new();
    app.create_user("bob").await;

    let response = app
        .request(
            "POST",
            "/api/register",
            Some(serde_json::json!({
                "username": "bob2",
                "email": "bob@example.com",
                "password": "another-password",
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_short_password_is_rejected() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/register",
            Some(serde_json::json!({
                "username": "carol",
                "email": "carol@example.com",
                "password": "short",
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let app = TestApp::new();
    app.create_user("dave").await;

    let response = app
        .request(
            "POST",
            "/api/login",
            Some(serde_json::json!({ "email": "dave@example.com", "password": "wrong-password" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_or_bad_token_is_unauthorized() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/files", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("GET", "/api/files", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_health_reports_storage() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["storage"], "memory");
}
