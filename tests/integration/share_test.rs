//! Integration tests for share link creation and public access.

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use uuid::Uuid;

use securestore_entity::share::ShareLink;

use crate::helpers::{TestApp, parse_id};

#[tokio::test]
async fn test_public_link_to_encrypted_file_returns_bytes() {
    let app = TestApp::new();
    let (token, _) = app.create_user("alice").await;
    let file_id = app.encrypted_file(&token, "notes.txt", b"shared notes").await;

    let link = app.share(&token, file_id, None).await;
    assert_eq!(link["password_protected"], false);
    let share_token = link["share_token"].as_str().unwrap();
    assert_eq!(share_token.len(), 43);

    let response = app
        .request("GET", &format!("/api/shares/{share_token}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.bytes.as_ref(), b"shared notes");

    let listed = app
        .request("GET", &format!("/api/files/{file_id}/shares"), None, Some(&token))
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body["data"][0]["share_token"], share_token);
}

#[tokio::test]
async fn test_public_link_to_plaintext_file_returns_download_url() {
    let app = TestApp::new();
    let (token, user_id) = app.create_user("alice").await;
    let file_id = app
        .plaintext_file(&token, user_id, "photos/cat.jpg", b"meow")
        .await;

    let link = app.share(&token, file_id, None).await;
    let share_token = link["share_token"].as_str().unwrap();

    let response = app
        .request("GET", &format!("/api/shares/{share_token}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let url = response.body["data"]["download_url"].as_str().unwrap();
    assert!(url.contains("photos/cat.jpg"));
    assert!(url.contains("op=get"));
}

#[tokio::test]
async fn test_protected_link_requires_correct_password() {
    let app = TestApp::new();
    let (token, _) = app.create_user("alice").await;
    let file_id = app.encrypted_file(&token, "contract.pdf", b"terms").await;

    let link = app.share(&token, file_id, Some("open-sesame")).await;
    assert_eq!(link["password_protected"], true);
    assert!(link.get("password_hash").is_none());
    let share_token = link["share_token"].as_str().unwrap();

    let response = app
        .request("GET", &format!("/api/shares/{share_token}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "PASSWORD_REQUIRED");

    let validate = format!("/api/shares/{share_token}/validate");
    let response = app
        .request("POST", &validate, Some(serde_json::json!({})), None)
        .await;
    assert_eq!(response.error_code(), "PASSWORD_REQUIRED");

    let response = app
        .request(
            "POST",
            &validate,
            Some(serde_json::json!({ "password": "guess" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "INVALID_PASSWORD");

    let response = app
        .request(
            "POST",
            &validate,
            Some(serde_json::json!({ "password": "open-sesame" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.bytes.as_ref(), b"terms");
}

#[tokio::test]
async fn test_empty_password_creates_public_link() {
    let app = TestApp::new();
    let (token, _) = app.create_user("alice").await;
    let file_id = app.encrypted_file(&token, "open.txt", b"hi").await;

    let link = app.share(&token, file_id, Some("")).await;
    assert_eq!(link["password_protected"], false);
}

#[tokio::test]
async fn test_expiry_is_checked_before_password() {
    let app = TestApp::new();
    let (token, user_id) = app.create_user("alice").await;
    let file_id = app.encrypted_file(&token, "old.txt", b"stale").await;

    app.share_records.insert(ShareLink {
        id: Uuid::new_v4(),
        file_id,
        share_token: "expired-token".to_string(),
        expires_at: Utc::now() - Duration::minutes(1),
        password_hash: Some("not-a-real-hash".to_string()),
        created_by: user_id,
        created_at: Utc::now() - Duration::hours(2),
    });

    for password in [None, Some("wrong"), Some("open-sesame")] {
        let response = app
            .request(
                "POST",
                "/api/shares/expired-token/validate",
                Some(serde_json::json!({ "password": password })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert_eq!(response.error_code(), "LINK_EXPIRED");
    }
}

#[tokio::test]
async fn test_unknown_token_is_invalid_link() {
    let app = TestApp::new();
    let response = app
        .request("GET", "/api/shares/does-not-exist", None, None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "INVALID_LINK");
}

#[tokio::test]
async fn test_link_to_deleted_file_is_not_found() {
    let app = TestApp::new();
    let (token, _) = app.create_user("alice").await;
    let file_id = app.encrypted_file(&token, "temp.txt", b"temp").await;
    let link = app.share(&token, file_id, None).await;
    let share_token = link["share_token"].as_str().unwrap();

    let response = app
        .request("DELETE", &format!("/api/files/{file_id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app
        .request("GET", &format!("/api/shares/{share_token}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_only_owner_can_share_or_delete_links() {
    let app = TestApp::new();
    let (alice, _) = app.create_user("alice").await;
    let (mallory, _) = app.create_user("mallory").await;
    let file_id = app.encrypted_file(&alice, "mine.txt", b"mine").await;

    let response = app
        .request(
            "POST",
            "/api/shares",
            Some(serde_json::json!({ "file_id": file_id, "expiry_hours": 1 })),
            Some(&mallory),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let link = app.share(&alice, file_id, None).await;
    let link_id = parse_id(&link["id"]);
    let share_token = link["share_token"].as_str().unwrap();

    let response = app
        .request("DELETE", &format!("/api/shares/{link_id}"), None, Some(&mallory))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("DELETE", &format!("/api/shares/{link_id}"), None, Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app
        .request("GET", &format!("/api/shares/{share_token}"), None, None)
        .await;
    assert_eq!(response.error_code(), "INVALID_LINK");
}

#[tokio::test]
async fn test_non_positive_expiry_is_rejected() {
    let app = TestApp::new();
    let (token, _) = app.create_user("alice").await;
    let file_id = app.encrypted_file(&token, "a.txt", b"a").await;

    for hours in [0, -5] {
        let response = app
            .request(
                "POST",
                "/api/shares",
                Some(serde_json::json!({ "file_id": file_id, "expiry_hours": hours })),
                Some(&token),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }

    let response = app
        .request(
            "POST",
            "/api/shares",
            Some(serde_json::json!({ "file_id": Uuid::new_v4(), "expiry_hours": 1 })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
