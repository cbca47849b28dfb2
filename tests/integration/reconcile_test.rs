//! Integration tests for the background sweeps.

use std::time::Duration;

use axum::http::StatusCode;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use securestore_core::config::WorkerConfig;
use securestore_entity::file::{File, FileStatus};
use securestore_entity::share::ShareLink;
use securestore_worker::{TaskScheduler, register_default_tasks};

use crate::helpers::{TestApp, context, parse_id};

fn pending_record(user_id: Uuid, file_path: &str, age: chrono::Duration) -> File {
    File {
        id: Uuid::new_v4(),
        user_id,
        file_path: file_path.to_string(),
        size_bytes: 4,
        is_encrypted: false,
        storage_key: File::storage_key_for(user_id, file_path),
        status: FileStatus::Pending,
        created_at: Utc::now() - age,
        uploaded_at: None,
    }
}

#[tokio::test]
async fn test_reconcile_promotes_pending_file_with_blob() {
    let app = TestApp::new();
    let (token, user_id) = app.create_user("alice").await;

    let response = app
        .request(
            "POST",
            "/api/files/presigned",
            Some(serde_json::json!({ "file_path": "forgot-to-finalize.txt", "size_bytes": 4 })),
            Some(&token),
        )
        .await;
    let file_id = parse_id(&response.body["data"]["file_id"]);
    app.blobs.put_raw(
        &format!("{user_id}/forgot-to-finalize.txt"),
        Bytes::from_static(b"data"),
    );

    let report = app
        .state
        .file_service
        .reconcile_pending_files()
        .await
        .unwrap();
    assert_eq!(report.promoted, 1);

    let file = app
        .state
        .file_service
        .get_file(&context(user_id), file_id)
        .await
        .unwrap();
    assert!(file.is_uploaded());
}

#[tokio::test]
async fn test_cleanup_purges_only_stale_pending_without_blob() {
    let app = TestApp::new();
    let user_id = Uuid::new_v4();

    let stale = pending_record(user_id, "abandoned.txt", chrono::Duration::hours(3));
    let fresh = pending_record(user_id, "in-flight.txt", chrono::Duration::minutes(5));
    let stale_with_blob = pending_record(user_id, "arrived.txt", chrono::Duration::hours(3));
    app.blobs
        .put_raw(&stale_with_blob.storage_key, Bytes::from_static(b"here"));
    for file in [&stale, &fresh, &stale_with_blob] {
        app.file_records.insert(file.clone());
    }

    let report = app.state.file_service.cleanup_deleted_files().await.unwrap();
    assert_eq!(report.purged, 1);

    let service = &app.state.file_service;
    assert!(service.find_by_id(stale.id).await.is_err());
    assert!(service.find_by_id(fresh.id).await.is_ok());
    assert!(service.find_by_id(stale_with_blob.id).await.is_ok());
}

#[tokio::test]
async fn test_share_sweep_removes_expired_links() {
    let app = TestApp::new();
    let (token, user_id) = app.create_user("alice").await;
    let file_id = app.encrypted_file(&token, "a.txt", b"a").await;
    let live = app.share(&token, file_id, None).await;

    app.share_records.insert(ShareLink {
        id: Uuid::new_v4(),
        file_id,
        share_token: "long-gone".to_string(),
        expires_at: Utc::now() - chrono::Duration::days(1),
        password_hash: None,
        created_by: user_id,
        created_at: Utc::now() - chrono::Duration::days(2),
    });
    assert_eq!(app.share_records.len(), 2);

    let report = app
        .state
        .share_service
        .cleanup_expired_shares()
        .await
        .unwrap();
    assert_eq!(report.purged, 1);
    assert_eq!(app.share_records.len(), 1);

    let share_token = live["share_token"].as_str().unwrap();
    let response = app
        .request("GET", &format!("/api/shares/{share_token}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test(start_paused = true)]
async fn test_scheduler_runs_reconcile_on_interval() {
    let app = TestApp::new();
    let user_id = Uuid::new_v4();
    let record = pending_record(user_id, "late.txt", chrono::Duration::minutes(1));
    app.blobs
        .put_raw(&record.storage_key, Bytes::from_static(b"late"));
    app.file_records.insert(record.clone());

    let config = WorkerConfig {
        reconcile_interval_seconds: 60,
        ..WorkerConfig::default()
    };
    let mut scheduler = TaskScheduler::new();
    register_default_tasks(
        &mut scheduler,
        app.state.file_service.clone(),
        app.state.share_service.clone(),
        &config,
    );
    assert_eq!(scheduler.task_count(), 3);
    scheduler.start();

    tokio::time::sleep(Duration::from_secs(30)).await;
    let file = app.state.file_service.find_by_id(record.id).await.unwrap();
    assert_eq!(file.status, FileStatus::Pending);

    tokio::time::sleep(Duration::from_secs(31)).await;
    let file = app.state.file_service.find_by_id(record.id).await.unwrap();
    assert_eq!(file.status, FileStatus::Uploaded);

    scheduler.shutdown().await;
}
