//! Integration tests for catalog HTTP endpoints.

mod common;

use axum::http::StatusCode;
use common::{OWNER_PASSWORD, TestServer, json_request, raw_get};
use serde_json::json;

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::new().await;

    let (status, body) = json_request(&server.router, "GET", "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_list_demos_starts_empty() {
    let server = TestServer::new().await;

    let (status, body) = json_request(&server.router, "GET", "/api/demos", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["demos"], json!([]));
}

#[tokio::test]
async fn test_create_demo_requires_owner_password() {
    let server = TestServer::new().await;
    let body = json!({ "demo": { "name": "Song", "audioFile": "song.mp3" } });

    let (status, _) =
        json_request(&server.router, "POST", "/api/demos", Some(body.clone()), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = json_request(
        &server.router,
        "POST",
        "/api/demos",
        Some(body),
        Some("wrong-password"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Registry unchanged after rejected mutations.
    let (_, listing) = json_request(&server.router, "GET", "/api/demos", None, None).await;
    assert_eq!(listing["demos"], json!([]));
}

#[tokio::test]
async fn test_create_demo_validates_after_auth() {
    let server = TestServer::new().await;

    // The client's login probe posts a bogus record: correct password must
    // yield 400 (not 401) so the probe can tell the two apart.
    let probe = json!({ "demo": { "name": "__test__" } });
    let (status, body) = json_request(
        &server.router,
        "POST",
        "/api/demos",
        Some(probe),
        Some(OWNER_PASSWORD),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_request");
}

#[tokio::test]
async fn test_create_demo_and_list_newest_first() {
    let server = TestServer::new().await;

    let first = json!({ "demo": { "name": "First", "audioFile": "first.mp3" } });
    let (status, created) = json_request(
        &server.router,
        "POST",
        "/api/demos",
        Some(first),
        Some(OWNER_PASSWORD),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["demo"]["name"], "First");
    assert!(created["demo"]["id"].is_i64());
    assert_eq!(created["demo"]["audioFile"], "first.mp3");

    let second = json!({ "demo": { "name": "Second", "audioFile": "second.mp3" } });
    let (status, _) = json_request(
        &server.router,
        "POST",
        "/api/demos",
        Some(second),
        Some(OWNER_PASSWORD),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, listing) = json_request(&server.router, "GET", "/api/demos", None, None).await;
    let demos = listing["demos"].as_array().unwrap();
    assert_eq!(demos.len(), 2);
    assert_eq!(demos[0]["name"], "Second");
    assert_eq!(demos[1]["name"], "First");

    // Metadata only: records never embed binary payloads.
    assert!(demos[0].get("audioData").is_none());
    assert!(demos[0].get("chunk").is_none());
}

#[tokio::test]
async fn test_update_demo_renames() {
    let server = TestServer::new().await;

    let create = json!({ "demo": { "name": "Before", "audioFile": "a.mp3" } });
    let (_, created) = json_request(
        &server.router,
        "POST",
        "/api/demos",
        Some(create),
        Some(OWNER_PASSWORD),
    )
    .await;
    let id = created["demo"]["id"].clone();

    let update = json!({ "id": id, "updates": { "name": "After" } });
    let (status, updated) = json_request(
        &server.router,
        "PUT",
        "/api/demos",
        Some(update),
        Some(OWNER_PASSWORD),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["demo"]["name"], "After");

    // Id accepted as a string too (the client is inconsistent about this).
    let update = json!({ "id": id.to_string(), "updates": { "name": "Again" } });
    let (status, _) = json_request(
        &server.router,
        "PUT",
        "/api/demos",
        Some(update),
        Some(OWNER_PASSWORD),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_unknown_demo_is_404() {
    let server = TestServer::new().await;

    let update = json!({ "id": 12345, "updates": { "name": "Ghost" } });
    let (status, body) = json_request(
        &server.router,
        "PUT",
        "/api/demos",
        Some(update),
        Some(OWNER_PASSWORD),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn test_delete_demo_removes_record_and_blobs() {
    let server = TestServer::new().await;

    let create = json!({ "demo": { "name": "Doomed", "audioFile": "d.mp3" } });
    let (_, created) = json_request(
        &server.router,
        "POST",
        "/api/demos",
        Some(create),
        Some(OWNER_PASSWORD),
    )
    .await;
    let id = created["demo"]["id"].as_i64().unwrap();

    // Seed an audio blob so the delete has something to release.
    server
        .storage()
        .put(
            &format!("demos/{id}/audio"),
            axum::body::Bytes::from_static(b"audio-bytes"),
        )
        .await
        .unwrap();

    let (status, _) = json_request(
        &server.router,
        "DELETE",
        &format!("/api/demos?id={id}"),
        None,
        Some(OWNER_PASSWORD),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, listing) = json_request(&server.router, "GET", "/api/demos", None, None).await;
    assert_eq!(listing["demos"], json!([]));

    // Audio fetch after delete is a 404.
    let (status, _, _) = raw_get(&server.router, &format!("/api/demo-audio?id={id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_requires_owner_password() {
    let server = TestServer::new().await;

    let create = json!({ "demo": { "name": "Kept", "audioFile": "k.mp3" } });
    let (_, created) = json_request(
        &server.router,
        "POST",
        "/api/demos",
        Some(create),
        Some(OWNER_PASSWORD),
    )
    .await;
    let id = created["demo"]["id"].as_i64().unwrap();

    let (status, _) = json_request(
        &server.router,
        "DELETE",
        &format!("/api/demos?id={id}"),
        None,
        Some("wrong-password"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, listing) = json_request(&server.router, "GET", "/api/demos", None, None).await;
    assert_eq!(listing["demos"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_demo_audio_unknown_id_is_404() {
    let server = TestServer::new().await;

    let (status, _, _) = raw_get(&server.router, "/api/demo-audio?id=999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = raw_get(&server.router, "/api/demo-audio?id=not-a-number").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
