use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use super::{create_app, create_router};
use crate::database::DatabaseConfig;

async fn server() -> TestServer {
    let app = create_app(&DatabaseConfig::default()).await.unwrap();
    TestServer::new(create_router(app)).unwrap()
}

#[tokio::test]
async fn video_lifecycle() {
    let server = server().await;

    let created = server
        .put("/video/1")
        .json(&json!({ "name": "a", "views": 0, "likes": 0 }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    assert_eq!(
        created.json::<Value>(),
        json!({ "id": 1, "name": "a", "views": 0, "likes": 0 })
    );

    let patched = server.patch("/video/1").json(&json!({ "likes": 5 })).await;
    assert_eq!(patched.status_code(), StatusCode::OK);
    assert_eq!(
        patched.json::<Value>(),
        json!({ "id": 1, "name": "a", "views": 0, "likes": 5 })
    );

    let found = server.get("/video/1").await;
    assert_eq!(found.status_code(), StatusCode::OK);
    assert_eq!(
        found.json::<Value>(),
        json!({ "id": 1, "name": "a", "views": 0, "likes": 5 })
    );

    let deleted = server.delete("/video/1").await;
    assert_eq!(deleted.status_code(), StatusCode::NO_CONTENT);
    assert!(deleted.text().is_empty());

    let gone = server.get("/video/1").await;
    assert_eq!(gone.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(
        gone.json::<Value>(),
        json!({ "message": "could not find video with that id" })
    );
}

#[tokio::test]
async fn create_without_views_is_rejected() {
    let server = server().await;

    let response = server
        .put("/video/2")
        .json(&json!({ "name": "a", "likes": 0 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "message": "Video needs views", "field": "views" })
    );

    let found = server.get("/video/2").await;
    assert_eq!(found.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_with_mistyped_field_is_rejected() {
    let server = server().await;

    let response = server
        .put("/video/3")
        .json(&json!({ "name": 42, "views": 0, "likes": 0 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["field"], json!("name"));
}

#[tokio::test]
async fn create_taken_id_is_conflict() {
    let server = server().await;
    server
        .put("/video/1")
        .json(&json!({ "name": "a", "views": 1, "likes": 2 }))
        .await;

    let response = server
        .put("/video/1")
        .json(&json!({ "name": "b", "views": 3, "likes": 4 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>(), json!({ "message": "video id taken" }));

    let found = server.get("/video/1").await;
    assert_eq!(
        found.json::<Value>(),
        json!({ "id": 1, "name": "a", "views": 1, "likes": 2 })
    );
}

#[tokio::test]
async fn empty_patch_returns_unchanged_video() {
    let server = server().await;
    server
        .put("/video/4")
        .json(&json!({ "name": "a", "views": 1, "likes": 2 }))
        .await;

    let without_body = server.patch("/video/4").await;
    assert_eq!(without_body.status_code(), StatusCode::OK);
    assert_eq!(
        without_body.json::<Value>(),
        json!({ "id": 4, "name": "a", "views": 1, "likes": 2 })
    );

    let empty_object = server.patch("/video/4").json(&json!({})).await;
    assert_eq!(empty_object.status_code(), StatusCode::OK);
    assert_eq!(empty_object.json::<Value>(), without_body.json::<Value>());
}

#[tokio::test]
async fn patch_with_mistyped_field_changes_nothing() {
    let server = server().await;
    server
        .put("/video/5")
        .json(&json!({ "name": "a", "views": 1, "likes": 2 }))
        .await;

    let response = server
        .patch("/video/5")
        .json(&json!({ "name": "b", "likes": "many" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let found = server.get("/video/5").await;
    assert_eq!(
        found.json::<Value>(),
        json!({ "id": 5, "name": "a", "views": 1, "likes": 2 })
    );
}

#[tokio::test]
async fn missing_video_is_not_found() {
    let server = server().await;

    let read = server.get("/video/9").await;
    assert_eq!(read.status_code(), StatusCode::NOT_FOUND);

    let patched = server.patch("/video/9").json(&json!({ "likes": 1 })).await;
    assert_eq!(patched.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(patched.json::<Value>(), json!({ "message": "Video not found" }));

    let deleted = server.delete("/video/9").await;
    assert_eq!(deleted.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(deleted.json::<Value>(), json!({ "message": "Video not found" }));

    let after_patch = server.get("/video/9").await;
    assert_eq!(after_patch.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_integer_id_is_not_found() {
    let server = server().await;

    let response = server.get("/video/abc").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>(),
        json!({ "message": "could not find video with that id" })
    );
}

#[tokio::test]
async fn unsupported_method_is_not_allowed() {
    let server = server().await;

    let response = server.post("/video/1").await;

    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn create_taken_id_with_invalid_body_is_conflict() {
    let server = server().await;
    server
        .put("/video/1")
        .json(&json!({ "name": "a", "views": 1, "likes": 2 }))
        .await;

    let response = server.put("/video/1").json(&json!({ "name": "b" })).await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>(), json!({ "message": "video id taken" }));
}

#[tokio::test]
async fn patch_missing_video_with_invalid_body_is_not_found() {
    let server = server().await;

    let response = server.patch("/video/9").json(&json!({ "likes": "x" })).await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>(), json!({ "message": "Video not found" }));
}

#[tokio::test]
async fn patch_existing_video_with_invalid_body_is_rejected() {
    let server = server().await;
    server
        .put("/video/1")
        .json(&json!({ "name": "a", "views": 1, "likes": 2 }))
        .await;

    let response = server.patch("/video/1").json(&json!({ "likes": "x" })).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "message": "likes must be an integer", "field": "likes" })
    );
}

#[tokio::test]
async fn create_and_patch_from_form() {
    let server = server().await;

    let created = server
        .put("/video/1")
        .form(&[("name", "Tim"), ("views", "100"), ("likes", "10")])
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    assert_eq!(
        created.json::<Value>(),
        json!({ "id": 1, "name": "Tim", "views": 100, "likes": 10 })
    );

    let patched = server.patch("/video/1").form(&[("views", "101")]).await;
    assert_eq!(patched.status_code(), StatusCode::OK);
    assert_eq!(
        patched.json::<Value>(),
        json!({ "id": 1, "name": "Tim", "views": 101, "likes": 10 })
    );
}

#[tokio::test]
async fn form_with_text_counter_is_rejected() {
    let server = server().await;

    let response = server
        .put("/video/1")
        .form(&[("name", "Tim"), ("views", "many"), ("likes", "10")])
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["field"], json!("views"));
}

#[tokio::test]
async fn delete_twice_is_not_found() {
    let server = server().await;
    server
        .put("/video/1")
        .json(&json!({ "name": "a", "views": 1, "likes": 2 }))
        .await;

    let first = server.delete("/video/1").await;
    let second = server.delete("/video/1").await;

    assert_eq!(first.status_code(), StatusCode::NO_CONTENT);
    assert_eq!(second.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(second.json::<Value>(), json!({ "message": "Video not found" }));
}
