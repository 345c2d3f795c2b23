//! Status catalogue over HTTP: admin-only writes, validation and the
//! entity-type filter.

mod common;

use axum::http::StatusCode;
use common::{assert_error, body_json, TestApp, ADMIN, ARTIST};
use serde_json::{json, Value};
use sqlx::PgPool;

fn status_body(code: &str) -> Value {
    json!({
        "code": code,
        "name": "Client Review",
        "color": "#AA00FF",
        "applies_to": ["project", "version"],
    })
}

fn codes(json: &Value) -> Vec<String> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["code"].as_str().unwrap().to_string())
        .collect()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_status_writes_require_admin(pool: PgPool) {
    let app = TestApp::new(pool);
    let (_, admin) = app.user_with_token("admin@studio.test", ADMIN).await;
    let (_, artist) = app.user_with_token("artist@studio.test", ARTIST).await;

    let response = app.post("/api/v1/statuses", &artist, status_body("crv")).await;
    assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;

    let status = app.create("/api/v1/statuses", &admin, status_body("crv")).await;
    assert_eq!(status["applies_to"], json!(["project", "version"]));
    let uri = format!("/api/v1/statuses/{}", status["id"]);

    let response = app.patch(&uri, &artist, json!({ "name": "Renamed" })).await;
    assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;
    let response = app.delete(&uri, &artist).await;
    assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;

    // Reads are open to any authenticated user.
    let response = app.get(&uri, &artist).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .patch(&uri, &admin, json!({ "name": "Renamed", "is_active": false }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Renamed");
    assert_eq!(json["data"]["is_active"], false);
    assert_eq!(json["data"]["color"], "#AA00FF");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_status_validation_and_duplicates(pool: PgPool) {
    let app = TestApp::new(pool);
    let (_, admin) = app.user_with_token("admin@studio.test", ADMIN).await;

    for color in ["red", "#12345", "#GGGGGG", "AA00FF"] {
        let mut body = status_body("crv");
        body["color"] = json!(color);
        let response = app.post("/api/v1/statuses", &admin, body).await;
        assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
    }

    let mut body = status_body("crv");
    body["applies_to"] = json!(["shot", "task"]);
    let response = app.post("/api/v1/statuses", &admin, body).await;
    let message = assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
    assert!(message.contains("task"), "{message}");

    let response = app.post("/api/v1/statuses", &admin, status_body("wtg")).await;
    assert_error(response, StatusCode::CONFLICT, "CONFLICT").await;

    let status = app.create("/api/v1/statuses", &admin, status_body("crv")).await;
    let uri = format!("/api/v1/statuses/{}", status["id"]);
    let response = app.patch(&uri, &admin, json!({ "color": "blue" })).await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
    let response = app.patch(&uri, &admin, json!({ "applies_to": ["task"] })).await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    let response = app.patch("/api/v1/statuses/999999", &admin, json!({ "name": "x" })).await;
    assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_status_list_filters_by_entity_type(pool: PgPool) {
    let app = TestApp::new(pool);
    let (_, artist) = app.user_with_token("artist@studio.test", ARTIST).await;

    let response = app.get("/api/v1/statuses", &artist).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        codes(&body_json(response).await),
        ["wtg", "rdy", "ip", "rev", "apr", "fin", "omt", "hld"]
    );

    // Empty `applies_to` counts as every type.
    let response = app.get("/api/v1/statuses?entity_type=project", &artist).await;
    assert_eq!(
        codes(&body_json(response).await),
        ["wtg", "rdy", "ip", "apr", "fin", "hld"]
    );

    let response = app.get("/api/v1/statuses?entity_type=version", &artist).await;
    let listed = codes(&body_json(response).await);
    assert!(listed.contains(&"rev".to_string()));
    assert!(!listed.contains(&"omt".to_string()));

    let response = app.get("/api/v1/statuses?entity_type=task", &artist).await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_status_delete_clears_references(pool: PgPool) {
    let app = TestApp::new(pool);
    let (_, admin) = app.user_with_token("admin@studio.test", ADMIN).await;

    let status = app.create("/api/v1/statuses", &admin, status_body("crv")).await;
    let project = app
        .create(
            "/api/v1/projects",
            &admin,
            json!({ "code": "ALPHA", "name": "Alpha", "status_id": status["id"] }),
        )
        .await;
    assert_eq!(project["status_id"], status["id"]);

    let uri = format!("/api/v1/statuses/{}", status["id"]);
    let response = app.delete(&uri, &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .get(&format!("/api/v1/projects/{}", project["id"]), &admin)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["data"]["status_id"].is_null());

    let response = app.get(&uri, &admin).await;
    assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
    let response = app.delete(&uri, &admin).await;
    assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}
