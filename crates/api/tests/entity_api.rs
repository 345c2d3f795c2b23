//! HTTP-level integration tests for the project hierarchy:
//! projects, episodes, sequences, shots and assets.

mod common;

use axum::http::StatusCode;
use common::{assert_error, body_json, TestApp, ARTIST, PRODUCER};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn status_id(pool: &PgPool, code: &str) -> i64 {
    sqlx::query_scalar("SELECT id FROM statuses WHERE code = $1")
        .bind(code)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Create project → episode → sequence as `token`, returning the three
/// created envelopes' data.
async fn seed_hierarchy(app: &TestApp, token: &str) -> (Value, Value, Value) {
    let project = app
        .create(
            "/api/v1/projects",
            token,
            json!({ "code": "ALPHA", "name": "Alpha" }),
        )
        .await;
    let episode = app
        .create(
            &format!("/api/v1/projects/{}/episodes", project["id"]),
            token,
            json!({ "code": "EP01", "name": "Pilot" }),
        )
        .await;
    let sequence = app
        .create(
            &format!("/api/v1/episodes/{}/sequences", episode["id"]),
            token,
            json!({ "code": "SQ010", "name": "Opening" }),
        )
        .await;
    (project, episode, sequence)
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_producer_creates_project_and_becomes_manager(pool: PgPool) {
    let app = TestApp::new(pool);
    let (producer, token) = app.user_with_token("producer@studio.test", PRODUCER).await;

    let project = app
        .create(
            "/api/v1/projects",
            &token,
            json!({
                "code": "ALPHA",
                "name": "Alpha",
                "start_date": "2026-01-05",
                "end_date": "2026-06-30",
            }),
        )
        .await;
    assert_eq!(project["code"], "ALPHA");
    assert_eq!(project["created_by"], producer.id);
    assert_eq!(project["thumbnail_url"], Value::Null);

    let response = app
        .get(&format!("/api/v1/projects/{}/members", project["id"]), &token)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["user_id"], producer.id);
    assert_eq!(json["data"][0]["role"], "manager");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_artist_cannot_create_project(pool: PgPool) {
    let app = TestApp::new(pool);
    let (_, token) = app.user_with_token("artist@studio.test", ARTIST).await;

    let response = app
        .post("/api/v1/projects", &token, json!({ "code": "ALPHA", "name": "Alpha" }))
        .await;
    assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_input_validation(pool: PgPool) {
    let app = TestApp::new(pool);
    let (_, token) = app.user_with_token("producer@studio.test", PRODUCER).await;

    let response = app
        .post("/api/v1/projects", &token, json!({ "code": "bad code!", "name": "Alpha" }))
        .await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    let response = app
        .post(
            "/api/v1/projects",
            &token,
            json!({
                "code": "ALPHA",
                "name": "Alpha",
                "start_date": "2026-06-30",
                "end_date": "2026-01-05",
            }),
        )
        .await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    app.create("/api/v1/projects", &token, json!({ "code": "ALPHA", "name": "Alpha" }))
        .await;
    let response = app
        .post("/api/v1/projects", &token, json!({ "code": "ALPHA", "name": "Again" }))
        .await;
    let message = assert_error(response, StatusCode::CONFLICT, "CONFLICT").await;
    assert!(message.contains("ALPHA"), "{message}");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_status_must_apply_to_entity_type(pool: PgPool) {
    let omitted = status_id(&pool, "omt").await;
    let in_progress = status_id(&pool, "ip").await;
    let app = TestApp::new(pool);
    let (_, token) = app.user_with_token("producer@studio.test", PRODUCER).await;

    let response = app
        .post(
            "/api/v1/projects",
            &token,
            json!({ "code": "ALPHA", "name": "Alpha", "status_id": omitted }),
        )
        .await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    let response = app
        .post(
            "/api/v1/projects",
            &token,
            json!({ "code": "ALPHA", "name": "Alpha", "status_id": 999_999 }),
        )
        .await;
    assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;

    let project = app
        .create(
            "/api/v1/projects",
            &token,
            json!({ "code": "ALPHA", "name": "Alpha", "status_id": in_progress }),
        )
        .await;
    assert_eq!(project["status_id"], in_progress);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_patch_clears_fields_with_null(pool: PgPool) {
    let app = TestApp::new(pool);
    let (_, token) = app.user_with_token("producer@studio.test", PRODUCER).await;
    let project = app
        .create(
            "/api/v1/projects",
            &token,
            json!({ "code": "ALPHA", "name": "Alpha", "description": "First show" }),
        )
        .await;
    let uri = format!("/api/v1/projects/{}", project["id"]);

    let response = app.patch(&uri, &token, json!({ "name": "Alpha Prime" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Alpha Prime");
    assert_eq!(json["data"]["description"], "First show");
    assert_eq!(json["data"]["code"], "ALPHA");

    let response = app.patch(&uri, &token, json!({ "description": null })).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["description"], Value::Null);
    assert_eq!(json["data"]["name"], "Alpha Prime");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_ids_are_rejected(pool: PgPool) {
    let app = TestApp::new(pool);
    let (_, token) = app.user_with_token("producer@studio.test", PRODUCER).await;

    for uri in ["/api/v1/projects/0", "/api/v1/projects/-4", "/api/v1/projects/abc"] {
        let response = app.get(uri, &token).await;
        assert_error(response, StatusCode::BAD_REQUEST, "BAD_REQUEST").await;
    }

    let response = app.get("/api/v1/projects/424242", &token).await;
    let message = assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
    assert_eq!(message, "Project with id 424242 not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_rejects_unknown_sort_column(pool: PgPool) {
    let app = TestApp::new(pool);
    let (_, token) = app.user_with_token("producer@studio.test", PRODUCER).await;

    let response = app.get("/api/v1/projects?sort=password_hash", &token).await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    let response = app.get("/api/v1/projects?order=sideways", &token).await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

// ---------------------------------------------------------------------------
// Hierarchy
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_hierarchy_is_created_top_down(pool: PgPool) {
    let app = TestApp::new(pool);
    let (_, token) = app.user_with_token("producer@studio.test", PRODUCER).await;
    let (project, episode, sequence) = seed_hierarchy(&app, &token).await;

    assert_eq!(episode["project_id"], project["id"]);
    assert_eq!(sequence["episode_id"], episode["id"]);
    assert_eq!(sequence["project_id"], project["id"]);

    let shot = app
        .create(
            &format!("/api/v1/sequences/{}/shots", sequence["id"]),
            &token,
            json!({ "code": "SH010", "name": "Wide", "cut_in": 1001, "cut_out": 1096 }),
        )
        .await;
    assert_eq!(shot["sequence_id"], sequence["id"]);
    assert_eq!(shot["project_id"], project["id"]);
    assert_eq!(shot["cut_in"], 1001);

    let response = app
        .get(&format!("/api/v1/projects/{}/shots", project["id"]), &token)
        .await;
    let json = body_json(response).await;
    assert_eq!(json["metadata"]["pagination"]["total"], 1);
    assert_eq!(json["data"][0]["code"], "SH010");

    let response = app
        .get(
            &format!("/api/v1/projects/{}/shots?sequence_id={}", project["id"], sequence["id"]),
            &token,
        )
        .await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_child_creation_under_missing_parent_is_404(pool: PgPool) {
    let app = TestApp::new(pool);
    let (_, token) = app.user_with_token("producer@studio.test", PRODUCER).await;

    let response = app
        .post(
            "/api/v1/episodes/999/sequences",
            &token,
            json!({ "code": "SQ010", "name": "Opening" }),
        )
        .await;
    let message = assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
    assert_eq!(message, "Episode with id 999 not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_shot_rules(pool: PgPool) {
    let review = status_id(&pool, "rev").await;
    let app = TestApp::new(pool);
    let (_, token) = app.user_with_token("producer@studio.test", PRODUCER).await;
    let (_, episode, sequence) = seed_hierarchy(&app, &token).await;
    let shots = format!("/api/v1/sequences/{}/shots", sequence["id"]);

    let response = app
        .post(&shots, &token, json!({ "code": "SH010", "name": "Wide", "cut_in": 1100, "cut_out": 1001 }))
        .await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    let response = app
        .post(&shots, &token, json!({ "code": "SH010", "name": "Wide", "assigned_to": 999_999 }))
        .await;
    assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;

    let shot = app
        .create(&shots, &token, json!({ "code": "SH010", "name": "Wide", "status_id": review }))
        .await;
    let response = app.post(&shots, &token, json!({ "code": "SH010", "name": "Twin" })).await;
    assert_error(response, StatusCode::CONFLICT, "CONFLICT").await;

    // `rev` is not usable on an episode.
    let response = app
        .patch(
            &format!("/api/v1/episodes/{}", episode["id"]),
            &token,
            json!({ "status_id": review }),
        )
        .await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    // Only cut_out moves; the merged range is still checked.
    let uri = format!("/api/v1/shots/{}", shot["id"]);
    let response = app
        .patch(&uri, &token, json!({ "cut_in": 1001, "cut_out": 1050 }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = app.patch(&uri, &token, json!({ "cut_out": 900 })).await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_cascades_to_children(pool: PgPool) {
    let app = TestApp::new(pool);
    let (_, token) = app.user_with_token("producer@studio.test", PRODUCER).await;
    let (_, episode, sequence) = seed_hierarchy(&app, &token).await;
    let shot = app
        .create(
            &format!("/api/v1/sequences/{}/shots", sequence["id"]),
            &token,
            json!({ "code": "SH010", "name": "Wide" }),
        )
        .await;

    let response = app
        .delete(&format!("/api/v1/episodes/{}", episode["id"]), &token)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .get(&format!("/api/v1/sequences/{}", sequence["id"]), &token)
        .await;
    assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
    let response = app.get(&format!("/api/v1/shots/{}", shot["id"]), &token).await;
    assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_asset_types_and_filters(pool: PgPool) {
    let app = TestApp::new(pool);
    let (_, token) = app.user_with_token("producer@studio.test", PRODUCER).await;
    let (project, _, _) = seed_hierarchy(&app, &token).await;
    let assets = format!("/api/v1/projects/{}/assets", project["id"]);

    let hero = app
        .create(
            &assets,
            &token,
            json!({ "code": "CHR_HERO", "name": "Hero", "asset_type": "character" }),
        )
        .await;
    assert_eq!(hero["asset_type"], "character");

    let misc = app
        .create(&assets, &token, json!({ "code": "MISC", "name": "Misc" }))
        .await;
    assert_eq!(misc["asset_type"], "other");

    let response = app
        .post(&assets, &token, json!({ "code": "CAR", "name": "Car", "asset_type": "vehicle" }))
        .await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    let response = app
        .get(&format!("{assets}?asset_type=character"), &token)
        .await;
    let json = body_json(response).await;
    assert_eq!(json["metadata"]["pagination"]["total"], 1);
    assert_eq!(json["data"][0]["code"], "CHR_HERO");

    let response = app.get(&format!("{assets}?asset_type=vehicle"), &token).await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_paginates_and_sorts(pool: PgPool) {
    let app = TestApp::new(pool);
    let (_, token) = app.user_with_token("producer@studio.test", PRODUCER).await;
    let (_, _, sequence) = seed_hierarchy(&app, &token).await;
    let shots = format!("/api/v1/sequences/{}/shots", sequence["id"]);
    for code in ["SH030", "SH010", "SH040", "SH020"] {
        app.create(&shots, &token, json!({ "code": code, "name": code })).await;
    }

    let response = app
        .get(&format!("{shots}?limit=2&offset=1&sort=code&order=asc"), &token)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let codes: Vec<_> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["code"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(codes, ["SH020", "SH030"]);

    let pagination = &json["metadata"]["pagination"];
    assert_eq!(pagination["total"], 4);
    assert_eq!(pagination["limit"], 2);
    assert_eq!(pagination["offset"], 1);

    let response = app.get(&format!("{shots}?search=sh04"), &token).await;
    let json = body_json(response).await;
    assert_eq!(json["metadata"]["pagination"]["total"], 1);
}
