//! Project-scoped role checks over HTTP.
//!
//! Project roles are ordered viewer < artist < supervisor < manager; reads
//! need viewer, writes artist, deletes supervisor, and project settings and
//! membership manager. Global admins bypass membership entirely.

mod common;

use axum::http::StatusCode;
use common::{add_member, assert_error, body_json, TestApp, ADMIN, ARTIST, PRODUCER};
use serde_json::{json, Value};
use sqlx::PgPool;

struct Fixture {
    app: TestApp,
    manager: String,
    project: Value,
    sequence: Value,
}

async fn fixture(pool: PgPool) -> Fixture {
    let app = TestApp::new(pool);
    let (_, manager) = app.user_with_token("producer@studio.test", PRODUCER).await;
    let project = app
        .create("/api/v1/projects", &manager, json!({ "code": "ALPHA", "name": "Alpha" }))
        .await;
    let episode = app
        .create(
            &format!("/api/v1/projects/{}/episodes", project["id"]),
            &manager,
            json!({ "code": "EP01", "name": "Pilot" }),
        )
        .await;
    let sequence = app
        .create(
            &format!("/api/v1/episodes/{}/sequences", episode["id"]),
            &manager,
            json!({ "code": "SQ010", "name": "Opening" }),
        )
        .await;
    Fixture {
        app,
        manager,
        project,
        sequence,
    }
}

impl Fixture {
    fn project_id(&self) -> i64 {
        self.project["id"].as_i64().unwrap()
    }

    /// A global artist holding `role` on the fixture project.
    async fn member(&self, email: &str, role: &str) -> (i64, String) {
        let (user, token) = self.app.user_with_token(email, ARTIST).await;
        add_member(&self.app.pool, self.project_id(), user.id, role).await;
        (user.id, token)
    }

    fn shots_uri(&self) -> String {
        format!("/api/v1/sequences/{}/shots", self.sequence["id"])
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_member_is_forbidden(pool: PgPool) {
    let f = fixture(pool).await;
    let (_, outsider) = f.app.user_with_token("outsider@studio.test", ARTIST).await;

    let response = f
        .app
        .get(&format!("/api/v1/projects/{}", f.project_id()), &outsider)
        .await;
    let message = assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;
    assert_eq!(message, "You are not a member of this project");

    let response = f.app.get(&f.shots_uri(), &outsider).await;
    assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_viewer_reads_but_cannot_write(pool: PgPool) {
    let f = fixture(pool).await;
    let (_, viewer) = f.member("viewer@studio.test", "viewer").await;

    let response = f.app.get(&f.shots_uri(), &viewer).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = f
        .app
        .post(&f.shots_uri(), &viewer, json!({ "code": "SH010", "name": "Wide" }))
        .await;
    let message = assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;
    assert_eq!(message, "Project role 'artist' or higher required");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_needs_supervisor(pool: PgPool) {
    let f = fixture(pool).await;
    let (_, artist) = f.member("artist@studio.test", "artist").await;
    let (_, supervisor) = f.member("sup@studio.test", "supervisor").await;

    let shot = f
        .app
        .create(&f.shots_uri(), &artist, json!({ "code": "SH010", "name": "Wide" }))
        .await;
    let uri = format!("/api/v1/shots/{}", shot["id"]);

    let response = f.app.patch(&uri, &artist, json!({ "name": "Wider" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = f.app.delete(&uri, &artist).await;
    assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;

    let response = f.app.delete(&uri, &supervisor).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_settings_need_manager(pool: PgPool) {
    let f = fixture(pool).await;
    let (_, supervisor) = f.member("sup@studio.test", "supervisor").await;
    let uri = format!("/api/v1/projects/{}", f.project_id());

    let response = f.app.patch(&uri, &supervisor, json!({ "name": "Renamed" })).await;
    assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;

    let response = f.app.patch(&uri, &f.manager, json!({ "name": "Renamed" })).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_bypasses_membership(pool: PgPool) {
    let f = fixture(pool).await;
    let (_, admin) = f.app.user_with_token("admin@studio.test", ADMIN).await;

    let response = f
        .app
        .get(&format!("/api/v1/projects/{}", f.project_id()), &admin)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = f
        .app
        .delete(&format!("/api/v1/sequences/{}", f.sequence["id"]), &admin)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_list_is_scoped_to_membership(pool: PgPool) {
    let f = fixture(pool).await;
    let (_, other_producer) = f.app.user_with_token("other@studio.test", PRODUCER).await;
    f.app
        .create("/api/v1/projects", &other_producer, json!({ "code": "BETA", "name": "Beta" }))
        .await;
    let (_, admin) = f.app.user_with_token("admin@studio.test", ADMIN).await;
    let (_, outsider) = f.app.user_with_token("outsider@studio.test", ARTIST).await;

    let response = f.app.get("/api/v1/projects", &f.manager).await;
    let json = body_json(response).await;
    assert_eq!(json["metadata"]["pagination"]["total"], 1);
    assert_eq!(json["data"][0]["code"], "ALPHA");

    let response = f.app.get("/api/v1/projects", &admin).await;
    assert_eq!(body_json(response).await["metadata"]["pagination"]["total"], 2);

    let response = f.app.get("/api/v1/projects", &outsider).await;
    let json = body_json(response).await;
    assert_eq!(json["metadata"]["pagination"]["total"], 0);
    assert_eq!(json["data"], json!([]));
}

// ---------------------------------------------------------------------------
// Membership management
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_and_update_members(pool: PgPool) {
    let f = fixture(pool).await;
    let (artist, artist_token) = f.app.user_with_token("artist@studio.test", ARTIST).await;
    let members = format!("/api/v1/projects/{}/members", f.project_id());

    let member = f
        .app
        .create(&members, &f.manager, json!({ "user_id": artist.id, "role": "viewer" }))
        .await;
    assert_eq!(member["role"], "viewer");

    let response = f
        .app
        .post(&members, &f.manager, json!({ "user_id": artist.id, "role": "artist" }))
        .await;
    assert_error(response, StatusCode::CONFLICT, "CONFLICT").await;

    let response = f
        .app
        .post(&members, &f.manager, json!({ "user_id": 999_999, "role": "artist" }))
        .await;
    assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;

    let response = f
        .app
        .post(&members, &f.manager, json!({ "user_id": artist.id, "role": "director" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // A viewer cannot manage membership.
    let response = f
        .app
        .patch(&format!("{members}/{}", artist.id), &artist_token, json!({ "role": "manager" }))
        .await;
    assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;

    let response = f
        .app
        .patch(&format!("{members}/{}", artist.id), &f.manager, json!({ "role": "supervisor" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["role"], "supervisor");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_last_manager_is_retained(pool: PgPool) {
    let f = fixture(pool).await;
    let manager_user = f.project["created_by"].as_i64().unwrap();
    let member_uri = format!("/api/v1/projects/{}/members/{manager_user}", f.project_id());

    let response = f
        .app
        .patch(&member_uri, &f.manager, json!({ "role": "artist" }))
        .await;
    let message = assert_error(response, StatusCode::CONFLICT, "CONFLICT").await;
    assert_eq!(message, "A project must keep at least one manager");

    let response = f.app.delete(&member_uri, &f.manager).await;
    assert_error(response, StatusCode::CONFLICT, "CONFLICT").await;

    // With a second manager the first may step down.
    f.member("second@studio.test", "manager").await;
    let response = f.app.delete(&member_uri, &f.manager).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_removing_missing_member_is_404(pool: PgPool) {
    let f = fixture(pool).await;
    let (outsider, _) = f.app.user_with_token("outsider@studio.test", ARTIST).await;

    let response = f
        .app
        .delete(
            &format!("/api/v1/projects/{}/members/{}", f.project_id(), outsider.id),
            &f.manager,
        )
        .await;
    assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}
