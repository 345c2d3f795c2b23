#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use dailies_api::auth::jwt::{generate_access_token, JwtConfig};
use dailies_api::auth::password::hash_password;
use dailies_api::config::ServerConfig;
use dailies_api::router::build_app_router;
use dailies_api::state::AppState;
use dailies_api::storage::local::LocalStore;
use dailies_api::storage::{StorageBackend, StorageConfig};
use dailies_core::types::DbId;
use dailies_db::models::user::{CreateUser, User};
use dailies_db::repositories::{ProjectMemberRepo, RoleRepo, UserRepo};

pub const TEST_PASSWORD: &str = "correct-horse-battery";
pub const ADMIN: DbId = 1;
pub const PRODUCER: DbId = 2;
pub const ARTIST: DbId = 3;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin, a 30-second request timeout
/// and a local thumbnail store rooted at `storage_root`.
pub fn test_config(storage_root: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 5,
        jwt: JwtConfig {
            secret: "test-jwt-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        storage: StorageConfig {
            backend: StorageBackend::Local,
            bucket: "dailies".to_string(),
            local_root: storage_root,
            signing_secret: "test-signing-secret".to_string(),
            public_base_url: "http://localhost:3000".to_string(),
            signed_url_ttl_secs: 600,
            s3_endpoint: None,
            max_thumbnail_bytes: 64 * 1024,
        },
        bootstrap_admin: None,
    }
}

/// The full application over a test database and a temporary thumbnail
/// directory. The directory is removed when the value is dropped.
pub struct TestApp {
    pub pool: PgPool,
    pub config: ServerConfig,
    state: AppState,
    _storage_dir: TempDir,
}

impl TestApp {
    pub fn new(pool: PgPool) -> Self {
        let storage_dir = tempfile::tempdir().expect("temp dir");
        let config = test_config(storage_dir.path().to_path_buf());
        let state = AppState {
            pool: pool.clone(),
            config: Arc::new(config.clone()),
            storage: Arc::new(LocalStore::new(&config.storage)),
        };
        Self {
            pool,
            config,
            state,
            _storage_dir: storage_dir,
        }
    }

    /// Same middleware stack as production.
    pub fn router(&self) -> Router {
        build_app_router(self.state.clone(), &self.config)
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router().oneshot(request).await.unwrap()
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).unwrap()).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> Response {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> Response {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> Response {
        self.request(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Response {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    pub async fn delete_json(&self, uri: &str, token: &str, body: Value) -> Response {
        self.request(Method::DELETE, uri, Some(token), Some(body)).await
    }

    /// Access token for `user`, minted directly.
    pub async fn token_for(&self, user: &User) -> String {
        let role = RoleRepo::resolve_name(&self.pool, user.role_id).await.unwrap();
        generate_access_token(user.id, &role, &self.config.jwt).unwrap()
    }

    /// Create a user with `role_id` and return it with an access token.
    pub async fn user_with_token(&self, email: &str, role_id: DbId) -> (User, String) {
        let user = create_user(&self.pool, email, role_id).await;
        let token = self.token_for(&user).await;
        (user, token)
    }

    /// POST `body` and return the `data` of a 201 envelope.
    pub async fn create(&self, uri: &str, token: &str, body: Value) -> Value {
        let response = self.post(uri, token, body).await;
        let status = response.status();
        let json = body_json(response).await;
        assert_eq!(status, StatusCode::CREATED, "POST {uri} failed: {json}");
        json["data"].clone()
    }

    /// Multipart `PUT` of a single `file` field.
    pub async fn upload(
        &self,
        uri: &str,
        token: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Response {
        let boundary = "dailies-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"thumb\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let request = Request::builder()
            .method(Method::PUT)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }
}

/// Insert a user with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, email: &str, role_id: DbId) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            display_name: email.split('@').next().unwrap_or(email).to_string(),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            role_id,
        },
    )
    .await
    .unwrap()
}

/// Add `user_id` to `project_id` with `role` directly.
pub async fn add_member(pool: &PgPool, project_id: DbId, user_id: DbId, role: &str) {
    let role = dailies_core::access::ProjectRole::parse(role).unwrap();
    ProjectMemberRepo::upsert(pool, project_id, user_id, role)
        .await
        .unwrap();
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the error envelope and return its `error.message`.
pub async fn assert_error(response: Response, status: StatusCode, code: &str) -> String {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["success"], false, "{json}");
    assert_eq!(json["error"]["code"], code, "{json}");
    assert!(json["metadata"]["timestamp"].is_string());
    json["error"]["message"].as_str().unwrap_or_default().to_string()
}
