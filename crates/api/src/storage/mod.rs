//! Object storage for entity thumbnails.
//!
//! Two backends implement [`ObjectStore`]:
//!
//! - [`local::LocalStore`] -- files under a root directory, served back by the
//!   `/api/v1/media` route behind HMAC-signed links.
//! - [`s3::S3Store`] -- an S3-compatible bucket with presigned GET links.
//!
//! Rows only ever store the `bucket/key` path; links are minted on read.

pub mod local;
pub mod s3;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use dailies_core::storage::StoragePath;

/// Errors that can occur during object storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested object was not found.
    #[error("object not found: {0}")]
    NotFound(String),

    /// The upload exceeds the configured size limit.
    #[error("object exceeds size limit ({actual} > {limit} bytes)")]
    TooLarge { actual: usize, limit: usize },

    /// The object path is not valid for this store.
    #[error("invalid object path: {0}")]
    InvalidPath(String),

    /// A filesystem error from the local backend.
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A failure reported by the remote backend.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Bytes of a stored object plus its content type.
#[derive(Debug)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Backend-agnostic object storage.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Bucket new objects are written to.
    fn bucket(&self) -> &str;

    /// Store `bytes` under `key` in [`ObjectStore::bucket`], overwriting any
    /// existing object.
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<StoragePath, StorageError>;

    async fn get(&self, path: &StoragePath) -> Result<StoredObject, StorageError>;

    /// Delete an object. Deleting a missing object is not an error.
    async fn delete(&self, path: &StoragePath) -> Result<(), StorageError>;

    /// A time-limited URL from which a client can download the object.
    async fn signed_url(&self, path: &StoragePath) -> Result<String, StorageError>;
}

/// Which [`ObjectStore`] implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Local,
    S3,
}

/// Object storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub bucket: String,
    /// Root directory of the local backend.
    pub local_root: PathBuf,
    /// HMAC key for local signed URLs.
    pub signing_secret: String,
    /// Base URL prefixed to local signed URLs (e.g. `http://localhost:3000`).
    pub public_base_url: String,
    pub signed_url_ttl_secs: u64,
    /// Custom endpoint for S3-compatible services (MinIO, R2, ...).
    pub s3_endpoint: Option<String>,
    pub max_thumbnail_bytes: usize,
}

const DEFAULT_SIGNED_URL_TTL_SECS: u64 = 3600;
const DEFAULT_MAX_THUMBNAIL_BYTES: usize = 10 * 1024 * 1024;

impl StorageConfig {
    /// Load storage configuration from environment variables.
    ///
    /// | Env Var                  | Default                  |
    /// |--------------------------|--------------------------|
    /// | `STORAGE_BACKEND`        | `local`                  |
    /// | `STORAGE_BUCKET`         | `dailies`                |
    /// | `STORAGE_LOCAL_ROOT`     | `./storage`              |
    /// | `STORAGE_SIGNING_SECRET` | value of `JWT_SECRET`    |
    /// | `PUBLIC_BASE_URL`        | `http://localhost:3000`  |
    /// | `SIGNED_URL_TTL_SECS`    | `3600`                   |
    /// | `S3_ENDPOINT`            | unset (AWS default)      |
    /// | `MAX_THUMBNAIL_BYTES`    | `10485760`               |
    ///
    /// # Panics
    ///
    /// Panics on an unknown backend, an unparsable number, or when no
    /// signing secret can be found.
    pub fn from_env() -> Self {
        let backend = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".into())
            .as_str()
        {
            "local" => StorageBackend::Local,
            "s3" => StorageBackend::S3,
            other => panic!("STORAGE_BACKEND must be 'local' or 's3', got '{other}'"),
        };

        let signing_secret = std::env::var("STORAGE_SIGNING_SECRET")
            .or_else(|_| std::env::var("JWT_SECRET"))
            .expect("STORAGE_SIGNING_SECRET or JWT_SECRET must be set");
        assert!(
            !signing_secret.is_empty(),
            "STORAGE_SIGNING_SECRET must not be empty"
        );

        Self {
            backend,
            bucket: std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| "dailies".into()),
            local_root: std::env::var("STORAGE_LOCAL_ROOT")
                .unwrap_or_else(|_| "./storage".into())
                .into(),
            signing_secret,
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into())
                .trim_end_matches('/')
                .to_string(),
            signed_url_ttl_secs: std::env::var("SIGNED_URL_TTL_SECS")
                .unwrap_or_else(|_| DEFAULT_SIGNED_URL_TTL_SECS.to_string())
                .parse()
                .expect("SIGNED_URL_TTL_SECS must be a valid u64"),
            s3_endpoint: std::env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
            max_thumbnail_bytes: std::env::var("MAX_THUMBNAIL_BYTES")
                .unwrap_or_else(|_| DEFAULT_MAX_THUMBNAIL_BYTES.to_string())
                .parse()
                .expect("MAX_THUMBNAIL_BYTES must be a valid usize"),
        }
    }
}

/// Build the configured backend.
pub async fn build_store(config: &StorageConfig) -> Arc<dyn ObjectStore> {
    match config.backend {
        StorageBackend::Local => Arc::new(local::LocalStore::new(config)),
        StorageBackend::S3 => Arc::new(s3::S3Store::from_config(config).await),
    }
}

/// Guess a content type from a key's extension.
pub(crate) fn content_type_for_key(key: &str) -> &'static str {
    match key.rsplit_once('.').map(|(_, ext)| ext) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
