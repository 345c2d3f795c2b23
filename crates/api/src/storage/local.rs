//! Filesystem-backed object store.
//!
//! Objects live at `{root}/{bucket}/{key}`. Download links point at the API's
//! own `/api/v1/media/{bucket}/{key}` route and carry an HMAC signature that
//! the route verifies before streaming the file.

use std::path::PathBuf;

use async_trait::async_trait;
use dailies_core::storage::{sign_path, StoragePath};
use tokio::fs;

use super::{content_type_for_key, ObjectStore, StorageConfig, StorageError, StoredObject};

pub struct LocalStore {
    root: PathBuf,
    bucket: String,
    signing_secret: String,
    public_base_url: String,
    ttl_secs: i64,
}

impl LocalStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: config.local_root.clone(),
            bucket: config.bucket.clone(),
            signing_secret: config.signing_secret.clone(),
            public_base_url: config.public_base_url.clone(),
            ttl_secs: i64::try_from(config.signed_url_ttl_secs).unwrap_or(i64::MAX / 2),
        }
    }

    /// Filesystem location of `path`. Only paths in this store's bucket
    /// resolve.
    fn file_path(&self, path: &StoragePath) -> Result<PathBuf, StorageError> {
        if path.bucket != self.bucket {
            return Err(StorageError::NotFound(path.to_string()));
        }
        // StoragePath already rejects `..`, absolute and empty segments.
        Ok(self.root.join(&path.bucket).join(&path.key))
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put(
        &self,
        key: &str,
        _content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<StoragePath, StorageError> {
        let path = StoragePath::new(self.bucket.clone(), key)
            .map_err(|e| StorageError::InvalidPath(e.to_string()))?;
        let file = self.file_path(&path)?;
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write to a temp file then rename so readers never see partial data.
        let tmp = file.with_extension("tmp");
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, &file).await?;

        tracing::debug!(path = %path, size = bytes.len(), "Stored object");
        Ok(path)
    }

    async fn get(&self, path: &StoragePath) -> Result<StoredObject, StorageError> {
        let file = self.file_path(path)?;
        match fs::read(&file).await {
            Ok(bytes) => Ok(StoredObject {
                bytes,
                content_type: content_type_for_key(&path.key).to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, path: &StoragePath) -> Result<(), StorageError> {
        let file = self.file_path(path)?;
        match fs::remove_file(&file).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn signed_url(&self, path: &StoragePath) -> Result<String, StorageError> {
        let expires = chrono::Utc::now().timestamp() + self.ttl_secs;
        let signature = sign_path(&self.signing_secret, path, expires);
        Ok(format!(
            "{}/api/v1/media/{}/{}?expires={expires}&signature={signature}",
            self.public_base_url, path.bucket, path.key
        ))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use dailies_core::storage::verify_signature;

    use super::*;
    use crate::storage::StorageBackend;

    fn store(root: &std::path::Path) -> LocalStore {
        LocalStore::new(&StorageConfig {
            backend: StorageBackend::Local,
            bucket: "media".into(),
            local_root: root.to_path_buf(),
            signing_secret: "secret".into(),
            public_base_url: "http://localhost:3000".into(),
            signed_url_ttl_secs: 60,
            s3_endpoint: None,
            max_thumbnail_bytes: 1024,
        })
    }

    #[tokio::test]
    async fn put_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let path = store
            .put("thumbnails/shot/SH010.png", "image/png", b"png-bytes".to_vec())
            .await
            .unwrap();
        assert_eq!(path.to_string(), "media/thumbnails/shot/SH010.png");
        assert!(dir.path().join("media/thumbnails/shot/SH010.png").exists());

        let object = store.get(&path).await.unwrap();
        assert_eq!(object.bytes, b"png-bytes");
        assert_eq!(object.content_type, "image/png");

        store.delete(&path).await.unwrap();
        assert_matches!(store.get(&path).await, Err(StorageError::NotFound(_)));
        store.delete(&path).await.unwrap();
    }

    #[tokio::test]
    async fn other_buckets_are_not_served() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let foreign = StoragePath::parse("private/secret.png").unwrap();
        assert_matches!(store.get(&foreign).await, Err(StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn signed_url_verifies() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let path = StoragePath::parse("media/thumbnails/asset/HERO.jpg").unwrap();

        let url = store.signed_url(&path).await.unwrap();
        let (base, query) = url.split_once('?').unwrap();
        assert_eq!(
            base,
            "http://localhost:3000/api/v1/media/media/thumbnails/asset/HERO.jpg"
        );

        let mut expires = 0;
        let mut signature = "";
        for pair in query.split('&') {
            match pair.split_once('=').unwrap() {
                ("expires", v) => expires = v.parse().unwrap(),
                ("signature", v) => signature = v,
                _ => {}
            }
        }
        let now = chrono::Utc::now().timestamp();
        assert!(verify_signature("secret", &path, expires, signature, now).is_ok());
    }
}
