//! S3-compatible object store.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use dailies_core::storage::StoragePath;

use super::{content_type_for_key, ObjectStore, StorageConfig, StorageError, StoredObject};

pub struct S3Store {
    client: Client,
    bucket: String,
    presign_ttl: Duration,
}

fn backend_error<E: std::error::Error>(err: E) -> StorageError {
    StorageError::Backend(DisplayErrorContext(err).to_string())
}

impl S3Store {
    /// Build a client from the standard AWS environment (credentials,
    /// region), pointing at `s3_endpoint` when one is configured.
    pub async fn from_config(config: &StorageConfig) -> Self {
        let shared = aws_config::load_from_env().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.s3_endpoint {
            // Path-style addressing is what MinIO and most S3 clones expect.
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        tracing::info!(
            bucket = %config.bucket,
            endpoint = config.s3_endpoint.as_deref().unwrap_or("aws"),
            "Using S3 object storage",
        );

        Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            presign_ttl: Duration::from_secs(config.signed_url_ttl_secs),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<StoragePath, StorageError> {
        let path = StoragePath::new(self.bucket.clone(), key)
            .map_err(|e| StorageError::InvalidPath(e.to_string()))?;
        self.client
            .put_object()
            .bucket(&path.bucket)
            .key(&path.key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(backend_error)?;
        Ok(path)
    }

    async fn get(&self, path: &StoragePath) -> Result<StoredObject, StorageError> {
        let output = self
            .client
            .get_object()
            .bucket(&path.bucket)
            .key(&path.key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|s| s.is_no_such_key()) {
                    StorageError::NotFound(path.to_string())
                } else {
                    backend_error(e)
                }
            })?;

        let content_type = output
            .content_type()
            .unwrap_or_else(|| content_type_for_key(&path.key))
            .to_string();
        let bytes = output
            .body
            .collect()
            .await
            .map_err(backend_error)?
            .into_bytes()
            .to_vec();

        Ok(StoredObject {
            bytes,
            content_type,
        })
    }

    async fn delete(&self, path: &StoragePath) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&path.bucket)
            .key(&path.key)
            .send()
            .await
            .map_err(backend_error)?;
        Ok(())
    }

    async fn signed_url(&self, path: &StoragePath) -> Result<String, StorageError> {
        let presigning = PresigningConfig::expires_in(self.presign_ttl).map_err(backend_error)?;
        let request = self
            .client
            .get_object()
            .bucket(&path.bucket)
            .key(&path.key)
            .presigned(presigning)
            .await
            .map_err(backend_error)?;
        Ok(request.uri().to_string())
    }
}
