//! Object storage paths and signed thumbnail URLs.
//!
//! Thumbnails are stored as `bucket/key` strings in the `thumbnail_path`
//! column of each entity. The HTTP layer turns them into short-lived URLs on
//! every read.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::codes::EntityType;
use crate::error::CoreError;

type HmacSha256 = Hmac<Sha256>;

// ---------------------------------------------------------------------------
// Storage paths
// ---------------------------------------------------------------------------

/// A location in object storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath {
    pub bucket: String,
    pub key: String,
}

impl StoragePath {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Result<Self, CoreError> {
        let path = Self {
            bucket: bucket.into(),
            key: key.into(),
        };
        path.validate()?;
        Ok(path)
    }

    /// Parse a stored `bucket/key` string.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        let (bucket, key) = value.split_once('/').ok_or_else(|| {
            CoreError::Validation(format!("Storage path '{value}' must be 'bucket/key'"))
        })?;
        Self::new(bucket, key)
    }

    fn validate(&self) -> Result<(), CoreError> {
        let invalid = |reason: &str| {
            Err(CoreError::Validation(format!(
                "Invalid storage path '{self}': {reason}"
            )))
        };

        if self.bucket.is_empty() || self.key.is_empty() {
            return invalid("bucket and key must not be empty");
        }
        if self.bucket.contains('/') {
            return invalid("bucket must not contain '/'");
        }
        if self.key.starts_with('/') || self.key.contains('\\') {
            return invalid("key must be a relative path");
        }
        if self.key.split('/').any(|seg| seg.is_empty() || seg == "..") {
            return invalid("key must not contain empty or '..' segments");
        }
        Ok(())
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

// ---------------------------------------------------------------------------
// Thumbnails
// ---------------------------------------------------------------------------

/// Map an upload content type to the file extension we store it under.
pub fn image_extension(content_type: &str) -> Result<&'static str, CoreError> {
    match content_type {
        "image/png" => Ok("png"),
        "image/jpeg" | "image/jpg" => Ok("jpg"),
        "image/webp" => Ok("webp"),
        other => Err(CoreError::Validation(format!(
            "Unsupported thumbnail content type '{other}'. Must be image/png, image/jpeg or image/webp"
        ))),
    }
}

/// Key under which an entity's thumbnail is stored.
pub fn thumbnail_key(entity_type: EntityType, code: &str, extension: &str) -> String {
    format!("thumbnails/{}/{code}.{extension}", entity_type.as_str())
}

// ---------------------------------------------------------------------------
// URL signing
// ---------------------------------------------------------------------------

/// Compute the hex HMAC-SHA256 signature of `path` valid until `expires`
/// (Unix seconds).
pub fn sign_path(secret: &str, path: &StoragePath, expires: i64) -> String {
    hex::encode(mac_for(secret, path, expires).finalize().into_bytes())
}

/// Verify a signature produced by [`sign_path`].
///
/// Fails with `Forbidden` when the link has expired or the signature does
/// not match. Comparison is constant-time.
pub fn verify_signature(
    secret: &str,
    path: &StoragePath,
    expires: i64,
    signature: &str,
    now: i64,
) -> Result<(), CoreError> {
    if expires < now {
        return Err(CoreError::Forbidden("Signed URL has expired".into()));
    }
    let provided = hex::decode(signature)
        .ok_or_else(|| CoreError::Forbidden("Malformed signature".into()))?;
    mac_for(secret, path, expires)
        .verify_slice(&provided)
        .map_err(|_| CoreError::Forbidden("Invalid signature".into()))
}

fn mac_for(secret: &str, path: &StoragePath, expires: i64) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(path.to_string().as_bytes());
    mac.update(b"\n");
    mac.update(expires.to_string().as_bytes());
    mac
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    pub fn decode(s: &str) -> Option<Vec<u8>> {
        if s.len() % 2 != 0 {
            return None;
        }
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(s.get(i..i + 2)?, 16).ok())
            .collect()
    }
}
