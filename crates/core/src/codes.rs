//! Entity codes, entity types and asset types.
//!
//! A code is the human-facing identifier of a tracked entity (`EP01`,
//! `SQ010`, `SH010_A`). Codes are unique per table and case-sensitive.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum length of any entity code.
pub const MAX_CODE_LENGTH: usize = 64;

static CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.\-]*$").expect("valid code regex"));

/// Validate an entity code.
pub fn validate_code(code: &str) -> Result<(), CoreError> {
    if code.is_empty() || code.len() > MAX_CODE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Code must be between 1 and {MAX_CODE_LENGTH} characters"
        )));
    }
    if !CODE_PATTERN.is_match(code) {
        return Err(CoreError::Validation(format!(
            "Invalid code '{code}'. Must start with a letter or digit and contain only letters, digits, '_', '.' or '-'"
        )));
    }
    Ok(())
}

/// Build the default code of a version: `{entity_code}_v{n:03}`.
pub fn version_code(entity_code: &str, version_number: i32) -> String {
    format!("{entity_code}_v{version_number:03}")
}

/// [`version_code`] checked against the code rules.
///
/// Long entity codes can push the generated code past
/// [`MAX_CODE_LENGTH`]; the caller must then send an explicit code.
pub fn default_version_code(entity_code: &str, version_number: i32) -> Result<String, CoreError> {
    let code = version_code(entity_code, version_number);
    if code.len() > MAX_CODE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Default version code '{code}' exceeds {MAX_CODE_LENGTH} characters; send an explicit code"
        )));
    }
    validate_code(&code)?;
    Ok(code)
}

// ---------------------------------------------------------------------------
// Entity types
// ---------------------------------------------------------------------------

/// Kinds of tracked entity that versions and notes can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Project,
    Episode,
    Sequence,
    Shot,
    Asset,
    Version,
    Playlist,
}

impl EntityType {
    pub const ALL: [EntityType; 7] = [
        EntityType::Project,
        EntityType::Episode,
        EntityType::Sequence,
        EntityType::Shot,
        EntityType::Asset,
        EntityType::Version,
        EntityType::Playlist,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Project => "project",
            EntityType::Episode => "episode",
            EntityType::Sequence => "sequence",
            EntityType::Shot => "shot",
            EntityType::Asset => "asset",
            EntityType::Version => "version",
            EntityType::Playlist => "playlist",
        }
    }

    /// Backing table name. Only ever interpolated from this fixed set.
    pub fn table(self) -> &'static str {
        match self {
            EntityType::Project => "projects",
            EntityType::Episode => "episodes",
            EntityType::Sequence => "sequences",
            EntityType::Shot => "shots",
            EntityType::Asset => "assets",
            EntityType::Version => "versions",
            EntityType::Playlist => "playlists",
        }
    }

    /// Display name used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            EntityType::Project => "Project",
            EntityType::Episode => "Episode",
            EntityType::Sequence => "Sequence",
            EntityType::Shot => "Shot",
            EntityType::Asset => "Asset",
            EntityType::Version => "Version",
            EntityType::Playlist => "Playlist",
        }
    }

    /// Whether versions may be published against this entity type.
    pub fn is_versionable(self) -> bool {
        matches!(
            self,
            EntityType::Project
                | EntityType::Episode
                | EntityType::Sequence
                | EntityType::Shot
                | EntityType::Asset
        )
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == value)
            .ok_or_else(|| CoreError::Validation(format!("Unknown entity type '{value}'")))
    }

    /// Parse an entity type that versions can target.
    pub fn parse_versionable(value: &str) -> Result<Self, CoreError> {
        let entity_type = Self::parse(value)?;
        if !entity_type.is_versionable() {
            return Err(CoreError::Validation(format!(
                "Versions cannot be attached to entity type '{value}'"
            )));
        }
        Ok(entity_type)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Asset types
// ---------------------------------------------------------------------------

/// Valid values of `assets.asset_type`.
pub const VALID_ASSET_TYPES: &[&str] = &[
    "character",
    "prop",
    "environment",
    "vehicle",
    "fx",
    "matte_painting",
    "other",
];

pub fn validate_asset_type(asset_type: &str) -> Result<(), CoreError> {
    if VALID_ASSET_TYPES.contains(&asset_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid asset type '{asset_type}'. Must be one of: {}",
            VALID_ASSET_TYPES.join(", ")
        )))
    }
}
