//! Version entity model and DTOs.
//!
//! A version is a published iteration of any hierarchy entity, addressed by
//! (`entity_type`, `entity_code`). There is no foreign key to the target, so
//! versions outlive a deleted shot or asset.

use dailies_core::codes::EntityType;
use dailies_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::patch::double_option;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Version {
    pub id: DbId,
    pub project_id: DbId,
    pub code: String,
    pub name: String,
    pub entity_type: String,
    pub entity_code: String,
    pub version_number: i32,
    pub description: Option<String>,
    pub file_path: Option<String>,
    pub status_id: Option<DbId>,
    pub thumbnail_path: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[sqlx(skip)]
    pub thumbnail_url: Option<String>,
}

/// DTO for publishing a version.
///
/// `version_number` is allocated by the server. `code` defaults to
/// `{entity_code}_v{nnn}` and `name` to the code.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVersion {
    pub entity_type: EntityType,
    #[validate(custom(function = "super::validate_code"))]
    pub entity_code: String,
    #[validate(custom(function = "super::validate_code"))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 1024))]
    pub file_path: Option<String>,
    pub status_id: Option<DbId>,
}

/// Fully-resolved insert row built from a [`CreateVersion`].
#[derive(Debug, Clone)]
pub struct NewVersion {
    pub project_id: DbId,
    pub code: String,
    pub name: String,
    pub entity_type: EntityType,
    pub entity_code: String,
    pub version_number: i32,
    pub description: Option<String>,
    pub file_path: Option<String>,
    pub status_id: Option<DbId>,
    pub created_by: Option<DbId>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateVersion {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub file_path: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub status_id: Option<Option<DbId>>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct VersionFilter {
    pub entity_type: Option<String>,
    pub entity_code: Option<String>,
    pub status_id: Option<DbId>,
    pub created_by: Option<DbId>,
    pub search: Option<String>,
}
