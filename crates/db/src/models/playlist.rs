//! Playlist entity model and DTOs.

use dailies_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::patch::double_option;

/// A playlist: an ordered list of version codes for a review session.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Playlist {
    pub id: DbId,
    pub project_id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub version_codes: Vec<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePlaylist {
    #[validate(custom(function = "super::validate_code"))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub version_codes: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePlaylist {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    /// Replaces the whole list when present.
    pub version_codes: Option<Vec<String>>,
}

/// Body of `POST`/`DELETE /playlists/{id}/versions`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PlaylistVersionCodes {
    #[validate(length(min = 1))]
    pub version_codes: Vec<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct PlaylistFilter {
    pub created_by: Option<DbId>,
    pub search: Option<String>,
}
