//! Asset entity model and DTOs.

use dailies_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::patch::double_option;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub project_id: DbId,
    pub code: String,
    pub name: String,
    pub asset_type: String,
    pub description: Option<String>,
    pub status_id: Option<DbId>,
    pub assigned_to: Option<DbId>,
    pub thumbnail_path: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[sqlx(skip)]
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAsset {
    #[validate(custom(function = "super::validate_code"))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Defaults to `other`.
    pub asset_type: Option<String>,
    pub description: Option<String>,
    pub status_id: Option<DbId>,
    pub assigned_to: Option<DbId>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAsset {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub asset_type: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub status_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub assigned_to: Option<Option<DbId>>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct AssetFilter {
    pub asset_type: Option<String>,
    pub status_id: Option<DbId>,
    pub assigned_to: Option<DbId>,
    pub search: Option<String>,
}
