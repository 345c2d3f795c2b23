//! Workflow status model and DTOs.

use dailies_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::patch::double_option;

/// A row from the `statuses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Status {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub color: String,
    pub description: Option<String>,
    /// Entity types this status may be set on. Empty means all.
    pub applies_to: Vec<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStatus {
    #[validate(custom(function = "super::validate_code"))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(custom(function = "super::validate_color"))]
    pub color: String,
    pub description: Option<String>,
    #[serde(default)]
    pub applies_to: Vec<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateStatus {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(custom(function = "super::validate_color"))]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub applies_to: Option<Vec<String>>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// Query-string filter for the status list.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StatusFilter {
    /// Only statuses usable on this entity type.
    pub entity_type: Option<String>,
    pub is_active: Option<bool>,
}
