//! Shot entity model and DTOs.

use dailies_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::patch::double_option;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Shot {
    pub id: DbId,
    pub project_id: DbId,
    pub sequence_id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub status_id: Option<DbId>,
    pub cut_in: Option<i32>,
    pub cut_out: Option<i32>,
    pub assigned_to: Option<DbId>,
    pub thumbnail_path: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[sqlx(skip)]
    pub thumbnail_url: Option<String>,
}

impl Shot {
    /// Inclusive frame count of the cut range, when both bounds are set.
    pub fn frame_count(&self) -> Option<i64> {
        dailies_core::shot::frame_count(self.cut_in, self.cut_out)
    }
}

/// DTO for creating a shot under the sequence named in the path.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateShot {
    #[validate(custom(function = "super::validate_code"))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    pub status_id: Option<DbId>,
    pub cut_in: Option<i32>,
    pub cut_out: Option<i32>,
    pub assigned_to: Option<DbId>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateShot {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub status_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub cut_in: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub cut_out: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub assigned_to: Option<Option<DbId>>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ShotFilter {
    pub sequence_id: Option<DbId>,
    pub status_id: Option<DbId>,
    pub assigned_to: Option<DbId>,
    pub search: Option<String>,
}
