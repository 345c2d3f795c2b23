//! Project entity model and DTOs.

use dailies_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::patch::double_option;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub status_id: Option<DbId>,
    pub thumbnail_path: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Signed URL for `thumbnail_path`, filled in per response.
    #[sqlx(skip)]
    pub thumbnail_url: Option<String>,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(custom(function = "super::validate_code"))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    pub status_id: Option<DbId>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

/// DTO for updating an existing project. The code is immutable.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub status_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub start_date: Option<Option<Date>>,
    #[serde(default, deserialize_with = "double_option")]
    pub end_date: Option<Option<Date>>,
}

/// Query-string filter for the project list.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProjectFilter {
    pub status_id: Option<DbId>,
    pub created_by: Option<DbId>,
    pub search: Option<String>,
}
