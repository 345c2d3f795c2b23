//! Episode entity model and DTOs.

use dailies_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::patch::double_option;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Episode {
    pub id: DbId,
    pub project_id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub status_id: Option<DbId>,
    pub thumbnail_path: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[sqlx(skip)]
    pub thumbnail_url: Option<String>,
}

/// DTO for creating an episode. The project comes from the request path.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEpisode {
    #[validate(custom(function = "super::validate_code"))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    pub status_id: Option<DbId>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateEpisode {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub status_id: Option<Option<DbId>>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct EpisodeFilter {
    pub status_id: Option<DbId>,
    pub created_by: Option<DbId>,
    pub search: Option<String>,
}
