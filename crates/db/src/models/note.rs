//! Note entity model and DTOs.

use dailies_core::codes::EntityType;
use dailies_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A note attached to any tracked entity of a project.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Note {
    pub id: DbId,
    pub project_id: DbId,
    pub entity_type: String,
    pub entity_id: DbId,
    pub subject: String,
    pub content: String,
    pub author_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateNote {
    pub entity_type: EntityType,
    #[validate(range(min = 1))]
    pub entity_id: DbId,
    #[validate(length(min = 1, max = 255))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateNote {
    #[validate(length(min = 1, max = 255))]
    pub subject: Option<String>,
    #[validate(length(min = 1))]
    pub content: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct NoteFilter {
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub author_id: Option<DbId>,
    pub search: Option<String>,
}
