//! Handlers for notes (`/projects/{id}/notes`, `/notes/{id}`).
//!
//! Notes hang off any entity of a project by (`entity_type`, `entity_id`).
//! Authors may edit and delete their own notes with read access only.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use dailies_core::access::{thresholds, ProjectRole};
use dailies_core::audit::actions;
use dailies_core::codes::EntityType;
use dailies_core::error::CoreError;
use dailies_core::types::DbId;
use dailies_db::models::note::{CreateNote, Note, NoteFilter, UpdateNote};
use dailies_db::repositories::{EntityLookup, NoteRepo};

use super::project::load_project;
use super::support::{not_found, record_audit};
use crate::error::{AppError, AppResult};
use crate::extract::{AppQuery, PathId, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::middleware::project_access::verify_project_access;
use crate::query::ListParams;
use crate::response::{ok, paged, ApiResponse};
use crate::state::AppState;

const ENTITY: &str = "note";

async fn load_note(state: &AppState, id: DbId) -> AppResult<Note> {
    NoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Note", id))
}

/// Threshold for changing `note`: read access for its author, `otherwise`
/// for everyone else.
fn edit_threshold(note: &Note, user: &AuthUser, otherwise: ProjectRole) -> ProjectRole {
    if note.author_id == Some(user.user_id) {
        thresholds::READ
    } else {
        otherwise
    }
}

/// POST /api/v1/projects/{id}/notes
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(project_id): PathId,
    ValidatedJson(input): ValidatedJson<CreateNote>,
) -> AppResult<(StatusCode, Json<ApiResponse<Note>>)> {
    load_project(&state, project_id).await?;
    verify_project_access(&state, &user, project_id, thresholds::WRITE).await?;

    let owner = EntityLookup::project_id_for_id(&state.pool, input.entity_type, input.entity_id)
        .await?
        .ok_or_else(|| not_found(input.entity_type.label(), input.entity_id))?;
    if owner != project_id {
        return Err(AppError::Core(CoreError::Validation(format!(
            "{} {} does not belong to project {project_id}",
            input.entity_type.label(),
            input.entity_id
        ))));
    }

    let note = NoteRepo::create(&state.pool, project_id, &input, user.user_id).await?;
    record_audit(
        &state,
        Some(user.user_id),
        actions::CREATE,
        ENTITY,
        Some(note.id),
        serde_json::json!({
            "project_id": project_id,
            "entity_type": note.entity_type,
            "entity_id": note.entity_id,
        }),
    )
    .await;

    Ok((StatusCode::CREATED, ok(note)))
}

/// GET /api/v1/projects/{id}/notes
pub async fn list_by_project(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(project_id): PathId,
    AppQuery(params): AppQuery<ListParams>,
    AppQuery(filter): AppQuery<NoteFilter>,
) -> AppResult<Json<ApiResponse<Vec<Note>>>> {
    let page = params.page()?;
    if let Some(entity_type) = &filter.entity_type {
        EntityType::parse(entity_type)?;
    }
    load_project(&state, project_id).await?;
    verify_project_access(&state, &user, project_id, thresholds::READ).await?;

    let (notes, total) = NoteRepo::list_by_project(&state.pool, project_id, &filter, &page).await?;
    Ok(paged(notes, total, &page))
}

/// GET /api/v1/notes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
) -> AppResult<Json<ApiResponse<Note>>> {
    let note = load_note(&state, id).await?;
    verify_project_access(&state, &user, note.project_id, thresholds::READ).await?;
    Ok(ok(note))
}

/// PATCH /api/v1/notes/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
    ValidatedJson(input): ValidatedJson<UpdateNote>,
) -> AppResult<Json<ApiResponse<Note>>> {
    let current = load_note(&state, id).await?;
    let required = edit_threshold(&current, &user, thresholds::WRITE);
    verify_project_access(&state, &user, current.project_id, required).await?;

    let note = NoteRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Note", id))?;
    record_audit(
        &state,
        Some(user.user_id),
        actions::UPDATE,
        ENTITY,
        Some(id),
        serde_json::json!({ "subject": input.subject }),
    )
    .await;

    Ok(ok(note))
}

/// DELETE /api/v1/notes/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
) -> AppResult<StatusCode> {
    let note = load_note(&state, id).await?;
    let required = edit_threshold(&note, &user, thresholds::DELETE);
    verify_project_access(&state, &user, note.project_id, required).await?;

    if !NoteRepo::delete(&state.pool, id).await? {
        return Err(not_found("Note", id));
    }
    record_audit(
        &state,
        Some(user.user_id),
        actions::DELETE,
        ENTITY,
        Some(id),
        serde_json::json!({
            "project_id": note.project_id,
            "entity_type": note.entity_type,
            "entity_id": note.entity_id,
        }),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
