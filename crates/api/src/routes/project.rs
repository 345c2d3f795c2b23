//! Route definitions for the `/projects` resource.
//!
//! Also mounts the project-scoped collections (members, episodes, shots,
//! assets, versions, playlists, notes) under `/projects/{id}/...`.

use axum::routing::{get, patch, put};
use axum::Router;

use crate::handlers::{
    asset, episode, member, note, playlist, project, shot, thumbnail, version,
};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /{id}                      -> get_by_id
/// PATCH  /{id}                      -> update
/// DELETE /{id}                      -> delete
/// PUT    /{id}/thumbnail            -> upload_project
///
/// GET    /{id}/members              -> member::list
/// POST   /{id}/members              -> member::add
/// PATCH  /{id}/members/{user_id}    -> member::update
/// DELETE /{id}/members/{user_id}    -> member::remove
///
/// GET    /{id}/episodes             -> episode::list_by_project
/// POST   /{id}/episodes             -> episode::create
/// GET    /{id}/shots                -> shot::list_by_project
/// GET    /{id}/assets               -> asset::list_by_project
/// POST   /{id}/assets               -> asset::create
/// GET    /{id}/versions             -> version::list_by_project
/// POST   /{id}/versions             -> version::create
/// GET    /{id}/playlists            -> playlist::list_by_project
/// POST   /{id}/playlists            -> playlist::create
/// GET    /{id}/notes                -> note::list_by_project
/// POST   /{id}/notes                -> note::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .patch(project::update)
                .delete(project::delete),
        )
        .route("/{id}/thumbnail", put(thumbnail::upload_project))
        .route("/{id}/members", get(member::list).post(member::add))
        .route(
            "/{id}/members/{user_id}",
            patch(member::update).delete(member::remove),
        )
        .route(
            "/{id}/episodes",
            get(episode::list_by_project).post(episode::create),
        )
        .route("/{id}/shots", get(shot::list_by_project))
        .route(
            "/{id}/assets",
            get(asset::list_by_project).post(asset::create),
        )
        .route(
            "/{id}/versions",
            get(version::list_by_project).post(version::create),
        )
        .route(
            "/{id}/playlists",
            get(playlist::list_by_project).post(playlist::create),
        )
        .route("/{id}/notes", get(note::list_by_project).post(note::create))
}
