//! Route definitions for the `/playlists` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::playlist;
use crate::state::AppState;

/// Routes mounted at `/playlists`.
///
/// ```text
/// GET    /{id}            -> get_by_id
/// PATCH  /{id}            -> update
/// DELETE /{id}            -> delete
/// GET    /{id}/versions   -> list_versions
/// POST   /{id}/versions   -> add_versions
/// DELETE /{id}/versions   -> remove_versions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(playlist::get_by_id)
                .patch(playlist::update)
                .delete(playlist::delete),
        )
        .route(
            "/{id}/versions",
            get(playlist::list_versions)
                .post(playlist::add_versions)
                .delete(playlist::remove_versions),
        )
}
