//! Route definitions for the `/versions` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{thumbnail, version};
use crate::state::AppState;

/// Routes mounted at `/versions`.
///
/// ```text
/// GET    /by-entity/{entity_type}/{entity_code}  -> list_by_entity
/// GET    /{id}                                   -> get_by_id
/// PATCH  /{id}                                   -> update
/// DELETE /{id}                                   -> delete
/// PUT    /{id}/thumbnail                         -> upload_version
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/by-entity/{entity_type}/{entity_code}",
            get(version::list_by_entity),
        )
        .route(
            "/{id}",
            get(version::get_by_id)
                .patch(version::update)
                .delete(version::delete),
        )
        .route("/{id}/thumbnail", put(thumbnail::upload_version))
}
