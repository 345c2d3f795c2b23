//! Route definitions for the `/episodes` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{episode, sequence, thumbnail};
use crate::state::AppState;

/// Routes mounted at `/episodes`.
///
/// ```text
/// GET    /{id}             -> get_by_id
/// PATCH  /{id}             -> update
/// DELETE /{id}             -> delete
/// PUT    /{id}/thumbnail   -> upload_episode
/// GET    /{id}/sequences   -> sequence::list_by_episode
/// POST   /{id}/sequences   -> sequence::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(episode::get_by_id)
                .patch(episode::update)
                .delete(episode::delete),
        )
        .route("/{id}/thumbnail", put(thumbnail::upload_episode))
        .route(
            "/{id}/sequences",
            get(sequence::list_by_episode).post(sequence::create),
        )
}
