//! Route definitions for the `/shots` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{shot, thumbnail};
use crate::state::AppState;

/// Routes mounted at `/shots`.
///
/// ```text
/// GET    /{id}             -> get_by_id
/// PATCH  /{id}             -> update
/// DELETE /{id}             -> delete
/// PUT    /{id}/thumbnail   -> upload_shot
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(shot::get_by_id).patch(shot::update).delete(shot::delete),
        )
        .route("/{id}/thumbnail", put(thumbnail::upload_shot))
}
