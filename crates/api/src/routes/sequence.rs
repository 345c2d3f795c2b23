//! Route definitions for the `/sequences` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{sequence, shot, thumbnail};
use crate::state::AppState;

/// Routes mounted at `/sequences`.
///
/// ```text
/// GET    /{id}             -> get_by_id
/// PATCH  /{id}             -> update
/// DELETE /{id}             -> delete
/// PUT    /{id}/thumbnail   -> upload_sequence
/// GET    /{id}/shots       -> shot::list_by_sequence
/// POST   /{id}/shots       -> shot::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(sequence::get_by_id)
                .patch(sequence::update)
                .delete(sequence::delete),
        )
        .route("/{id}/thumbnail", put(thumbnail::upload_sequence))
        .route(
            "/{id}/shots",
            get(shot::list_by_sequence).post(shot::create),
        )
}
