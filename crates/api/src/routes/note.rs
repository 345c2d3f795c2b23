//! Route definitions for the `/notes` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::note;
use crate::state::AppState;

/// Routes mounted at `/notes`.
///
/// ```text
/// GET    /{id}   -> get_by_id
/// PATCH  /{id}   -> update (author or artist)
/// DELETE /{id}   -> delete (author or supervisor)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(note::get_by_id).patch(note::update).delete(note::delete),
    )
}
