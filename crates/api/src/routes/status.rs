//! Route definitions for the `/statuses` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::status;
use crate::state::AppState;

/// Routes mounted at `/statuses`.
///
/// Reads need any authenticated user; writes need `admin`.
///
/// ```text
/// GET    /       -> list
/// POST   /       -> create
/// GET    /{id}   -> get_by_id
/// PATCH  /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(status::list).post(status::create))
        .route(
            "/{id}",
            get(status::get_by_id)
                .patch(status::update)
                .delete(status::delete),
        )
}
