//! Route definitions for the `/assets` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{asset, thumbnail};
use crate::state::AppState;

/// Routes mounted at `/assets`.
///
/// ```text
/// GET    /{id}             -> get_by_id
/// PATCH  /{id}             -> update
/// DELETE /{id}             -> delete
/// PUT    /{id}/thumbnail   -> upload_asset
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(asset::get_by_id)
                .patch(asset::update)
                .delete(asset::delete),
        )
        .route("/{id}/thumbnail", put(thumbnail::upload_asset))
}
