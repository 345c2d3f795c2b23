//! Route definitions for the `/media` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::media;
use crate::state::AppState;

/// Routes mounted at `/media`. Public; the query string carries the
/// signature.
///
/// ```text
/// GET /{bucket}/{*key}?expires=&signature=  -> serve
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{bucket}/{*key}", get(media::serve))
}
