//! Serves thumbnails behind HMAC-signed links minted by the local store.
//!
//! No bearer token is needed: the `expires`/`signature` query pair is the
//! credential, so the links work in `<img>` tags.

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use dailies_core::storage::{verify_signature, StoragePath};
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::{AppPath, AppQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignedParams {
    pub expires: i64,
    pub signature: String,
}

/// GET /api/v1/media/{bucket}/{*key}?expires=&signature=
pub async fn serve(
    State(state): State<AppState>,
    AppPath((bucket, key)): AppPath<(String, String)>,
    AppQuery(params): AppQuery<SignedParams>,
) -> AppResult<Response> {
    let path = StoragePath::new(bucket, key)?;
    verify_signature(
        &state.config.storage.signing_secret,
        &path,
        params.expires,
        &params.signature,
        chrono::Utc::now().timestamp(),
    )?;

    let object = state.storage.get(&path).await?;
    let max_age = (params.expires - chrono::Utc::now().timestamp()).max(0);
    Ok((
        [
            (header::CONTENT_TYPE, object.content_type),
            (header::CACHE_CONTROL, format!("private, max-age={max_age}")),
        ],
        Body::from(object.bytes),
    )
        .into_response())
}
