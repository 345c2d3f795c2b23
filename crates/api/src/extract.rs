//! Extractors whose rejections go through [`AppError`] so malformed
//! requests get the standard error envelope instead of axum's plain text.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use dailies_core::error::CoreError;
use dailies_core::types::DbId;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// A `Json<T>` wrapper that converts deserialization errors into 400s.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::Core(CoreError::Validation(e.body_text())))?;
        Ok(AppJson(value))
    }
}

/// [`AppJson`] followed by `validator` checks.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let AppJson(value) = AppJson::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// A `Query<T>` wrapper that converts parse errors into 400s.
pub struct AppQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| AppError::BadRequest(e.body_text()))?;
        Ok(AppQuery(value))
    }
}

fn path_rejection(e: PathRejection) -> AppError {
    AppError::BadRequest(e.body_text())
}

fn positive(id: DbId) -> Result<DbId, AppError> {
    if id <= 0 {
        return Err(AppError::BadRequest(format!(
            "Invalid id '{id}': must be a positive integer"
        )));
    }
    Ok(id)
}

/// A single positive numeric id from the path (`/shots/{id}`).
#[derive(Debug, Clone, Copy)]
pub struct PathId(pub DbId);

impl<S: Send + Sync> FromRequestParts<S> for PathId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<DbId>::from_request_parts(parts, state)
            .await
            .map_err(path_rejection)?;
        Ok(PathId(positive(id)?))
    }
}

/// Two positive numeric ids from the path (`/projects/{id}/members/{user_id}`).
#[derive(Debug, Clone, Copy)]
pub struct PathIds(pub DbId, pub DbId);

impl<S: Send + Sync> FromRequestParts<S> for PathIds {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((a, b)) = Path::<(DbId, DbId)>::from_request_parts(parts, state)
            .await
            .map_err(path_rejection)?;
        Ok(PathIds(positive(a)?, positive(b)?))
    }
}

/// Any other path parameters, with rejections mapped to 400.
pub struct AppPath<T>(pub T);

impl<S, T> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(path_rejection)?;
        Ok(AppPath(value))
    }
}
