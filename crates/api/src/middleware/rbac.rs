//! Global role extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose global role
//! does not meet the requirement. Project-level roles are checked separately
//! by [`super::project_access`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use dailies_core::error::CoreError;
use dailies_core::roles::can_create_projects;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires `admin` or `producer`, the roles allowed to start new projects.
pub struct RequireProjectCreator(pub AuthUser);

impl FromRequestParts<AppState> for RequireProjectCreator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !can_create_projects(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Producer or Admin role required".into(),
            )));
        }
        Ok(RequireProjectCreator(user))
    }
}
