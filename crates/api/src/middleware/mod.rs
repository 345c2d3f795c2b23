//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the global `admin` role.
//! - [`rbac::RequireProjectCreator`] -- Requires `admin` or `producer`.
//! - [`project_access::verify_project_access`] -- Per-project role check.

pub mod auth;
pub mod project_access;
pub mod rbac;
