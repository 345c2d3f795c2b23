//! Request handlers.
//!
//! Each submodule provides async handler functions (create, list, get_by_id,
//! update, delete) for a single resource. Handlers validate input, resolve
//! the owning project, check the caller's project role, make one repository
//! call and wrap the result in the response envelope. Errors map to
//! [`AppError`](crate::error::AppError).

pub mod admin;
pub mod asset;
pub mod auth;
pub mod episode;
pub mod media;
pub mod member;
pub mod note;
pub mod playlist;
pub mod project;
pub mod sequence;
pub mod shot;
pub mod status;
pub mod thumbnail;
pub mod version;

mod support;
