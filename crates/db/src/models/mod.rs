//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` + `Validate` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//! - Where the entity is listable, a `Deserialize` filter struct read from
//!   the query string

use validator::ValidationError;

pub mod asset;
pub mod audit;
pub mod episode;
pub mod note;
pub mod playlist;
pub mod project;
pub mod project_member;
pub mod role;
pub mod sequence;
pub mod session;
pub mod shot;
pub mod status;
pub mod user;
pub mod version;

/// Rows that carry a stored thumbnail and expose a signed URL for it.
pub trait HasThumbnail {
    fn thumbnail_path(&self) -> Option<&str>;
    fn set_thumbnail_url(&mut self, url: Option<String>);
}

macro_rules! impl_has_thumbnail {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl HasThumbnail for $ty {
                fn thumbnail_path(&self) -> Option<&str> {
                    self.thumbnail_path.as_deref()
                }

                fn set_thumbnail_url(&mut self, url: Option<String>) {
                    self.thumbnail_url = url;
                }
            }
        )+
    };
}

impl_has_thumbnail!(
    project::Project,
    episode::Episode,
    sequence::Sequence,
    shot::Shot,
    asset::Asset,
    version::Version,
);

/// `validator` adapter for entity codes.
pub(crate) fn validate_code(code: &str) -> Result<(), ValidationError> {
    dailies_core::codes::validate_code(code).map_err(|e| {
        let mut err = ValidationError::new("code");
        err.message = Some(e.to_string().into());
        err
    })
}

/// `validator` adapter for `#RRGGBB` colors.
pub(crate) fn validate_color(color: &str) -> Result<(), ValidationError> {
    dailies_core::status::validate_color(color).map_err(|e| {
        let mut err = ValidationError::new("color");
        err.message = Some(e.to_string().into());
        err
    })
}
