//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod asset_repo;
pub mod audit_repo;
pub mod entity_lookup;
pub mod episode_repo;
pub mod note_repo;
pub mod playlist_repo;
pub mod project_member_repo;
pub mod project_repo;
pub mod role_repo;
pub mod sequence_repo;
pub mod session_repo;
pub mod shot_repo;
pub mod status_repo;
pub mod user_repo;
pub mod version_repo;

pub use asset_repo::AssetRepo;
pub use audit_repo::AuditLogRepo;
pub use entity_lookup::EntityLookup;
pub use episode_repo::EpisodeRepo;
pub use note_repo::NoteRepo;
pub use playlist_repo::PlaylistRepo;
pub use project_member_repo::ProjectMemberRepo;
pub use project_repo::ProjectRepo;
pub use role_repo::RoleRepo;
pub use sequence_repo::SequenceRepo;
pub use session_repo::SessionRepo;
pub use shot_repo::ShotRepo;
pub use status_repo::StatusRepo;
pub use user_repo::UserRepo;
pub use version_repo::VersionRepo;
