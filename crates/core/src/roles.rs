//! Well-known global role name constants.
//!
//! These must match the seed data in `20260301000002_create_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_PRODUCER: &str = "producer";
pub const ROLE_ARTIST: &str = "artist";

/// Role id of `artist`, the default for newly created users.
pub const DEFAULT_ROLE_ID: i64 = 3;

/// Whether a global role may create new projects.
pub fn can_create_projects(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_PRODUCER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admin_and_producer_create_projects() {
        assert!(can_create_projects(ROLE_ADMIN));
        assert!(can_create_projects(ROLE_PRODUCER));
        assert!(!can_create_projects(ROLE_ARTIST));
        assert!(!can_create_projects("guest"));
    }
}
