pub mod admin;
pub mod asset;
pub mod auth;
pub mod episode;
pub mod health;
pub mod media;
pub mod note;
pub mod playlist;
pub mod project;
pub mod sequence;
pub mod shot;
pub mod status;
pub mod version;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout
/// /auth/me                                         current user
/// /auth/password                                   change password (PUT)
///
/// /admin/users                                     list, create (admin only)
/// /admin/users/{id}                                get, update, delete
/// /admin/users/{id}/reset-password                 reset password (POST)
/// /admin/audit-logs                                query audit log
///
/// /statuses                                        list, create (admin)
/// /statuses/{id}                                   get, update, delete (admin)
///
/// /projects                                        list, create (producer/admin)
/// /projects/{id}                                   get, update, delete
/// /projects/{id}/thumbnail                         upload thumbnail (PUT)
/// /projects/{id}/members                           list, add
/// /projects/{id}/members/{user_id}                 change role, remove
/// /projects/{id}/episodes                          list, create
/// /projects/{id}/shots                             list all shots of the project
/// /projects/{id}/assets                            list, create
/// /projects/{id}/versions                          list, publish
/// /projects/{id}/playlists                         list, create
/// /projects/{id}/notes                             list, create
///
/// /episodes/{id}                                   get, update, delete
/// /episodes/{id}/thumbnail                         upload thumbnail (PUT)
/// /episodes/{id}/sequences                         list, create
///
/// /sequences/{id}                                  get, update, delete
/// /sequences/{id}/thumbnail                        upload thumbnail (PUT)
/// /sequences/{id}/shots                            list, create
///
/// /shots/{id}                                      get, update, delete
/// /shots/{id}/thumbnail                            upload thumbnail (PUT)
///
/// /assets/{id}                                     get, update, delete
/// /assets/{id}/thumbnail                           upload thumbnail (PUT)
///
/// /versions/by-entity/{entity_type}/{entity_code}  versions of one entity
/// /versions/{id}                                   get, update, delete
/// /versions/{id}/thumbnail                         upload thumbnail (PUT)
///
/// /playlists/{id}                                  get, update, delete
/// /playlists/{id}/versions                         list, add, remove versions
///
/// /notes/{id}                                      get, update, delete
///
/// /media/{bucket}/{*key}                           signed thumbnail download
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (login, refresh, logout, me, password).
        .nest("/auth", auth::router())
        // Admin routes (user management, audit log).
        .nest("/admin", admin::router())
        // Global status lookup.
        .nest("/statuses", status::router())
        // Projects and their scoped collections.
        .nest("/projects", project::router())
        // Hierarchy below projects.
        .nest("/episodes", episode::router())
        .nest("/sequences", sequence::router())
        .nest("/shots", shot::router())
        .nest("/assets", asset::router())
        // Review: versions, playlists, notes.
        .nest("/versions", version::router())
        .nest("/playlists", playlist::router())
        .nest("/notes", note::router())
        // Signed thumbnail downloads from the local store.
        .nest("/media", media::router())
}
