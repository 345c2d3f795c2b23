//! Repository for the `project_members` table.

use dailies_core::access::{check_manager_retained, ProjectRole};
use dailies_core::types::DbId;
use sqlx::PgPool;

use crate::models::project_member::{MembershipChange, ProjectMember, ProjectMemberDetail};

const COLUMNS: &str = "project_id, user_id, role, created_at, updated_at";

const COUNT_MANAGERS: &str =
    "SELECT COUNT(*)::BIGINT FROM project_members WHERE project_id = $1 AND role = 'manager'";

/// Per-project membership rows.
pub struct ProjectMemberRepo;

impl ProjectMemberRepo {
    pub async fn find(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<Option<ProjectMember>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_members WHERE project_id = $1 AND user_id = $2"
        );
        sqlx::query_as::<_, ProjectMember>(&query)
            .bind(project_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// The caller's role on a project, `None` when not a member.
    ///
    /// Unknown role strings cannot occur (check constraint) and read as
    /// no membership.
    pub async fn role_of(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<Option<ProjectRole>, sqlx::Error> {
        let role = sqlx::query_scalar::<_, String>(
            "SELECT role FROM project_members WHERE project_id = $1 AND user_id = $2",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(role.and_then(|r| ProjectRole::parse(&r).ok()))
    }

    /// Members of a project with their user details, managers first.
    pub async fn list(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectMemberDetail>, sqlx::Error> {
        sqlx::query_as::<_, ProjectMemberDetail>(
            "SELECT m.project_id, m.user_id, m.role, u.email, u.display_name,
                    m.created_at, m.updated_at
             FROM project_members m
             JOIN users u ON u.id = m.user_id
             WHERE m.project_id = $1
             ORDER BY CASE m.role
                        WHEN 'manager' THEN 0
                        WHEN 'supervisor' THEN 1
                        WHEN 'artist' THEN 2
                        ELSE 3
                      END,
                      u.display_name ASC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Add a member or change an existing member's role.
    pub async fn upsert(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
        role: ProjectRole,
    ) -> Result<ProjectMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_members (project_id, user_id, role)
             VALUES ($1, $2, $3)
             ON CONFLICT (project_id, user_id) DO UPDATE SET role = EXCLUDED.role
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectMember>(&query)
            .bind(project_id)
            .bind(user_id)
            .bind(role.as_str())
            .fetch_one(pool)
            .await
    }

    /// Change an existing member's role, or remove them when `next` is
    /// `None`, without ever leaving the project without a manager.
    ///
    /// Locks the project row first so concurrent changes on the same project
    /// recount managers one at a time.
    pub async fn change_role(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
        next: Option<ProjectRole>,
    ) -> Result<MembershipChange, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT id FROM projects WHERE id = $1 FOR UPDATE")
            .bind(project_id)
            .fetch_optional(&mut *tx)
            .await?;

        let role = sqlx::query_scalar::<_, String>(
            "SELECT role FROM project_members WHERE project_id = $1 AND user_id = $2",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(previous) = role.and_then(|r| ProjectRole::parse(&r).ok()) else {
            return Ok(MembershipChange::NotMember);
        };

        let managers = sqlx::query_scalar::<_, i64>(COUNT_MANAGERS)
            .bind(project_id)
            .fetch_one(&mut *tx)
            .await?;
        if check_manager_retained(previous, next, managers).is_err() {
            return Ok(MembershipChange::LastManager);
        }

        let change = match next {
            Some(role) => {
                let query = format!(
                    "UPDATE project_members SET role = $3
                     WHERE project_id = $1 AND user_id = $2
                     RETURNING {COLUMNS}"
                );
                let member = sqlx::query_as::<_, ProjectMember>(&query)
                    .bind(project_id)
                    .bind(user_id)
                    .bind(role.as_str())
                    .fetch_one(&mut *tx)
                    .await?;
                MembershipChange::Updated { previous, member }
            }
            None => {
                sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
                    .bind(project_id)
                    .bind(user_id)
                    .execute(&mut *tx)
                    .await?;
                MembershipChange::Removed { previous }
            }
        };

        tx.commit().await?;
        Ok(change)
    }

    pub async fn count_managers(pool: &PgPool, project_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(COUNT_MANAGERS)
            .bind(project_id)
            .fetch_one(pool)
            .await
    }
}
