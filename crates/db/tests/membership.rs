use assert_matches::assert_matches;
use dailies_core::access::ProjectRole;
use dailies_db::models::project::CreateProject;
use dailies_db::models::project_member::MembershipChange;
use dailies_db::models::user::CreateUser;
use dailies_db::repositories::{ProjectMemberRepo, ProjectRepo, UserRepo};
use sqlx::PgPool;

async fn seed_user(pool: &PgPool, email: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            display_name: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role_id: 3,
        },
    )
    .await
    .unwrap()
    .id
}

/// A project managed by two users. Returns `(project_id, first, second)`.
async fn two_manager_project(pool: &PgPool) -> (i64, i64, i64) {
    let first = seed_user(pool, "first@studio.test").await;
    let second = seed_user(pool, "second@studio.test").await;
    let project = ProjectRepo::create(
        pool,
        &CreateProject {
            code: "ALPHA".into(),
            name: "Alpha".into(),
            description: None,
            status_id: None,
            start_date: None,
            end_date: None,
        },
        first,
    )
    .await
    .unwrap();
    ProjectMemberRepo::upsert(pool, project.id, second, ProjectRole::Manager)
        .await
        .unwrap();
    (project.id, first, second)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_change_role_updates_and_removes(pool: PgPool) {
    let (project, first, second) = two_manager_project(&pool).await;

    let change = ProjectMemberRepo::change_role(&pool, project, second, Some(ProjectRole::Artist))
        .await
        .unwrap();
    assert_matches!(
        change,
        MembershipChange::Updated { previous: ProjectRole::Manager, ref member } if member.role == "artist"
    );

    let change = ProjectMemberRepo::change_role(&pool, project, second, None)
        .await
        .unwrap();
    assert_matches!(change, MembershipChange::Removed { previous: ProjectRole::Artist });
    assert_eq!(ProjectMemberRepo::role_of(&pool, project, second).await.unwrap(), None);

    let change = ProjectMemberRepo::change_role(&pool, project, second, None)
        .await
        .unwrap();
    assert_matches!(change, MembershipChange::NotMember);

    let change = ProjectMemberRepo::change_role(&pool, project, first, Some(ProjectRole::Viewer))
        .await
        .unwrap();
    assert_matches!(change, MembershipChange::LastManager);
    assert_eq!(
        ProjectMemberRepo::role_of(&pool, project, first).await.unwrap(),
        Some(ProjectRole::Manager)
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_demotions_keep_one_manager(pool: PgPool) {
    let (project, first, second) = two_manager_project(&pool).await;

    let (a, b) = tokio::join!(
        ProjectMemberRepo::change_role(&pool, project, first, Some(ProjectRole::Artist)),
        ProjectMemberRepo::change_role(&pool, project, second, None),
    );
    let outcomes = [a.unwrap(), b.unwrap()];

    let rejected = outcomes
        .iter()
        .filter(|c| matches!(c, MembershipChange::LastManager))
        .count();
    assert_eq!(rejected, 1);
    assert_eq!(ProjectMemberRepo::count_managers(&pool, project).await.unwrap(), 1);
}
