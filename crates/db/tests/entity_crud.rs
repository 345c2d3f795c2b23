use dailies_core::access::ProjectRole;
use dailies_core::codes::EntityType;
use dailies_db::filter::Page;
use dailies_db::models::episode::{CreateEpisode, EpisodeFilter};
use dailies_db::models::playlist::{CreatePlaylist, UpdatePlaylist};
use dailies_db::models::project::{CreateProject, ProjectFilter, UpdateProject};
use dailies_db::models::sequence::CreateSequence;
use dailies_db::models::shot::{CreateShot, ShotFilter, UpdateShot};
use dailies_db::models::user::CreateUser;
use dailies_db::models::version::NewVersion;
use dailies_db::repositories::{
    EntityLookup, EpisodeRepo, PlaylistRepo, ProjectMemberRepo, ProjectRepo, SequenceRepo,
    ShotRepo, UserRepo, VersionRepo,
};
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

fn new_project(code: &str) -> CreateProject {
    CreateProject {
        code: code.to_string(),
        name: format!("Project {code}"),
        description: Some("desc".to_string()),
        status_id: None,
        start_date: None,
        end_date: None,
    }
}

fn new_shot(code: &str) -> CreateShot {
    CreateShot {
        code: code.to_string(),
        name: code.to_string(),
        description: None,
        status_id: None,
        cut_in: Some(1001),
        cut_out: Some(1100),
        assigned_to: None,
    }
}

/// Build project → episode → sequence and return their ids.
async fn seed_hierarchy(pool: &PgPool, user: i64, prefix: &str) -> (i64, i64, i64) {
    let project = ProjectRepo::create(pool, &new_project(prefix), user).await.unwrap();
    let episode = EpisodeRepo::create(
        pool,
        project.id,
        &CreateEpisode {
            code: format!("{prefix}_EP01"),
            name: "Episode 1".into(),
            description: None,
            status_id: None,
        },
        user,
    )
    .await
    .unwrap();
    let sequence = SequenceRepo::create(
        pool,
        project.id,
        episode.id,
        &CreateSequence {
            code: format!("{prefix}_SQ010"),
            name: "Sequence 10".into(),
            description: None,
            status_id: None,
        },
        user,
    )
    .await
    .unwrap();
    (project.id, episode.id, sequence.id)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_creator_becomes_manager(pool: PgPool) {
    let user = seed_user(&pool, "lead@studio.test").await;
    let project = ProjectRepo::create(&pool, &new_project("ALPHA"), user).await.unwrap();

    assert_eq!(project.created_by, Some(user));
    assert_eq!(
        ProjectMemberRepo::role_of(&pool, project.id, user).await.unwrap(),
        Some(ProjectRole::Manager)
    );
    assert_eq!(ProjectMemberRepo::count_managers(&pool, project.id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_code_hits_named_unique_constraint(pool: PgPool) {
    let user = seed_user(&pool, "lead@studio.test").await;
    ProjectRepo::create(&pool, &new_project("ALPHA"), user).await.unwrap();

    let err = ProjectRepo::create(&pool, &new_project("ALPHA"), user)
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_projects_code"));
    assert!(ProjectRepo::code_exists(&pool, "ALPHA").await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_clears_nullable_fields_only_when_sent(pool: PgPool) {
    let user = seed_user(&pool, "lead@studio.test").await;
    let project = ProjectRepo::create(&pool, &new_project("ALPHA"), user).await.unwrap();

    let renamed = ProjectRepo::update(
        &pool,
        project.id,
        &UpdateProject {
            name: Some("Renamed".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(renamed.name, "Renamed");
    assert_eq!(renamed.description.as_deref(), Some("desc"));

    let cleared = ProjectRepo::update(
        &pool,
        project.id,
        &UpdateProject {
            description: Some(None),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(cleared.name, "Renamed");
    assert_eq!(cleared.description, None);

    assert!(ProjectRepo::update(&pool, 999_999, &UpdateProject::default())
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_shot_update_and_assignment(pool: PgPool) {
    let user = seed_user(&pool, "lead@studio.test").await;
    let artist = seed_user(&pool, "artist@studio.test").await;
    let (project_id, _, sequence) = seed_hierarchy(&pool, user, "ALPHA").await;

    let shot = ShotRepo::create(&pool, project_id, sequence, &new_shot("SH010"), user)
        .await
        .unwrap();
    assert_eq!(shot.frame_count(), Some(100));

    let assigned = ShotRepo::update(
        &pool,
        shot.id,
        &UpdateShot {
            assigned_to: Some(Some(artist)),
            cut_out: Some(None),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(assigned.assigned_to, Some(artist));
    assert_eq!(assigned.cut_in, Some(1001));
    assert_eq!(assigned.cut_out, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_search_and_paginates(pool: PgPool) {
    let user = seed_user(&pool, "lead@studio.test").await;
    let (project_id, _, sequence) = seed_hierarchy(&pool, user, "ALPHA").await;
    for code in ["SH010", "SH020", "SH030", "FX100"] {
        ShotRepo::create(&pool, project_id, sequence, &new_shot(code), user)
            .await
            .unwrap();
    }

    let page = Page::from_params(Some(2), Some(0), Some("code"), Some("asc")).unwrap();
    let (rows, total) = ShotRepo::list_by_sequence(&pool, sequence, &ShotFilter::default(), &page)
        .await
        .unwrap();
    assert_eq!(total, 4);
    let codes: Vec<_> = rows.iter().map(|s| s.code.as_str()).collect();
    assert_eq!(codes, ["FX100", "SH010"]);

    let filter = ShotFilter {
        search: Some("sh0".into()),
        ..Default::default()
    };
    let page = Page::from_params(None, Some(1), Some("code"), Some("desc")).unwrap();
    let (rows, total) = ShotRepo::list_by_project(&pool, project_id, &filter, &page)
        .await
        .unwrap();
    assert_eq!(total, 3);
    let codes: Vec<_> = rows.iter().map(|s| s.code.as_str()).collect();
    assert_eq!(codes, ["SH020", "SH010"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_list_is_scoped_to_membership(pool: PgPool) {
    let alice = seed_user(&pool, "alice@studio.test").await;
    let bob = seed_user(&pool, "bob@studio.test").await;
    ProjectRepo::create(&pool, &new_project("ALPHA"), alice).await.unwrap();
    ProjectRepo::create(&pool, &new_project("BETA"), bob).await.unwrap();

    let page = Page::default();
    let (all, total) = ProjectRepo::list(&pool, &ProjectFilter::default(), None, &page)
        .await
        .unwrap();
    assert_eq!((all.len(), total), (2, 2));

    let (mine, total) = ProjectRepo::list(&pool, &ProjectFilter::default(), Some(alice), &page)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(mine[0].code, "ALPHA");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_version_numbering_and_code_lookup(pool: PgPool) {
    let user = seed_user(&pool, "lead@studio.test").await;
    let (project_id, _, sequence) = seed_hierarchy(&pool, user, "ALPHA").await;
    ShotRepo::create(&pool, project_id, sequence, &new_shot("SH010"), user)
        .await
        .unwrap();

    for _ in 0..3 {
        let n = VersionRepo::next_version_number(&pool, EntityType::Shot, "SH010")
            .await
            .unwrap();
        let code = dailies_core::codes::version_code("SH010", n);
        VersionRepo::create(
            &pool,
            &NewVersion {
                project_id,
                name: code.clone(),
                code,
                entity_type: EntityType::Shot,
                entity_code: "SH010".into(),
                version_number: n,
                description: None,
                file_path: None,
                status_id: None,
                created_by: Some(user),
            },
        )
        .await
        .unwrap();
    }

    let versions = VersionRepo::list_by_entity(&pool, EntityType::Shot, "SH010")
        .await
        .unwrap();
    let numbers: Vec<_> = versions.iter().map(|v| v.version_number).collect();
    assert_eq!(numbers, [3, 2, 1]);

    let wanted = vec![
        "SH010_v003".to_string(),
        "missing".to_string(),
        "SH010_v001".to_string(),
    ];
    let found = VersionRepo::find_by_codes(&pool, &wanted).await.unwrap();
    let codes: Vec<_> = found.iter().map(|v| v.code.as_str()).collect();
    assert_eq!(codes, ["SH010_v003", "SH010_v001"]);

    assert_eq!(
        EntityLookup::project_id_for_code(&pool, EntityType::Shot, "SH010")
            .await
            .unwrap(),
        Some(project_id)
    );
    assert_eq!(
        EntityLookup::project_id_for_code(&pool, EntityType::Project, "ALPHA")
            .await
            .unwrap(),
        Some(project_id)
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_cascades_down_the_hierarchy(pool: PgPool) {
    let user = seed_user(&pool, "lead@studio.test").await;
    let (project_id, episode, sequence) = seed_hierarchy(&pool, user, "ALPHA").await;
    let shot = ShotRepo::create(&pool, project_id, sequence, &new_shot("SH010"), user)
        .await
        .unwrap();

    assert!(EpisodeRepo::delete(&pool, episode).await.unwrap());
    assert!(SequenceRepo::find_by_id(&pool, sequence).await.unwrap().is_none());
    assert!(ShotRepo::find_by_id(&pool, shot.id).await.unwrap().is_none());
    assert!(!EpisodeRepo::delete(&pool, episode).await.unwrap());

    let (episodes, _) =
        EpisodeRepo::list_by_project(&pool, project_id, &EpisodeFilter::default(), &Page::default())
            .await
            .unwrap();
    assert!(episodes.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_playlist_update_writes_fields_and_codes_together(pool: PgPool) {
    let user = seed_user(&pool, "lead@studio.test").await;
    let project = ProjectRepo::create(&pool, &new_project("ALPHA"), user).await.unwrap();
    let codes = vec!["SH010_v001".to_string(), "SH010_v002".to_string()];
    let playlist = PlaylistRepo::create(
        &pool,
        project.id,
        &CreatePlaylist {
            code: "DAILIES_0301".into(),
            name: "Dailies".into(),
            description: None,
            version_codes: codes.clone(),
        },
        &codes,
        user,
    )
    .await
    .unwrap();

    let input = UpdatePlaylist {
        name: Some("Client review".into()),
        description: Some(Some("Final pass".into())),
        version_codes: None,
    };
    let reordered = vec!["SH010_v002".to_string()];
    let updated = PlaylistRepo::update(&pool, playlist.id, &input, Some(&reordered))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Client review");
    assert_eq!(updated.description.as_deref(), Some("Final pass"));
    assert_eq!(updated.version_codes, reordered);

    // Without codes the list is left alone.
    let renamed = PlaylistRepo::update(
        &pool,
        playlist.id,
        &UpdatePlaylist {
            name: Some("Renamed".into()),
            ..Default::default()
        },
        None,
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(renamed.name, "Renamed");
    assert_eq!(renamed.description.as_deref(), Some("Final pass"));
    assert_eq!(renamed.version_codes, reordered);

    assert!(PlaylistRepo::update(&pool, 0, &input, None).await.unwrap().is_none());
}
