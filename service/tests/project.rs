mod common;

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use common::{file, memory_db, seed_project, service, url, ScriptedStore};
use sd_dao::{
    collaborator::CollaboratorDao,
    collaborator_assignment::{AssignmentHolder, CollaboratorAssignmentDao},
    member::MemberDao,
    organization::OrganizationDao,
    project::{ProjectDao, ProjectKind, ProjectStatus},
    role::RoleDao,
    Db,
};
use sd_error::Error;
use sd_service::project::{NewProject, ProjectPatch, ProjectQuery};

fn images(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| url(name)).collect()
}

fn new_project(title: &str) -> NewProject {
    NewProject {
        title: title.to_owned(),
        brief_desc: "Brief".to_owned(),
        full_desc: "Full".to_owned(),
        date_launched: Utc::now(),
        status: ProjectStatus::Ongoing,
        kind: ProjectKind::CrossOrgs,
        featured: true,
        links: Vec::new(),
    }
}

#[tokio::test]
async fn update_replaces_dropped_image_with_upload() {
    let db = memory_db().await;
    let stored = images(&["a", "b", "c"]);
    let store = Arc::new(ScriptedStore::new(&[], &[]).with_objects(&stored));
    let project = seed_project(&db, "Website", &stored).await;

    let patch = ProjectPatch {
        images: Some(images(&["a", "b"])),
        ..Default::default()
    };
    let updated = service(&db, &store)
        .update(project.id(), &patch, &[file("d.png")])
        .await
        .unwrap();

    let expected = images(&["a", "b", "u-d.png"]);
    assert_eq!(updated.project().images(), &expected);
    assert!(updated.failed_uploads().is_empty());
    assert_eq!(store.delete_attempts(&url("c")), 1);
    assert!(!store.objects().contains(&url("c")));

    let reloaded = ProjectDao::db_select(&db, project.id()).await.unwrap().unwrap();
    assert_eq!(reloaded.images(), &expected);
}

#[tokio::test]
async fn unknown_image_reference_writes_nothing() {
    let db = memory_db().await;
    let stored = images(&["a", "b"]);
    let store = Arc::new(ScriptedStore::new(&[], &[]).with_objects(&stored));
    let project = seed_project(&db, "Website", &stored).await;

    let patch = ProjectPatch {
        title: Some("Renamed".to_owned()),
        images: Some(vec![url("a"), "https://elsewhere/x.png".to_owned()]),
        ..Default::default()
    };
    let err = service(&db, &store)
        .update(project.id(), &patch, &[file("d.png")])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert!(err.to_string().contains("https://elsewhere/x.png"));
    assert_eq!(store.upload_attempts("d.png"), 0);
    assert_eq!(store.delete_attempts(&url("b")), 0);

    let reloaded = ProjectDao::db_select(&db, project.id()).await.unwrap().unwrap();
    assert_eq!(reloaded.title(), "Website");
    assert_eq!(reloaded.images(), &stored);
}

#[tokio::test]
async fn failed_uploads_are_reported_without_failing_the_update() {
    let db = memory_db().await;
    let stored = images(&["a"]);
    let store = Arc::new(ScriptedStore::new(&["2.png", "4.png"], &[]).with_objects(&stored));
    let project = seed_project(&db, "Website", &stored).await;

    let files: Vec<_> = ["1.png", "2.png", "3.png", "4.png", "5.png"]
        .into_iter()
        .map(file)
        .collect();
    let updated = service(&db, &store)
        .update(project.id(), &ProjectPatch::default(), &files)
        .await
        .unwrap();

    assert_eq!(
        updated.project().images(),
        &images(&["a", "u-1.png", "u-3.png", "u-5.png"])
    );
    let failed: Vec<&str> = updated
        .failed_uploads()
        .iter()
        .map(|failed| failed.file_name())
        .collect();
    assert_eq!(failed, ["2.png", "4.png"]);
    assert_eq!(store.upload_attempts("2.png"), 4);
    assert_eq!(
        updated.failed_uploads()[0].reason(),
        "Upload 2.png failed after 3 retries. Please try again later."
    );
}

#[tokio::test]
async fn delete_failure_is_swallowed() {
    let db = memory_db().await;
    let stored = images(&["a", "b"]);
    let store = Arc::new(ScriptedStore::new(&[], &[url("b").as_str()]).with_objects(&stored));
    let project = seed_project(&db, "Website", &stored).await;

    let patch = ProjectPatch {
        images: Some(images(&["a"])),
        ..Default::default()
    };
    let updated = service(&db, &store)
        .update(project.id(), &patch, &[])
        .await
        .unwrap();

    assert_eq!(updated.project().images(), &images(&["a"]));
    assert_eq!(store.delete_attempts(&url("b")), 4);
}

#[tokio::test]
async fn repeating_an_update_is_idempotent() {
    let db = memory_db().await;
    let stored = images(&["a", "b", "c"]);
    let store = Arc::new(ScriptedStore::new(&[], &[]).with_objects(&stored));
    let project = seed_project(&db, "Website", &stored).await;
    let service = service(&db, &store);

    let patch = ProjectPatch {
        images: Some(images(&["c", "a"])),
        ..Default::default()
    };
    let first = service.update(project.id(), &patch, &[]).await.unwrap();
    let second = service.update(project.id(), &patch, &[]).await.unwrap();

    assert_eq!(first.project().images(), &images(&["c", "a"]));
    assert_eq!(second.project().images(), first.project().images());
    assert_eq!(store.delete_attempts(&url("b")), 1);

    let reloaded = ProjectDao::db_select(&db, project.id()).await.unwrap().unwrap();
    assert_eq!(reloaded.images(), &images(&["c", "a"]));
}

#[tokio::test]
async fn create_requires_files_and_stores_uploads() {
    let db = memory_db().await;
    let store = Arc::new(ScriptedStore::new(&[], &[]));
    let service = service(&db, &store);

    let err = service.create(&new_project("Empty"), &[]).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let created = service
        .create(&new_project("Portal"), &[file("cover.png"), file("shot.png")])
        .await
        .unwrap();
    assert_eq!(
        created.images(),
        &images(&["u-cover.png", "u-shot.png"])
    );

    let found = service.find_one(created.id()).await.unwrap();
    assert_eq!(found.project().title(), "Portal");
    assert!(found.collaborators().is_empty());
}

#[tokio::test]
async fn create_aborts_and_cleans_up_when_an_upload_fails() {
    let db = memory_db().await;
    let store = Arc::new(ScriptedStore::new(&["bad.png"], &[]));

    let err = service(&db, &store)
        .create(&new_project("Portal"), &[file("ok.png"), file("bad.png")])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ExternalService(_)));
    assert!(store.objects().is_empty());
    let page = service(&db, &store)
        .find_many(&ProjectQuery::default())
        .await
        .unwrap();
    assert_eq!(*page.total(), 0);
}

#[tokio::test]
async fn removed_projects_are_gone_from_reads() {
    let db = memory_db().await;
    let store = Arc::new(ScriptedStore::new(&[], &[]));
    let project = seed_project(&db, "Website", &images(&["a"])).await;
    let service = service(&db, &store);

    service.remove(project.id()).await.unwrap();

    assert!(matches!(
        service.remove(project.id()).await.unwrap_err(),
        Error::Conflict(_)
    ));
    assert!(matches!(
        service.find_one(project.id()).await.unwrap_err(),
        Error::NotFound(_)
    ));
    assert!(matches!(
        service
            .update(project.id(), &ProjectPatch::default(), &[])
            .await
            .unwrap_err(),
        Error::Conflict(_)
    ));
    assert!(matches!(
        service.remove(&uuid::Uuid::now_v7()).await.unwrap_err(),
        Error::NotFound(_)
    ));
    assert_eq!(store.delete_attempts(&url("a")), 0);
}

#[tokio::test]
async fn find_many_filters_sorts_and_pages() {
    let db = memory_db().await;
    let store = Arc::new(ScriptedStore::new(&[], &[]));
    let service = service(&db, &store);

    for title in ["one", "two", "three"] {
        service
            .create(&new_project(title), &[file(&format!("{title}.png"))])
            .await
            .unwrap();
    }
    seed_project(&db, "internal", &images(&["a"])).await;

    let query = ProjectQuery {
        kind: Some(ProjectKind::CrossOrgs),
        limit: 2,
        ..Default::default()
    };
    let page = service.find_many(&query).await.unwrap();
    assert_eq!(*page.total(), 3);
    assert_eq!(page.projects().len(), 2);

    let featured = ProjectQuery {
        featured_only: true,
        ascending: true,
        ..Default::default()
    };
    let page = service.find_many(&featured).await.unwrap();
    assert!(page.projects().iter().all(|project| *project.featured()));

    let out_of_bounds = ProjectQuery {
        limit: 101,
        ..Default::default()
    };
    assert!(matches!(
        service.find_many(&out_of_bounds).await.unwrap_err(),
        Error::Validation(_)
    ));
}

#[tokio::test]
async fn find_one_groups_collaborators_by_role() {
    let db = memory_db().await;
    let store = Arc::new(ScriptedStore::new(&[], &[]));
    let project = seed_project(&db, "Website", &images(&["a"])).await;

    let mentor = RoleDao::new("Mentor");
    let sponsor = RoleDao::new("Sponsor");
    mentor.db_insert(&db).await.unwrap();
    sponsor.db_insert(&db).await.unwrap();

    let ada = MemberDao::new("Ada", "ada@example.com", "https://cdn/ada.png");
    let grace = MemberDao::new("Grace", "grace@example.com", "https://cdn/grace.png");
    ada.db_insert(&db).await.unwrap();
    grace.db_insert(&db).await.unwrap();
    let acme = OrganizationDao::new("Acme", "Widgets", &Some("https://cdn/acme.png".to_owned()));
    acme.db_insert(&db).await.unwrap();

    let c1 = CollaboratorDao::new(project.id());
    let c2 = CollaboratorDao::new(project.id());
    c1.db_insert(&db).await.unwrap();
    c2.db_insert(&db).await.unwrap();

    for assignment in [
        CollaboratorAssignmentDao::new(c2.id(), sponsor.id(), &AssignmentHolder::Organization(*acme.id())),
        CollaboratorAssignmentDao::new(c1.id(), mentor.id(), &AssignmentHolder::Member(*ada.id())),
        CollaboratorAssignmentDao::new(c2.id(), mentor.id(), &AssignmentHolder::Member(*grace.id())),
    ] {
        assignment.db_insert(&db).await.unwrap();
    }

    let detail = service(&db, &store).find_one(project.id()).await.unwrap();
    let collaborators = detail.collaborators();

    let mut roles: Vec<&str> = collaborators.keys().map(String::as_str).collect();
    roles.sort();
    assert_eq!(roles, ["Mentor", "Sponsor"]);

    let mentors: Vec<&str> = collaborators["Mentor"]
        .members()
        .iter()
        .map(|member| member.name())
        .collect();
    assert_eq!(mentors, ["Ada", "Grace"]);
    assert!(collaborators["Mentor"].organizations().is_empty());
    assert_eq!(collaborators["Sponsor"].organizations()[0].name(), "Acme");
    assert!(collaborators["Sponsor"].members().is_empty());
}

#[tokio::test]
async fn uploads_append_to_images_written_while_uploading() {
    let db = memory_db().await;
    let stored = images(&["a", "b"]);
    let store = Arc::new(
        ScriptedStore::new(&[], &[])
            .with_objects(&stored)
            .with_upload_delay(Duration::from_millis(300)),
    );
    let project = seed_project(&db, "Website", &stored).await;
    let service = service(&db, &store);

    let empty_patch = ProjectPatch::default();
    let new_files = [file("d.png")];
    let slow_upload = service.update(project.id(), &empty_patch, &new_files);
    let rename = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let patch = ProjectPatch {
            title: Some("Renamed".to_owned()),
            images: Some(images(&["a"])),
            ..Default::default()
        };
        service.update(project.id(), &patch, &[]).await
    };
    let (uploaded, renamed) = tokio::join!(slow_upload, rename);

    let expected = images(&["a", "u-d.png"]);
    assert_eq!(renamed.unwrap().project().images(), &images(&["a"]));
    assert_eq!(uploaded.unwrap().project().images(), &expected);
    assert!(!store.objects().contains(&url("b")));

    let reloaded = ProjectDao::db_select(&db, project.id()).await.unwrap().unwrap();
    assert_eq!(reloaded.images(), &expected);
    assert_eq!(reloaded.title(), "Renamed");
}

#[tokio::test]
async fn assignment_without_holder_still_lists_its_role() {
    let db = memory_db().await;
    let store = Arc::new(ScriptedStore::new(&[], &[]));
    let project = seed_project(&db, "Website", &images(&["a"])).await;

    let mentor = RoleDao::new("Mentor");
    mentor.db_insert(&db).await.unwrap();
    let collaborator = CollaboratorDao::new(project.id());
    collaborator.db_insert(&db).await.unwrap();

    let Db::SqliteDb(sqlite) = db.as_ref() else {
        panic!("tests run on sqlite");
    };
    sqlite
        .execute(
            sqlx::query(
                "INSERT INTO \"collaborator_assignments\" (\"id\", \"collaborator_id\", \"role_id\", \"member_id\", \"organization_id\") VALUES (?, ?, ?, NULL, NULL)",
            )
            .bind(uuid::Uuid::now_v7())
            .bind(collaborator.id())
            .bind(mentor.id()),
        )
        .await
        .unwrap();

    let detail = service(&db, &store).find_one(project.id()).await.unwrap();
    let collaborators = detail.collaborators();

    assert_eq!(collaborators.len(), 1);
    assert!(collaborators["Mentor"].members().is_empty());
    assert!(collaborators["Mentor"].organizations().is_empty());
}
