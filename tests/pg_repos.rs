//! Runs the Postgres repositories against a throwaway database per test.
//! Needs `DATABASE_URL` pointing at a Postgres server the tests may create
//! databases on; run with `cargo test --test pg_repos -- --ignored`.

use std::time::Duration;

use hirescribe::{
    auth::claims::Role,
    jobs::{
        repo::{JobDescriptionRepository, PgJobDescriptionRepository},
        repo_types::{GeneratedContent, JobFilter, JobUpdate, NewJobDescription, RecordKind},
    },
    users::{
        repo::{CreateUserError, PgUserRepository, UserRepository},
        repo_types::NewUser,
    },
};
use sqlx::PgPool;
use uuid::Uuid;

async fn user(repo: &PgUserRepository, email: &str) -> Uuid {
    repo.create(NewUser {
        name: "Test".into(),
        email: email.into(),
        password_hash: "$argon2id$stub".into(),
        role: Role::User,
    })
    .await
    .unwrap()
    .id
}

fn posting(title: &str, kind: RecordKind) -> NewJobDescription {
    NewJobDescription {
        job_title: title.into(),
        tech_stack: vec!["Rust".into(), "SQL".into()],
        experience_level: "Senior".into(),
        work_mode: "Remote".into(),
        about_company: Some("We hire.".into()),
        generated_content: GeneratedContent {
            about_us: "About \"us\" {raw}".into(),
            responsibilities: vec!["Ship".into()],
            required_skills: vec!["Rust".into()],
            benefits: vec![],
        },
        kind,
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn duplicate_email_is_email_taken(pool: PgPool) {
    let users = PgUserRepository::new(pool);
    user(&users, "a@x.io").await;

    let err = users
        .create(NewUser {
            name: "Other".into(),
            email: "a@x.io".into(),
            password_hash: "$argon2id$other".into(),
            role: Role::Admin,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CreateUserError::EmailTaken));
    assert_eq!(users.list().await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn credentials_lookup_is_the_only_one_with_a_hash(pool: PgPool) {
    let users = PgUserRepository::new(pool);
    let id = user(&users, "a@x.io").await;

    let creds = users.find_credentials_by_email("a@x.io").await.unwrap().unwrap();
    assert_eq!(creds.user.id, id);
    assert_eq!(creds.password_hash, "$argon2id$stub");

    let found = users.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(found.email, "a@x.io");
    assert!(found.is_active);
    assert_eq!(found.role, Role::User);
    assert!(users.find_by_email("b@x.io").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn foreign_owner_sees_nothing(pool: PgPool) {
    let users = PgUserRepository::new(pool.clone());
    let jobs = PgJobDescriptionRepository::new(pool);
    let alice = user(&users, "a@x.io").await;
    let bob = user(&users, "b@x.io").await;

    let record = jobs.create(alice, posting("Owned", RecordKind::Draft)).await.unwrap();

    assert!(jobs.find_owned(bob, record.id).await.unwrap().is_none());
    assert!(jobs.list_by_owner(bob, JobFilter::Drafts).await.unwrap().is_empty());
    let hijack = JobUpdate {
        job_title: Some("Hijacked".into()),
        ..Default::default()
    };
    assert!(jobs.update_owned(bob, record.id, hijack).await.unwrap().is_none());
    assert!(!jobs.delete_owned(bob, record.id).await.unwrap());

    let still = jobs.find_owned(alice, record.id).await.unwrap().unwrap();
    assert_eq!(still.job_title, "Owned");
    assert_eq!(still.generated_content, record.generated_content);

    assert!(jobs.delete_owned(alice, record.id).await.unwrap());
    assert!(jobs.find_owned(alice, record.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn update_applies_partial_changes_and_skips_competitors(pool: PgPool) {
    let users = PgUserRepository::new(pool.clone());
    let jobs = PgJobDescriptionRepository::new(pool);
    let owner = user(&users, "a@x.io").await;

    let draft = jobs.create(owner, posting("Draft", RecordKind::Draft)).await.unwrap();
    let updated = jobs
        .update_owned(
            owner,
            draft.id,
            JobUpdate {
                work_mode: Some("Hybrid".into()),
                about_company: Some(None),
                is_draft: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.work_mode, "Hybrid");
    assert_eq!(updated.job_title, "Draft");
    assert_eq!(updated.tech_stack, draft.tech_stack);
    assert_eq!(updated.about_company, None);
    assert_eq!(updated.kind(), RecordKind::Final);

    let competitor = jobs
        .create(owner, posting("Rival", RecordKind::Competitor))
        .await
        .unwrap();
    let attempt = JobUpdate {
        is_draft: Some(true),
        ..Default::default()
    };
    assert!(jobs.update_owned(owner, competitor.id, attempt).await.unwrap().is_none());
    let unchanged = jobs.find_owned(owner, competitor.id).await.unwrap().unwrap();
    assert_eq!(unchanged.kind(), RecordKind::Competitor);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn listings_filter_by_kind_newest_first(pool: PgPool) {
    let users = PgUserRepository::new(pool.clone());
    let jobs = PgJobDescriptionRepository::new(pool);
    let owner = user(&users, "a@x.io").await;

    for (title, kind) in [
        ("First", RecordKind::Draft),
        ("Rival", RecordKind::Competitor),
        ("Done", RecordKind::Final),
        ("Second", RecordKind::Draft),
    ] {
        jobs.create(owner, posting(title, kind)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let drafts: Vec<String> = jobs
        .list_by_owner(owner, JobFilter::Drafts)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.job_title)
        .collect();
    assert_eq!(drafts, vec!["Second", "First"]);

    let competitors = jobs.list_by_owner(owner, JobFilter::Competitors).await.unwrap();
    assert_eq!(competitors.len(), 1);
    assert_eq!(competitors[0].job_title, "Rival");
    assert!(!competitors[0].is_draft);
}
