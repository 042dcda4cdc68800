//! Runs against a real database only when `DATABASE_URL` is set; otherwise
//! every test returns early.

use recruitment_portal::{
    database::{
        pool::create_pool, PgStore, Store, DUPLICATE_APPLICATION, JOB_HAS_CANDIDATES,
        JOB_NOT_ACCEPTING, JOB_NOT_FOUND,
    },
    error::Error,
    models::{
        candidate::{Candidate, CandidateStatus},
        job::{Job, JobFields, JobStatus},
    },
    utils::time::now,
};
use uuid::Uuid;

async fn pg_store() -> Option<PgStore> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) if !url.trim().is_empty() => url,
        _ => {
            eprintln!("DATABASE_URL not set; skipping Postgres store test");
            return None;
        }
    };
    let pool = create_pool(&url, 2).await.expect("connect to DATABASE_URL");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("apply migrations");
    Some(PgStore::new(pool))
}

fn fields(title: &str) -> JobFields {
    JobFields {
        job_title: title.to_string(),
        department: "Engineering".to_string(),
        skills: vec!["Go".to_string(), "SQL".to_string()],
        experience: "2-4 years".to_string(),
        salary: "$70k-$90k".to_string(),
        location: "Remote".to_string(),
    }
}

fn candidate_for(job_id: Uuid, email: &str) -> Candidate {
    let at = now();
    Candidate {
        id: Uuid::new_v4(),
        job_id,
        name: "Asha Rao".to_string(),
        email: email.to_string(),
        phone: "555-010-0100".to_string(),
        resume_filename: "resume.pdf".to_string(),
        resume_content_type: "application/pdf".to_string(),
        resume_size: 2048,
        status: CandidateStatus::Applied,
        applied_at: at,
        updated_at: at,
    }
}

async fn open_job(store: &PgStore) -> Job {
    let job = Job::new(fields("Backend Engineer"), now());
    store.insert_job(&job).await.expect("insert job");
    job
}

#[tokio::test]
async fn records_round_trip_unchanged() {
    let Some(store) = pg_store().await else { return };
    let job = open_job(&store).await;
    assert_eq!(store.get_job(job.id).await.unwrap(), Some(job.clone()));

    let candidate = candidate_for(job.id, "asha@example.com");
    store.insert_candidate(&candidate).await.unwrap();
    assert_eq!(
        store.get_candidate(candidate.id).await.unwrap(),
        Some(candidate.clone())
    );
    assert_eq!(store.list_candidates(Some(job.id)).await.unwrap(), vec![candidate]);
}

#[tokio::test]
async fn candidate_for_missing_job_is_not_found() {
    let Some(store) = pg_store().await else { return };
    let err = store
        .insert_candidate(&candidate_for(Uuid::new_v4(), "asha@example.com"))
        .await
        .unwrap_err();
    match err {
        Error::NotFound(msg) => assert_eq!(msg, JOB_NOT_FOUND),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let Some(store) = pg_store().await else { return };
    let job = open_job(&store).await;
    store
        .insert_candidate(&candidate_for(job.id, "asha@example.com"))
        .await
        .unwrap();

    let err = store
        .insert_candidate(&candidate_for(job.id, "ASHA@example.com"))
        .await
        .unwrap_err();
    match err {
        Error::Conflict(msg) => assert_eq!(msg, DUPLICATE_APPLICATION),
        other => panic!("expected Conflict, got {:?}", other),
    }
    assert_eq!(store.list_candidates(Some(job.id)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn referenced_job_cannot_be_deleted() {
    let Some(store) = pg_store().await else { return };
    let job = open_job(&store).await;
    store
        .insert_candidate(&candidate_for(job.id, "asha@example.com"))
        .await
        .unwrap();

    let err = store.delete_job(job.id).await.unwrap_err();
    match err {
        Error::Conflict(msg) => assert_eq!(msg, JOB_HAS_CANDIDATES),
        other => panic!("expected Conflict, got {:?}", other),
    }
    assert!(store.get_job(job.id).await.unwrap().is_some());

    let err = store.delete_job(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn closed_job_refuses_candidates() {
    let Some(store) = pg_store().await else { return };
    let job = open_job(&store).await;
    store
        .update_job(job.id, &fields("Backend Engineer"), Some(JobStatus::Closed), now())
        .await
        .unwrap()
        .expect("job exists");

    let err = store
        .insert_candidate(&candidate_for(job.id, "asha@example.com"))
        .await
        .unwrap_err();
    match err {
        Error::Conflict(msg) => assert_eq!(msg, JOB_NOT_ACCEPTING),
        other => panic!("expected Conflict, got {:?}", other),
    }
    assert!(store.list_candidates(Some(job.id)).await.unwrap().is_empty());
}
