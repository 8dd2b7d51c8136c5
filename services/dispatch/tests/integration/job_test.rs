use uuid::Uuid;

use parkverse_dispatch::error::DispatchServiceError;
use parkverse_dispatch::usecase::job::{GetJobUseCase, UpdateJobInput, UpdateJobUseCase};
use parkverse_domain::job::JobStatus;

use crate::helpers::{MockJobRepo, test_job};

fn update(status: JobStatus) -> UpdateJobInput {
    UpdateJobInput {
        status,
        result: None,
        error_code: None,
        error_msg: None,
    }
}

#[tokio::test]
async fn get_unknown_job_is_not_found() {
    let uc = GetJobUseCase {
        repo: MockJobRepo::empty(),
    };
    let result = uc.execute(Uuid::new_v4()).await;
    assert!(matches!(result, Err(DispatchServiceError::JobNotFound)));
}

#[tokio::test]
async fn update_unknown_job_is_not_found() {
    let uc = UpdateJobUseCase {
        repo: MockJobRepo::empty(),
    };
    let result = uc
        .execute(Uuid::new_v4(), update(JobStatus::Processing))
        .await;
    assert!(matches!(result, Err(DispatchServiceError::JobNotFound)));
}

#[tokio::test]
async fn queued_job_moves_to_processing_and_counts_the_attempt() {
    let job = test_job(JobStatus::Queued);
    let id = job.id;
    let repo = MockJobRepo::with_job(job);
    let jobs = repo.jobs_handle();

    let uc = UpdateJobUseCase { repo };
    uc.execute(id, update(JobStatus::Processing)).await.unwrap();

    let stored = jobs.lock().unwrap().get(&id).cloned().unwrap();
    assert_eq!(stored.status, JobStatus::Processing);
    assert_eq!(stored.attempts, 1);
    assert!(stored.started_at.is_some(), "started_at must be stamped");
}

#[tokio::test]
async fn succeeded_job_stores_result_and_clears_errors() {
    let job = test_job(JobStatus::Processing);
    let id = job.id;
    let repo = MockJobRepo::with_job(job);
    let jobs = repo.jobs_handle();

    let uc = UpdateJobUseCase { repo };
    uc.execute(
        id,
        UpdateJobInput {
            status: JobStatus::Succeeded,
            result: Some(serde_json::json!({"delivered_channels": 2})),
            error_code: None,
            error_msg: None,
        },
    )
    .await
    .unwrap();

    let stored = jobs.lock().unwrap().get(&id).cloned().unwrap();
    assert_eq!(stored.status, JobStatus::Succeeded);
    assert_eq!(
        stored.result,
        Some(serde_json::json!({"delivered_channels": 2}))
    );
    assert!(stored.error_code.is_none());
    assert!(stored.error_msg.is_none());
    assert!(stored.finished_at.is_some());
}

#[tokio::test]
async fn failed_job_requires_and_stores_both_error_fields() {
    let job = test_job(JobStatus::Processing);
    let id = job.id;
    let repo = MockJobRepo::with_job(job);
    let jobs = repo.jobs_handle();

    let uc = UpdateJobUseCase { repo };

    let result = uc
        .execute(
            id,
            UpdateJobInput {
                status: JobStatus::Failed,
                result: None,
                error_code: Some("E_DM_CLOSED".to_owned()),
                error_msg: None,
            },
        )
        .await;
    assert!(matches!(result, Err(DispatchServiceError::MissingData)));
    assert_eq!(
        jobs.lock().unwrap().get(&id).unwrap().status,
        JobStatus::Processing,
        "a rejected update must not mutate stored state"
    );

    uc.execute(
        id,
        UpdateJobInput {
            status: JobStatus::Failed,
            result: None,
            error_code: Some("E_DM_CLOSED".to_owned()),
            error_msg: Some("user has DMs disabled".to_owned()),
        },
    )
    .await
    .unwrap();

    let stored = jobs.lock().unwrap().get(&id).cloned().unwrap();
    assert_eq!(stored.status, JobStatus::Failed);
    assert_eq!(stored.error_code.as_deref(), Some("E_DM_CLOSED"));
    assert_eq!(stored.error_msg.as_deref(), Some("user has DMs disabled"));
}

#[tokio::test]
async fn timeout_clears_error_fields() {
    let job = test_job(JobStatus::Processing);
    let id = job.id;
    let repo = MockJobRepo::with_job(job);
    let jobs = repo.jobs_handle();

    let uc = UpdateJobUseCase { repo };
    uc.execute(
        id,
        UpdateJobInput {
            status: JobStatus::Timeout,
            result: None,
            error_code: Some("stale".to_owned()),
            error_msg: Some("stale".to_owned()),
        },
    )
    .await
    .unwrap();

    let stored = jobs.lock().unwrap().get(&id).cloned().unwrap();
    assert_eq!(stored.status, JobStatus::Timeout);
    assert!(stored.error_code.is_none());
    assert!(stored.error_msg.is_none());
}

#[tokio::test]
async fn terminal_outcome_reported_again_is_a_noop() {
    let mut job = test_job(JobStatus::Succeeded);
    job.finished_at = Some(chrono::Utc::now());
    let id = job.id;
    let repo = MockJobRepo::with_job(job);
    let jobs = repo.jobs_handle();

    let uc = UpdateJobUseCase { repo };
    uc.execute(id, update(JobStatus::Succeeded)).await.unwrap();

    let stored = jobs.lock().unwrap().get(&id).cloned().unwrap();
    assert_eq!(stored.status, JobStatus::Succeeded);
    assert_eq!(stored.attempts, 1, "a no-op must not count an attempt");
}

#[tokio::test]
async fn terminal_job_rejects_a_different_status() {
    for (from, to) in [
        (JobStatus::Succeeded, JobStatus::Failed),
        (JobStatus::Failed, JobStatus::Processing),
        (JobStatus::Timeout, JobStatus::Succeeded),
    ] {
        let job = test_job(from);
        let id = job.id;
        let uc = UpdateJobUseCase {
            repo: MockJobRepo::with_job(job),
        };
        let mut input = update(to);
        if to == JobStatus::Failed {
            input.error_code = Some("E".to_owned());
            input.error_msg = Some("e".to_owned());
        }
        let result = uc.execute(id, input).await;
        assert!(
            matches!(result, Err(DispatchServiceError::JobTransitionConflict)),
            "expected {from:?} -> {to:?} to be rejected, got {result:?}"
        );
    }
}

#[tokio::test]
async fn nothing_moves_back_to_queued() {
    let job = test_job(JobStatus::Processing);
    let id = job.id;
    let uc = UpdateJobUseCase {
        repo: MockJobRepo::with_job(job),
    };
    let result = uc.execute(id, update(JobStatus::Queued)).await;
    assert!(matches!(
        result,
        Err(DispatchServiceError::JobTransitionConflict)
    ));
}

#[tokio::test]
async fn losing_the_guarded_update_race_is_a_conflict() {
    let job = test_job(JobStatus::Queued);
    let id = job.id;
    let mut repo = MockJobRepo::with_job(job);
    repo.lose_update_race = true;

    let uc = UpdateJobUseCase { repo };
    let result = uc.execute(id, update(JobStatus::Processing)).await;
    assert!(matches!(
        result,
        Err(DispatchServiceError::JobTransitionConflict)
    ));
}

#[tokio::test]
async fn get_returns_status_and_error_fields() {
    let mut job = test_job(JobStatus::Failed);
    job.error_code = Some("E_DM_CLOSED".to_owned());
    job.error_msg = Some("user has DMs disabled".to_owned());
    let id = job.id;

    let uc = GetJobUseCase {
        repo: MockJobRepo::with_job(job),
    };
    let fetched = uc.execute(id).await.unwrap();
    assert_eq!(fetched.status, JobStatus::Failed);
    assert_eq!(fetched.error_code.as_deref(), Some("E_DM_CLOSED"));
    assert_eq!(fetched.error_msg.as_deref(), Some("user has DMs disabled"));
}
