use uuid::Uuid;

use parkverse_domain::job::{JobStatus, JobTransition};

use crate::domain::repository::JobRepository;
use crate::domain::types::{Job, JobUpdate};
use crate::error::DispatchServiceError;

// ── GetJob ───────────────────────────────────────────────────────────────────

pub struct GetJobUseCase<R: JobRepository> {
    pub repo: R,
}

impl<R: JobRepository> GetJobUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<Job, DispatchServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DispatchServiceError::JobNotFound)
    }
}

// ── UpdateJob ────────────────────────────────────────────────────────────────

pub struct UpdateJobInput {
    pub status: JobStatus,
    pub result: Option<serde_json::Value>,
    pub error_code: Option<String>,
    pub error_msg: Option<String>,
}

pub struct UpdateJobUseCase<R: JobRepository> {
    pub repo: R,
}

impl<R: JobRepository> UpdateJobUseCase<R> {
    pub async fn execute(&self, id: Uuid, input: UpdateJobInput) -> Result<(), DispatchServiceError> {
        let job = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(DispatchServiceError::JobNotFound)?;

        let update = validate_update(input)?;

        match job.status.transition(update.status()) {
            JobTransition::Noop => Ok(()),
            JobTransition::Reject => Err(DispatchServiceError::JobTransitionConflict),
            JobTransition::Apply => {
                // Guarded on the status we just read; losing the race to a
                // concurrent updater surfaces as the same conflict.
                let applied = self.repo.apply_update(id, job.status, &update).await?;
                if applied {
                    Ok(())
                } else {
                    Err(DispatchServiceError::JobTransitionConflict)
                }
            }
        }
    }
}

/// Enforce the error-field invariant: `failed` requires both fields, every
/// other status clears them.
fn validate_update(input: UpdateJobInput) -> Result<JobUpdate, DispatchServiceError> {
    match input.status {
        JobStatus::Queued => Err(DispatchServiceError::JobTransitionConflict),
        JobStatus::Processing => Ok(JobUpdate::Processing),
        JobStatus::Succeeded => Ok(JobUpdate::Succeeded {
            result: input.result,
        }),
        JobStatus::Timeout => Ok(JobUpdate::Timeout),
        JobStatus::Failed => {
            let error_code = input.error_code.ok_or(DispatchServiceError::MissingData)?;
            let error_msg = input.error_msg.ok_or(DispatchServiceError::MissingData)?;
            Ok(JobUpdate::Failed {
                error_code,
                error_msg,
            })
        }
    }
}
