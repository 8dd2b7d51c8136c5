use crate::domain::repository::IdempotencyRepository;
use crate::error::DispatchServiceError;

// ── ClaimKey ─────────────────────────────────────────────────────────────────

pub struct ClaimKeyUseCase<R: IdempotencyRepository> {
    pub repo: R,
}

impl<R: IdempotencyRepository> ClaimKeyUseCase<R> {
    /// Returns `true` when this call created the claim. "Already claimed" is
    /// a normal `false` result, never an error.
    pub async fn execute(&self, key: &str) -> Result<bool, DispatchServiceError> {
        if key.trim().is_empty() {
            return Err(DispatchServiceError::MissingData);
        }
        self.repo.claim(key).await
    }
}

// ── ReleaseKey ───────────────────────────────────────────────────────────────

pub struct ReleaseKeyUseCase<R: IdempotencyRepository> {
    pub repo: R,
}

impl<R: IdempotencyRepository> ReleaseKeyUseCase<R> {
    /// Deletes the claim so a retry can reclaim it. Releasing a key that was
    /// never claimed succeeds silently.
    pub async fn execute(&self, key: &str) -> Result<(), DispatchServiceError> {
        if key.trim().is_empty() {
            return Err(DispatchServiceError::MissingData);
        }
        self.repo.release(key).await?;
        Ok(())
    }
}
