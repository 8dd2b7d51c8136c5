use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use parkverse_dispatch::domain::repository::{
    DeliveryLogRepository, DispatchRepository, IdempotencyRepository, JobRepository,
    NotificationEventRepository, PreferenceRepository,
};
use parkverse_dispatch::domain::types::{
    DeliveryAttempt, DispatchStaged, Job, JobUpdate, NewNotificationEvent, NotificationEvent,
    PreferenceRow, PublishSpec,
};
use parkverse_dispatch::error::DispatchServiceError;
use parkverse_domain::job::JobStatus;
use parkverse_domain::notification::{Channel, DeliveryStatus, EventType};
use parkverse_domain::pagination::Page;

// ── MockIdempotencyRepo ──────────────────────────────────────────────────────

pub struct MockIdempotencyRepo {
    pub claims: Arc<Mutex<HashSet<String>>>,
}

impl MockIdempotencyRepo {
    pub fn empty() -> Self {
        Self {
            claims: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Shared handle for post-execution inspection.
    pub fn claims_handle(&self) -> Arc<Mutex<HashSet<String>>> {
        Arc::clone(&self.claims)
    }
}

impl IdempotencyRepository for MockIdempotencyRepo {
    async fn claim(&self, key: &str) -> Result<bool, DispatchServiceError> {
        Ok(self.claims.lock().unwrap().insert(key.to_owned()))
    }

    async fn release(&self, key: &str) -> Result<bool, DispatchServiceError> {
        Ok(self.claims.lock().unwrap().remove(key))
    }
}

// ── MockJobRepo ──────────────────────────────────────────────────────────────

pub struct MockJobRepo {
    pub jobs: Arc<Mutex<HashMap<Uuid, Job>>>,
    /// Simulate losing the guarded-update race: every apply reports 0 rows.
    pub lose_update_race: bool,
}

impl MockJobRepo {
    pub fn with_job(job: Job) -> Self {
        let mut jobs = HashMap::new();
        jobs.insert(job.id, job);
        Self {
            jobs: Arc::new(Mutex::new(jobs)),
            lose_update_race: false,
        }
    }

    pub fn empty() -> Self {
        Self {
            jobs: Arc::new(Mutex::new(HashMap::new())),
            lose_update_race: false,
        }
    }

    pub fn jobs_handle(&self) -> Arc<Mutex<HashMap<Uuid, Job>>> {
        Arc::clone(&self.jobs)
    }
}

pub fn test_job(status: JobStatus) -> Job {
    Job {
        id: Uuid::new_v4(),
        action: "api.notification.delivery".to_owned(),
        status,
        attempts: if status == JobStatus::Queued { 0 } else { 1 },
        result: None,
        error_code: None,
        error_msg: None,
        created_at: Utc::now(),
        started_at: None,
        finished_at: None,
    }
}

impl JobRepository for MockJobRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Job>, DispatchServiceError> {
        Ok(self.jobs.lock().unwrap().get(&id).cloned())
    }

    async fn apply_update(
        &self,
        id: Uuid,
        expected: JobStatus,
        update: &JobUpdate,
    ) -> Result<bool, DispatchServiceError> {
        if self.lose_update_race {
            return Ok(false);
        }
        let mut jobs = self.jobs.lock().unwrap();
        let Some(job) = jobs.get_mut(&id) else {
            return Ok(false);
        };
        if job.status != expected {
            return Ok(false);
        }
        let now = Utc::now();
        match update {
            JobUpdate::Processing => {
                job.status = JobStatus::Processing;
                job.attempts += 1;
                job.started_at = job.started_at.or(Some(now));
                job.result = None;
                job.error_code = None;
                job.error_msg = None;
            }
            JobUpdate::Succeeded { result } => {
                job.status = JobStatus::Succeeded;
                job.finished_at = Some(now);
                job.result = result.clone();
                job.error_code = None;
                job.error_msg = None;
            }
            JobUpdate::Failed {
                error_code,
                error_msg,
            } => {
                job.status = JobStatus::Failed;
                job.finished_at = Some(now);
                job.result = None;
                job.error_code = Some(error_code.clone());
                job.error_msg = Some(error_msg.clone());
            }
            JobUpdate::Timeout => {
                job.status = JobStatus::Timeout;
                job.finished_at = Some(now);
                job.result = None;
                job.error_code = None;
                job.error_msg = None;
            }
        }
        Ok(true)
    }
}

// ── MockEventRepo ────────────────────────────────────────────────────────────

pub struct MockEventRepo {
    pub events: Arc<Mutex<Vec<NotificationEvent>>>,
}

impl MockEventRepo {
    pub fn new(events: Vec<NotificationEvent>) -> Self {
        Self {
            events: Arc::new(Mutex::new(events)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn events_handle(&self) -> Arc<Mutex<Vec<NotificationEvent>>> {
        Arc::clone(&self.events)
    }
}

pub fn test_event(id: i64, user_id: i64) -> NotificationEvent {
    NotificationEvent {
        id,
        user_id,
        event_type: EventType::XpGain,
        title: "XP gained".to_owned(),
        body: "You gained 50 XP".to_owned(),
        discord_message: None,
        metadata: None,
        // Spread creation times so ordering assertions are deterministic.
        created_at: Utc::now() + chrono::Duration::seconds(id),
        read_at: None,
        dismissed_at: None,
    }
}

impl NotificationEventRepository for MockEventRepo {
    async fn find_by_id(&self, id: i64) -> Result<Option<NotificationEvent>, DispatchServiceError> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        unread_only: bool,
        page: Page,
    ) -> Result<Vec<NotificationEvent>, DispatchServiceError> {
        let mut events: Vec<NotificationEvent> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id && e.dismissed_at.is_none())
            .filter(|e| !unread_only || e.read_at.is_none())
            .cloned()
            .collect();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(events
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn unread_count(&self, user_id: i64) -> Result<u64, DispatchServiceError> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id && e.read_at.is_none() && e.dismissed_at.is_none())
            .count() as u64)
    }

    async fn mark_read(&self, event_id: i64) -> Result<bool, DispatchServiceError> {
        let mut events = self.events.lock().unwrap();
        match events.iter_mut().find(|e| e.id == event_id) {
            Some(event) => {
                event.read_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self, user_id: i64) -> Result<u64, DispatchServiceError> {
        let mut events = self.events.lock().unwrap();
        let mut marked = 0;
        for event in events
            .iter_mut()
            .filter(|e| e.user_id == user_id && e.read_at.is_none())
        {
            event.read_at = Some(Utc::now());
            marked += 1;
        }
        Ok(marked)
    }

    async fn dismiss(&self, event_id: i64) -> Result<bool, DispatchServiceError> {
        let mut events = self.events.lock().unwrap();
        match events.iter_mut().find(|e| e.id == event_id) {
            Some(event) => {
                event.dismissed_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ── MockDeliveryLogRepo ──────────────────────────────────────────────────────

pub struct MockDeliveryLogRepo {
    pub rows: Arc<Mutex<HashMap<(i64, Channel), DeliveryAttempt>>>,
}

impl MockDeliveryLogRepo {
    pub fn empty() -> Self {
        Self {
            rows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn rows_handle(&self) -> Arc<Mutex<HashMap<(i64, Channel), DeliveryAttempt>>> {
        Arc::clone(&self.rows)
    }
}

impl DeliveryLogRepository for MockDeliveryLogRepo {
    async fn record(
        &self,
        event_id: i64,
        channel: Channel,
        status: DeliveryStatus,
        error_message: Option<&str>,
    ) -> Result<(), DispatchServiceError> {
        let now = Utc::now();
        self.rows.lock().unwrap().insert(
            (event_id, channel),
            DeliveryAttempt {
                event_id,
                channel,
                status,
                attempted_at: now,
                delivered_at: (status == DeliveryStatus::Delivered).then_some(now),
                error_message: error_message.map(str::to_owned),
            },
        );
        Ok(())
    }

    async fn fetch_for_event(
        &self,
        event_id: i64,
    ) -> Result<Vec<DeliveryAttempt>, DispatchServiceError> {
        let mut attempts: Vec<DeliveryAttempt> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|a| a.event_id == event_id)
            .cloned()
            .collect();
        attempts.sort_by_key(|a| a.channel.as_str());
        Ok(attempts)
    }
}

// ── MockPreferenceRepo ───────────────────────────────────────────────────────

pub struct MockPreferenceRepo {
    pub rows: Arc<Mutex<Vec<PreferenceRow>>>,
    /// Fail the upsert for this `(event type, channel)` pair to test
    /// mid-batch aborts.
    pub fail_on: Option<(EventType, Channel)>,
}

impl MockPreferenceRepo {
    pub fn new(rows: Vec<PreferenceRow>) -> Self {
        Self {
            rows: Arc::new(Mutex::new(rows)),
            fail_on: None,
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn rows_handle(&self) -> Arc<Mutex<Vec<PreferenceRow>>> {
        Arc::clone(&self.rows)
    }
}

pub fn pref(user_id: i64, event_type: EventType, channel: Channel, enabled: bool) -> PreferenceRow {
    PreferenceRow {
        user_id,
        event_type,
        channel,
        enabled,
    }
}

impl PreferenceRepository for MockPreferenceRepo {
    async fn fetch_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<PreferenceRow>, DispatchServiceError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .copied()
            .collect())
    }

    async fn upsert(&self, row: &PreferenceRow) -> Result<(), DispatchServiceError> {
        if self.fail_on == Some((row.event_type, row.channel)) {
            return Err(DispatchServiceError::Internal(anyhow::anyhow!(
                "storage unavailable"
            )));
        }
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|r| {
            r.user_id == row.user_id && r.event_type == row.event_type && r.channel == row.channel
        }) {
            Some(existing) => existing.enabled = row.enabled,
            None => rows.push(*row),
        }
        Ok(())
    }
}

// ── MockDispatchRepo ─────────────────────────────────────────────────────────

/// One recorded staging transaction.
pub struct StagedDispatch {
    pub event_id: i64,
    pub event: NewNotificationEvent,
    pub publish: Option<PublishSpec>,
    /// Key attached to the staged broker message, when one was staged.
    pub message_key: Option<String>,
    pub job_id: Option<Uuid>,
}

pub struct MockDispatchRepo {
    pub claims: Arc<Mutex<HashSet<String>>>,
    pub staged: Arc<Mutex<Vec<StagedDispatch>>>,
}

impl MockDispatchRepo {
    pub fn empty() -> Self {
        Self {
            claims: Arc::new(Mutex::new(HashSet::new())),
            staged: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_claim(key: &str) -> Self {
        let repo = Self::empty();
        repo.claims.lock().unwrap().insert(key.to_owned());
        repo
    }

    pub fn staged_handle(&self) -> Arc<Mutex<Vec<StagedDispatch>>> {
        Arc::clone(&self.staged)
    }
}

impl DispatchRepository for MockDispatchRepo {
    async fn stage_dispatch(
        &self,
        claim_key: Option<&str>,
        event: &NewNotificationEvent,
        publish: Option<&PublishSpec>,
    ) -> Result<DispatchStaged, DispatchServiceError> {
        if let Some(key) = claim_key {
            if !self.claims.lock().unwrap().insert(key.to_owned()) {
                return Ok(DispatchStaged::Duplicate);
            }
        }

        let mut staged = self.staged.lock().unwrap();
        let event_id = staged.len() as i64 + 1;
        let job_id = publish.is_some().then(Uuid::new_v4);
        let message_key = publish.is_some().then(|| {
            claim_key
                .map(str::to_owned)
                .unwrap_or_else(|| format!("notification.delivery:{event_id}"))
        });
        staged.push(StagedDispatch {
            event_id,
            event: event.clone(),
            publish: publish.cloned(),
            message_key,
            job_id,
        });

        Ok(DispatchStaged::Created {
            event: NotificationEvent {
                id: event_id,
                user_id: event.user_id,
                event_type: event.event_type,
                title: event.title.clone(),
                body: event.body.clone(),
                discord_message: event.discord_message.clone(),
                metadata: event.metadata.clone(),
                created_at: Utc::now(),
                read_at: None,
                dismissed_at: None,
            },
            job_id,
        })
    }
}
