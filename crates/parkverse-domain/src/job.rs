//! Job lifecycle states and the transition relation.

use serde::{Deserialize, Serialize};

/// Status of a dispatched unit of asynchronous work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Processing,
    Succeeded,
    Failed,
    Timeout,
}

/// What a requested status change should do to the stored job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobTransition {
    /// Write the new status (and its side fields).
    Apply,
    /// Re-reported terminal outcome; succeed without touching the row.
    Noop,
    /// Regressive transition; reject and leave the row untouched.
    Reject,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Timeout => "timeout",
        }
    }

    pub fn from_str_name(s: &str) -> Option<Self> {
        match s {
            "queued" => Some(Self::Queued),
            "processing" => Some(Self::Processing),
            "succeeded" => Some(Self::Succeeded),
            "failed" => Some(Self::Failed),
            "timeout" => Some(Self::Timeout),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Timeout)
    }

    /// Decide what reporting `next` means for a job currently in `self`.
    ///
    /// Statuses only move forward: `queued` is never a target, a terminal
    /// outcome can be re-reported (at-least-once consumers) but never
    /// replaced, and `processing -> processing` is a fresh attempt.
    pub fn transition(self, next: JobStatus) -> JobTransition {
        match (self, next) {
            (_, JobStatus::Queued) => JobTransition::Reject,
            (JobStatus::Queued | JobStatus::Processing, _) => JobTransition::Apply,
            (current, next) if current == next => JobTransition::Noop,
            _ => JobTransition::Reject,
        }
    }
}
