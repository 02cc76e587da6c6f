//! Task handles and the explanation lifecycle state machine.
//!
//! The worker side owns the raw status tag of a task. This module maps
//! that tag into [`ExplanationState`] and the state into the status the
//! result endpoint reports while no result is available.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Task handle
// ---------------------------------------------------------------------------

/// Opaque identifier the queue assigns to a dispatched computation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskHandle(String);

impl TaskHandle {
    /// Generate a fresh random handle (UUID v4, hyphenated).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TaskHandle {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Raw status tags
// ---------------------------------------------------------------------------

/// Status tag written by the publisher when a task is enqueued.
pub const STATUS_PENDING: &str = "PENDING";

/// Status tag written by a worker when it picks a task up.
pub const STATUS_STARTED: &str = "STARTED";

/// Status tag written by a worker on success.
pub const STATUS_SUCCESS: &str = "SUCCESS";

/// Status tag written by a worker on failure.
pub const STATUS_FAILURE: &str = "FAILURE";

/// Tags treated as "waiting in the queue".
const QUEUED_TAGS: &[&str] = &["QUEUED", STATUS_PENDING, "RECEIVED"];

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Lifecycle state of an explanation as observed by the poller.
///
/// `NotDispatched -> Queued -> Started -> Succeeded | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExplanationState {
    /// No task handle stored, or the status tag was not recognised.
    NotDispatched,
    Queued,
    Started,
    Succeeded,
    Failed,
}

impl ExplanationState {
    /// Map a raw status tag. Matching is case-insensitive; unknown tags
    /// map to [`ExplanationState::NotDispatched`].
    pub fn from_status_tag(tag: &str) -> Self {
        let tag = tag.trim();
        if QUEUED_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            ExplanationState::Queued
        } else if tag.eq_ignore_ascii_case(STATUS_STARTED) {
            ExplanationState::Started
        } else if tag.eq_ignore_ascii_case(STATUS_SUCCESS) {
            ExplanationState::Succeeded
        } else if tag.eq_ignore_ascii_case(STATUS_FAILURE) {
            ExplanationState::Failed
        } else {
            ExplanationState::NotDispatched
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ExplanationState::NotDispatched => "NOT_DISPATCHED",
            ExplanationState::Queued => "QUEUED",
            ExplanationState::Started => "STARTED",
            ExplanationState::Succeeded => "SUCCEEDED",
            ExplanationState::Failed => "FAILED",
        }
    }

    /// Status to report when no result can be served.
    ///
    /// Returns `None` for [`ExplanationState::Succeeded`], the only state
    /// in which a result is materialized.
    pub const fn poll_status(self) -> Option<PollStatus> {
        match self {
            ExplanationState::NotDispatched => Some(PollStatus::NotProcessed),
            ExplanationState::Queued | ExplanationState::Started => Some(PollStatus::Processing),
            ExplanationState::Failed => Some(PollStatus::Failure),
            ExplanationState::Succeeded => None,
        }
    }
}

impl fmt::Display for ExplanationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status body returned by the result endpoint instead of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PollStatus {
    #[serde(rename = "PROCESSING")]
    Processing,
    #[serde(rename = "FAILURE")]
    Failure,
    #[serde(rename = "TASK_NOT_PROCESSED")]
    NotProcessed,
}

impl PollStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            PollStatus::Processing => "PROCESSING",
            PollStatus::Failure => "FAILURE",
            PollStatus::NotProcessed => "TASK_NOT_PROCESSED",
        }
    }

    /// Human-readable explanation shipped with the status.
    pub const fn message(self) -> &'static str {
        match self {
            PollStatus::Processing => "The task is being processed.",
            PollStatus::Failure => "The task was processed by the backend but failed.",
            PollStatus::NotProcessed => "The task has not been sent for processing yet.",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
