//! Status tracker: maps the worker-owned status record of an
//! explanation's task onto [`ExplanationState`]. Read-only.

use peel_core::task::ExplanationState;
use peel_db::models::explanation::Explanation;
use peel_db::repositories::TaskMetaRepo;
use sqlx::PgPool;

/// Errors from reading task status.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// The explanation has a handle but the status store has no record of
    /// it, e.g. the record expired or was never written.
    #[error("No status record for task {0}")]
    TaskNotFound(String),

    #[error("Status store error: {0}")]
    Store(#[from] sqlx::Error),
}

/// Snapshot of an explanation's task as seen by one poll.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedTask {
    pub state: ExplanationState,
    pub task_id: Option<String>,
    /// Encoded result, set by the worker on success.
    pub result: Option<Vec<u8>>,
    /// Error trace, set by the worker on failure.
    pub traceback: Option<String>,
}

impl TrackedTask {
    fn not_dispatched() -> Self {
        Self {
            state: ExplanationState::NotDispatched,
            task_id: None,
            result: None,
            traceback: None,
        }
    }
}

/// Reads task status for explanations.
pub struct StatusTracker {
    pool: PgPool,
}

impl StatusTracker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Current lifecycle state of `explanation`'s most recent task.
    ///
    /// Polling is idempotent; repeated calls without a worker-side
    /// transition return the same state.
    pub async fn current_state(&self, explanation: &Explanation) -> Result<TrackedTask, TrackerError> {
        let Some(task_id) = explanation.task_id.as_deref().filter(|t| !t.is_empty()) else {
            return Ok(TrackedTask::not_dispatched());
        };

        let meta = TaskMetaRepo::find_by_task_id(&self.pool, task_id)
            .await?
            .ok_or_else(|| TrackerError::TaskNotFound(task_id.to_string()))?;

        let state = ExplanationState::from_status_tag(&meta.status);
        tracing::debug!(
            explanation_id = explanation.id,
            task_id,
            status = %meta.status,
            state = %state,
            "Polled task status",
        );

        Ok(TrackedTask {
            state,
            task_id: Some(meta.task_id),
            result: meta.result,
            traceback: meta.traceback,
        })
    }
}
