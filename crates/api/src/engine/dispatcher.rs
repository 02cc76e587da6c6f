//! Task dispatcher.
//!
//! Publishes an [`InvocationPayload`] to the worker queue and stores the
//! returned handle on the explanation. The two steps do not share a
//! transaction: when the store fails after the broker accepted the message,
//! the task still runs but nothing points at it. That case is reported as
//! [`DispatchError::PersistFailure`] and logged with the orphaned handle.

use std::sync::Arc;

use peel_core::resolver::InvocationPayload;
use peel_core::task::TaskHandle;
use peel_core::types::DbId;
use peel_db::repositories::ExplanationRepo;
use peel_tasks::{BrokerError, TaskBroker};
use sqlx::PgPool;

/// Errors from dispatching an explanation task.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The broker did not accept the message. Nothing was enqueued.
    #[error("Failed to enqueue task: {0}")]
    BrokerUnavailable(#[from] BrokerError),

    /// The message was enqueued but its handle was not saved.
    #[error("Task {task_id} was enqueued but could not be stored on explanation {explanation_id}: {reason}")]
    PersistFailure {
        explanation_id: DbId,
        task_id: TaskHandle,
        reason: String,
    },
}

impl DispatchError {
    /// Stable error-kind code for API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::BrokerUnavailable(_) => "BROKER_UNAVAILABLE",
            DispatchError::PersistFailure { .. } => "PERSIST_FAILURE",
        }
    }
}

/// Hands resolved payloads to the worker queue.
pub struct TaskDispatcher {
    pool: PgPool,
    broker: Arc<dyn TaskBroker>,
}

impl TaskDispatcher {
    pub fn new(pool: PgPool, broker: Arc<dyn TaskBroker>) -> Self {
        Self { pool, broker }
    }

    /// Enqueue `payload` and record the new handle on its explanation,
    /// replacing any previous one. Returns as soon as the broker accepts
    /// the message.
    pub async fn dispatch(&self, payload: &InvocationPayload) -> Result<TaskHandle, DispatchError> {
        let handle = self
            .broker
            .submit(payload.routing_key, payload)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    explanation_id = payload.explanation_id,
                    routing_key = payload.routing_key,
                    error = %e,
                    "Broker rejected explanation task",
                );
            })?;

        let reason = match ExplanationRepo::set_task_id(
            &self.pool,
            payload.explanation_id,
            handle.as_str(),
        )
        .await
        {
            Ok(true) => {
                tracing::info!(
                    explanation_id = payload.explanation_id,
                    task_id = %handle,
                    algorithm = %payload.algorithm,
                    routing_key = payload.routing_key,
                    "Explanation task dispatched",
                );
                return Ok(handle);
            }
            Ok(false) => "explanation no longer exists".to_string(),
            Err(e) => e.to_string(),
        };

        tracing::error!(
            explanation_id = payload.explanation_id,
            task_id = %handle,
            routing_key = payload.routing_key,
            reason = %reason,
            "Task enqueued but handle not stored; task is orphaned",
        );
        Err(DispatchError::PersistFailure {
            explanation_id: payload.explanation_id,
            task_id: handle,
            reason,
        })
    }
}
