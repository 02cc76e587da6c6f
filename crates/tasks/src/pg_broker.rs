//! PostgreSQL-backed task publisher.
//!
//! A publish writes the message onto `task_messages` and seeds the
//! `task_meta` status row as `PENDING` in one transaction, so a task that
//! was accepted is always visible to the status poller as queued.

use async_trait::async_trait;
use peel_core::resolver::InvocationPayload;
use peel_core::task::{TaskHandle, STATUS_PENDING};
use sqlx::PgPool;

use crate::broker::{BrokerError, TaskBroker};

/// Default queue every task message is published to.
pub const DEFAULT_QUEUE: &str = "xai";

/// Publishes task messages into the queue tables of a PostgreSQL database.
#[derive(Clone)]
pub struct PgTaskBroker {
    pool: PgPool,
    queue: String,
}

impl PgTaskBroker {
    /// Create a publisher for `queue`.
    pub fn new(pool: PgPool, queue: impl Into<String>) -> Self {
        Self {
            pool,
            queue: queue.into(),
        }
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }
}

#[async_trait]
impl TaskBroker for PgTaskBroker {
    async fn submit(
        &self,
        routing_key: &'static str,
        payload: &InvocationPayload,
    ) -> Result<TaskHandle, BrokerError> {
        let handle = TaskHandle::generate();
        let kwargs = payload.worker_kwargs();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO task_messages (task_id, task_name, queue, kwargs) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(handle.as_str())
        .bind(routing_key)
        .bind(&self.queue)
        .bind(&kwargs)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO task_meta (task_id, status, name, queue) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(handle.as_str())
        .bind(STATUS_PENDING)
        .bind(routing_key)
        .bind(&self.queue)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            task_id = %handle,
            routing_key,
            queue = %self.queue,
            explanation_id = payload.explanation_id,
            "Task message published",
        );

        Ok(handle)
    }
}
