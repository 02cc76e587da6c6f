//! The message-queue seam used by the dispatcher.

use async_trait::async_trait;
use peel_core::resolver::InvocationPayload;
use peel_core::task::TaskHandle;

/// Errors from publishing a task message.
#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    /// The broker could not be reached or refused the message.
    #[error("Broker unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for BrokerError {
    fn from(err: sqlx::Error) -> Self {
        BrokerError::Unavailable(err.to_string())
    }
}

/// Publishes invocation payloads to the worker queue.
///
/// Implementations must return once the message is accepted, without
/// waiting for a worker to pick it up.
#[async_trait]
pub trait TaskBroker: Send + Sync {
    /// Publish `payload` for the worker task named `routing_key` and
    /// return the handle assigned to the new task.
    async fn submit(
        &self,
        routing_key: &'static str,
        payload: &InvocationPayload,
    ) -> Result<TaskHandle, BrokerError>;
}
