use std::sync::Arc;

use peel_tasks::TaskBroker;

use crate::engine::materializer::ResultMaterializer;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool. Also the explanation and task status store.
    pub pool: peel_db::DbPool,
    /// Publisher for the explanation worker queue.
    pub broker: Arc<dyn TaskBroker>,
    /// Turns finished tasks into raw or image payloads.
    pub materializer: Arc<ResultMaterializer>,
}
