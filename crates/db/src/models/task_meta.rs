//! Task status records written by the worker pool.

use peel_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `task_meta` table. Read-only from this service's
/// point of view, apart from the `PENDING` seed written on publish.
#[derive(Debug, Clone, FromRow)]
pub struct TaskMeta {
    pub id: DbId,
    pub task_id: String,
    pub status: String,
    /// Encoded result object; present once the task succeeded.
    pub result: Option<Vec<u8>>,
    pub traceback: Option<String>,
    pub name: Option<String>,
    pub queue: Option<String>,
    pub date_done: Option<Timestamp>,
}
