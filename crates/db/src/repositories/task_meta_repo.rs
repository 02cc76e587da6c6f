//! Repository for the `task_meta` status store.
//!
//! Workers own every status transition after the initial `PENDING` seed;
//! this service only reads.

use sqlx::PgPool;

use crate::models::task_meta::TaskMeta;

/// Column list for `task_meta` queries.
const COLUMNS: &str = "id, task_id, status, result, traceback, name, queue, date_done";

/// Read access to task status records.
pub struct TaskMetaRepo;

impl TaskMetaRepo {
    /// Look up the status record for a task handle.
    pub async fn find_by_task_id(
        pool: &PgPool,
        task_id: &str,
    ) -> Result<Option<TaskMeta>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM task_meta WHERE task_id = $1");
        sqlx::query_as::<_, TaskMeta>(&query)
            .bind(task_id)
            .fetch_optional(pool)
            .await
    }
}
