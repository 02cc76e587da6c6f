//! Repository for the `datasets` table.

use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::dataset::{CreateDataset, Dataset};

/// Column list for `datasets` queries.
const COLUMNS: &str = "\
    id, name, description, enabled, uri, features, target, task_type, \
    data_format, estimated_rows, estimated_size_mb, created_at, updated_at";

/// Provides access to registered datasets.
pub struct DatasetRepo;

impl DatasetRepo {
    /// Register a dataset with its ordered feature list.
    pub async fn create(pool: &PgPool, input: &CreateDataset) -> Result<Dataset, sqlx::Error> {
        let query = format!(
            "INSERT INTO datasets (name, description, uri, features, target, task_type, data_format) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Dataset>(&query)
            .bind(&input.name)
            .bind(input.description.as_deref())
            .bind(&input.uri)
            .bind(Json(&input.features))
            .bind(&input.target)
            .bind(&input.task_type)
            .bind(input.data_format.as_deref())
            .fetch_one(pool)
            .await
    }
}
