//! Repository for the `understandings` table.

use peel_core::types::DbId;
use sqlx::PgPool;

use crate::models::understanding::{CreateUnderstanding, Understanding};

/// Column list for `understandings` queries.
const COLUMNS: &str = "\
    id, dataset_id, model_id, name, description, enabled, created_at, updated_at";

/// Provides access to dataset/model pairings.
pub struct UnderstandingRepo;

impl UnderstandingRepo {
    /// Pair a dataset with a model.
    pub async fn create(
        pool: &PgPool,
        input: &CreateUnderstanding,
    ) -> Result<Understanding, sqlx::Error> {
        let query = format!(
            "INSERT INTO understandings (dataset_id, model_id, name, description) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Understanding>(&query)
            .bind(input.dataset_id)
            .bind(input.model_id)
            .bind(&input.name)
            .bind(input.description.as_deref())
            .fetch_one(pool)
            .await
    }

    /// Find an understanding by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Understanding>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM understandings WHERE id = $1");
        sqlx::query_as::<_, Understanding>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
