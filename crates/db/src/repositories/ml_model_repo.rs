//! Repository for the `models` table.

use sqlx::PgPool;

use crate::models::ml_model::{CreateMlModel, MlModel};

/// Column list for `models` queries.
const COLUMNS: &str = "id, name, description, enabled, uri, created_at, updated_at";

/// Provides access to registered models.
pub struct MlModelRepo;

impl MlModelRepo {
    /// Register a trained model.
    pub async fn create(pool: &PgPool, input: &CreateMlModel) -> Result<MlModel, sqlx::Error> {
        let query = format!(
            "INSERT INTO models (name, description, uri) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MlModel>(&query)
            .bind(&input.name)
            .bind(input.description.as_deref())
            .bind(&input.uri)
            .fetch_one(pool)
            .await
    }
}
