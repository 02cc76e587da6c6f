//! Understanding entity: one dataset paired with one model.

use peel_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `understandings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Understanding {
    pub id: DbId,
    pub dataset_id: DbId,
    pub model_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for pairing a dataset with a model.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUnderstanding {
    pub dataset_id: DbId,
    pub model_id: DbId,
    pub name: String,
    pub description: Option<String>,
}
