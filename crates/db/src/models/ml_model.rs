//! Trained model entity.

use peel_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `models` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MlModel {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub uri: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a model.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMlModel {
    pub name: String,
    pub description: Option<String>,
    pub uri: String,
}
