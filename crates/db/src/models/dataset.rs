//! Registered dataset entity.

use peel_core::arguments::DatasetColumnTypes;
use peel_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `datasets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Dataset {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub uri: String,
    /// Ordered column list; decoded straight into the resolver's type.
    pub features: Json<DatasetColumnTypes>,
    pub target: String,
    pub task_type: String,
    pub data_format: Option<String>,
    pub estimated_rows: Option<i32>,
    pub estimated_size_mb: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDataset {
    pub name: String,
    pub description: Option<String>,
    pub uri: String,
    pub features: DatasetColumnTypes,
    pub target: String,
    pub task_type: String,
    pub data_format: Option<String>,
}
