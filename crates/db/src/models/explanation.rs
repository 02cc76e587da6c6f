//! Explanation entity models and DTOs.

use peel_core::arguments::DatasetColumnTypes;
use peel_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `explanations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Explanation {
    pub id: DbId,
    pub understanding_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub algorithm: String,
    /// Free-form argument bag; type-checked only at dispatch time.
    pub arguments: serde_json::Value,
    pub result: Option<String>,
    pub result_type: Option<String>,
    /// Handle of the most recently dispatched task, if any.
    pub task_id: Option<String>,
    pub version: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new explanation record.
#[derive(Debug, Clone)]
pub struct CreateExplanation {
    pub understanding_id: DbId,
    pub algorithm: String,
    pub arguments: serde_json::Value,
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

/// Query parameters for `GET /understandings/{id}/explanations`.
#[derive(Debug, Default, Deserialize)]
pub struct ExplanationListQuery {
    /// Only enabled (`true`) or disabled (`false`) records.
    pub enabled: Option<bool>,
    /// Case-insensitive name substring, or an exact id when all digits.
    pub name: Option<String>,
    /// Page size. Defaults to 10, capped at 100.
    pub limit: Option<i64>,
    /// Zero-based page number.
    pub page: Option<i64>,
}

/// Everything needed to dispatch one explanation, joined across
/// explanation -> understanding -> dataset / model.
#[derive(Debug, Clone, FromRow)]
pub struct ExplanationRunContext {
    pub explanation_id: DbId,
    pub algorithm: String,
    pub arguments: serde_json::Value,
    pub task_type: String,
    pub dataset_uri: String,
    pub features: Json<DatasetColumnTypes>,
    pub model_uri: String,
}
