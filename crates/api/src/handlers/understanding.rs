//! Handlers for explanations scoped to an understanding.
//!
//! Creating an explanation only stores its argument bag. The bag is
//! type-checked against the dataset when the explanation is run.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use peel_core::algorithm::Algorithm;
use peel_core::error::CoreError;
use peel_core::types::DbId;
use peel_db::models::explanation::{CreateExplanation, Explanation, ExplanationListQuery};
use peel_db::repositories::{ExplanationRepo, UnderstandingRepo};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body of `POST /understanding/{id}/algorithm/{algorithm}`.
#[derive(Debug, Deserialize)]
pub struct CreateExplanationRequest {
    /// Algorithm arguments. Must be a JSON object; stored unchecked.
    #[serde(default)]
    pub arguments: Value,
    pub metadata: ExplanationMetadata,
}

#[derive(Debug, Deserialize)]
pub struct ExplanationMetadata {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_understanding_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<()> {
    UnderstandingRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Understanding",
            id,
        }))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/understanding/{id}/explanations
///
/// Supports `enabled`, `name` (substring, or exact id when numeric),
/// `limit` and zero-based `page`.
pub async fn list_explanations(
    State(state): State<AppState>,
    Path(understanding_id): Path<DbId>,
    Query(params): Query<ExplanationListQuery>,
) -> AppResult<Json<PageResponse<Explanation>>> {
    ensure_understanding_exists(&state.pool, understanding_id).await?;

    let page =
        ExplanationRepo::list_by_understanding(&state.pool, understanding_id, &params).await?;
    let total_pages = page.total_pages();

    Ok(Json(PageResponse {
        data: page.items,
        total_rows: page.total_rows,
        total_pages,
    }))
}

/// POST /api/v1/understanding/{id}/algorithm/{algorithm}
pub async fn create_explanation(
    State(state): State<AppState>,
    Path((understanding_id, algorithm)): Path<(DbId, String)>,
    Json(body): Json<CreateExplanationRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Explanation>>)> {
    let algorithm: Algorithm = algorithm
        .parse()
        .map_err(|e: peel_core::algorithm::UnknownAlgorithm| AppError::BadRequest(e.to_string()))?;

    let arguments = match body.arguments {
        Value::Null => Value::Object(Default::default()),
        obj @ Value::Object(_) => obj,
        _ => {
            return Err(AppError::Core(CoreError::Validation(
                "arguments must be a JSON object".into(),
            )))
        }
    };

    let name = body.metadata.name.trim();
    if name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "metadata.name must not be empty".into(),
        )));
    }

    ensure_understanding_exists(&state.pool, understanding_id).await?;

    let input = CreateExplanation {
        understanding_id,
        algorithm: algorithm.as_str().to_string(),
        arguments,
        name: name.to_string(),
        description: body.metadata.description,
        version: body.metadata.version,
    };
    let explanation = ExplanationRepo::create(&state.pool, &input).await?;

    tracing::info!(
        explanation_id = explanation.id,
        understanding_id,
        algorithm = %algorithm,
        "Explanation created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: explanation })))
}
