//! Handlers for the `/explanation` resource.
//!
//! Besides detail and logical delete, this is where explanations are run
//! and their results polled. A run resolves the stored arguments against
//! the dataset's feature types and hands the payload to the dispatcher;
//! a result poll reads the task status and either reports it or serves
//! the finished result.

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use peel_core::error::CoreError;
use peel_core::resolver::{self, DispatchRequest, InvocationPayload, TaskDomain};
use peel_core::result::{ResultFormat, UnknownResultFormat};
use peel_core::task::{ExplanationState, PollStatus, TaskHandle};
use peel_core::types::DbId;
use peel_db::models::explanation::Explanation;
use peel_db::repositories::ExplanationRepo;
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;

use crate::engine::dispatcher::TaskDispatcher;
use crate::engine::materializer::ResultPayload;
use crate::engine::tracker::StatusTracker;
use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, StatusResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ResultParams {
    /// `raw` (default) or `image`.
    #[serde(rename = "type")]
    pub format: Option<String>,
}

impl ResultParams {
    /// Requested representation. Unknown values are a `400` with a JSON body.
    pub fn format(&self) -> Result<ResultFormat, AppError> {
        self.format
            .as_deref()
            .map_or(Ok(ResultFormat::Raw), str::parse::<ResultFormat>)
            .map_err(|e: UnknownResultFormat| AppError::BadRequest(e.to_string()))
    }
}

/// Body returned when a run was accepted.
#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub message: &'static str,
    pub explanation_id: DbId,
    pub task_id: TaskHandle,
}

/// Body returned by a result poll when no result can be served yet.
#[derive(Debug, Serialize)]
pub struct PollResponse {
    pub status: PollStatus,
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_explanation(pool: &sqlx::PgPool, id: DbId) -> AppResult<Explanation> {
    ExplanationRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Explanation",
            id,
        }))
}

/// Load everything the resolver needs and build the invocation payload.
async fn resolve_payload(pool: &sqlx::PgPool, id: DbId) -> AppResult<InvocationPayload> {
    let ctx = ExplanationRepo::find_run_context(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Explanation",
            id,
        }))?;

    let task_type: TaskDomain = ctx
        .task_type
        .parse()
        .map_err(|e: String| AppError::Core(CoreError::Internal(e)))?;

    let request = DispatchRequest {
        explanation_id: ctx.explanation_id,
        algorithm: ctx.algorithm,
        arguments: ctx.arguments,
        task_type,
        dataset_uri: ctx.dataset_uri,
        model_uri: ctx.model_uri,
    };

    Ok(resolver::resolve(&request, &ctx.features.0)?)
}

/// HTTP status for a poll that cannot serve a result.
fn poll_status_code(status: PollStatus) -> StatusCode {
    match status {
        PollStatus::Processing => StatusCode::ACCEPTED,
        PollStatus::Failure => StatusCode::INTERNAL_SERVER_ERROR,
        PollStatus::NotProcessed => StatusCode::NOT_FOUND,
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/explanation/{id}
pub async fn get_explanation(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Explanation>>> {
    let explanation = find_explanation(&state.pool, id).await?;
    Ok(Json(DataResponse { data: explanation }))
}

/// DELETE /api/v1/explanation/{id}
///
/// Logical delete: the record is disabled, never removed.
pub async fn delete_explanation(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<StatusResponse>> {
    if !ExplanationRepo::disable(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Explanation",
            id,
        }));
    }
    tracing::info!(explanation_id = id, "Explanation disabled");

    Ok(Json(StatusResponse {
        status: "DELETED",
        message: format!("Explanation {id} was deleted"),
    }))
}

/// GET /api/v1/explanation/{id}/run
///
/// Resolves the stored arguments and enqueues the explanation task.
/// Returns once the broker accepted the message. Running again replaces
/// the stored task handle.
pub async fn run_explanation(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<RunResponse>> {
    let payload = resolve_payload(&state.pool, id).await?;

    let dispatcher = TaskDispatcher::new(state.pool.clone(), state.broker.clone());
    let task_id = dispatcher.dispatch(&payload).await?;

    Ok(Json(RunResponse {
        message: "Request processed successfully",
        explanation_id: id,
        task_id,
    }))
}

/// GET /api/v1/explanation/{id}/result?type=raw|image
///
/// - `200` with the decoded result object (`raw`) or the image bytes.
/// - `202 {status: PROCESSING}` while queued or running.
/// - `500 {status: FAILURE}` when the worker reported a failure.
/// - `404 {status: TASK_NOT_PROCESSED}` when the explanation was never run
///   or its status tag is not recognised.
pub async fn get_result(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<ResultParams>,
) -> AppResult<Response> {
    let format = params.format()?;
    let explanation = find_explanation(&state.pool, id).await?;

    let tracked = StatusTracker::new(state.pool.clone())
        .current_state(&explanation)
        .await?;

    if let Some(status) = tracked.state.poll_status() {
        if tracked.state == ExplanationState::Failed {
            tracing::warn!(
                explanation_id = id,
                task_id = tracked.task_id.as_deref().unwrap_or_default(),
                traceback = tracked.traceback.as_deref().unwrap_or_default(),
                "Explanation task failed",
            );
        }
        let body = PollResponse {
            status,
            message: status.message(),
        };
        return Ok((poll_status_code(status), Json(body)).into_response());
    }

    let payload = state.materializer.materialize(&tracked, format).await?;

    Ok(match payload {
        ResultPayload::Raw(value) => Json(value).into_response(),
        ResultPayload::Image(image) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, image.content_type.to_string()),
                (header::CONTENT_LENGTH, image.len.to_string()),
            ],
            Body::from_stream(ReaderStream::new(image.file)),
        )
            .into_response(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
