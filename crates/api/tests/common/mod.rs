#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use peel_api::config::ServerConfig;
use peel_api::engine::materializer::ResultMaterializer;
use peel_api::routes;
use peel_api::state::AppState;
use peel_core::arguments::ColumnType;
use peel_core::resolver::InvocationPayload;
use peel_core::task::TaskHandle;
use peel_core::types::DbId;
use peel_db::models::dataset::CreateDataset;
use peel_db::models::explanation::CreateExplanation;
use peel_db::models::ml_model::CreateMlModel;
use peel_db::models::understanding::CreateUnderstanding;
use peel_db::repositories::{DatasetRepo, ExplanationRepo, MlModelRepo, UnderstandingRepo};
use peel_tasks::{BrokerError, PgTaskBroker, TaskBroker};
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults, rendering images into
/// `output_dir`.
pub fn test_config(output_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        output_dir: output_dir.to_path_buf(),
        image_extension: "png".to_string(),
        broker_queue: "xai".to_string(),
    }
}

/// Build the full application router with the PostgreSQL broker and an
/// output directory that holds no artifacts.
pub fn build_test_app(pool: PgPool) -> Router {
    let output_dir = std::env::temp_dir().join("peel-api-tests-empty");
    let broker = Arc::new(PgTaskBroker::new(pool.clone(), "xai"));
    build_test_app_with(pool, broker, output_dir)
}

/// Build the full application router with all middleware layers.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack production uses.
pub fn build_test_app_with(
    pool: PgPool,
    broker: Arc<dyn TaskBroker>,
    output_dir: PathBuf,
) -> Router {
    let config = test_config(&output_dir);
    let materializer = ResultMaterializer::new(output_dir, config.image_extension.clone());

    let state = AppState {
        pool,
        broker,
        materializer: Arc::new(materializer),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// Broker that refuses every message.
pub struct UnavailableBroker;

#[async_trait]
impl TaskBroker for UnavailableBroker {
    async fn submit(
        &self,
        _routing_key: &'static str,
        _payload: &InvocationPayload,
    ) -> Result<TaskHandle, BrokerError> {
        Err(BrokerError::Unavailable("connection refused".into()))
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request to `uri`.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a DELETE request to `uri`.
pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body to `uri`.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect a response body as raw bytes.
pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// Create a regression dataset with features `age: float64`,
/// `color: object`, `doors: int64`, a model, and the understanding that
/// pairs them.
pub async fn seed_understanding(pool: &PgPool) -> DbId {
    let dataset = DatasetRepo::create(
        pool,
        &CreateDataset {
            name: "cars".to_string(),
            description: None,
            uri: "storage/datasets/cars.csv".to_string(),
            features: [
                ("age".to_string(), ColumnType::Float64),
                ("color".to_string(), ColumnType::Object),
                ("doors".to_string(), ColumnType::Int64),
            ]
            .into_iter()
            .collect(),
            target: "price".to_string(),
            task_type: "regression".to_string(),
            data_format: Some("csv".to_string()),
        },
    )
    .await
    .unwrap();

    let model = MlModelRepo::create(
        pool,
        &CreateMlModel {
            name: "random forest".to_string(),
            description: None,
            uri: "storage/models/cars_rf.pkl".to_string(),
        },
    )
    .await
    .unwrap();

    UnderstandingRepo::create(
        pool,
        &CreateUnderstanding {
            dataset_id: dataset.id,
            model_id: model.id,
            name: "cars with rf".to_string(),
            description: None,
        },
    )
    .await
    .unwrap()
    .id
}

/// Store an explanation directly, bypassing request validation.
pub async fn seed_explanation(
    pool: &PgPool,
    understanding_id: DbId,
    algorithm: &str,
    arguments: serde_json::Value,
) -> DbId {
    ExplanationRepo::create(
        pool,
        &CreateExplanation {
            understanding_id,
            algorithm: algorithm.to_string(),
            arguments,
            name: format!("{algorithm} explanation"),
            description: None,
            version: None,
        },
    )
    .await
    .unwrap()
    .id
}

/// Point an explanation at `task_id` and write the worker-side status
/// record for it, as a worker would.
pub async fn seed_task(
    pool: &PgPool,
    explanation_id: DbId,
    task_id: &str,
    status: &str,
    result: Option<&[u8]>,
) {
    ExplanationRepo::set_task_id(pool, explanation_id, task_id)
        .await
        .unwrap();

    sqlx::query(
        "INSERT INTO task_meta (task_id, status, result) VALUES ($1, $2, $3) \
         ON CONFLICT (task_id) DO UPDATE SET status = EXCLUDED.status, result = EXCLUDED.result",
    )
    .bind(task_id)
    .bind(status)
    .bind(result)
    .execute(pool)
    .await
    .unwrap();
}

/// Current task handle stored on an explanation.
pub async fn stored_task_id(pool: &PgPool, explanation_id: DbId) -> Option<String> {
    ExplanationRepo::find_by_id(pool, explanation_id)
        .await
        .unwrap()
        .unwrap()
        .task_id
}
