//! Integration tests for `TaskDispatcher` against the PostgreSQL broker.
//!
//! The enqueue and the handle store are separate steps, so a handle that
//! cannot be stored leaves a published task behind.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use common::{seed_explanation, seed_understanding, stored_task_id};
use peel_api::engine::dispatcher::{DispatchError, TaskDispatcher};
use peel_core::algorithm::Algorithm;
use peel_core::arguments::{ArgumentValue, TypedArgument, TypedArguments};
use peel_core::resolver::{InvocationPayload, TaskDomain};
use peel_core::types::DbId;
use peel_tasks::pg_broker::DEFAULT_QUEUE;
use peel_tasks::PgTaskBroker;
use serde_json::json;
use sqlx::PgPool;

fn payload(explanation_id: DbId) -> InvocationPayload {
    let algorithm = Algorithm::Shap;
    let mut arguments = TypedArguments::new();
    arguments.insert(
        "instance".to_string(),
        TypedArgument::Instance(vec![
            ArgumentValue::Float(3.5),
            ArgumentValue::Str("red".into()),
            ArgumentValue::Int(4),
        ]),
    );
    InvocationPayload {
        explanation_id,
        algorithm,
        routing_key: algorithm.routing_key(),
        arguments,
        task_type: TaskDomain::Regression,
        dataset_uri: "storage/datasets/cars.csv".to_string(),
        model_uri: "storage/models/cars_rf.pkl".to_string(),
    }
}

fn dispatcher(pool: &PgPool) -> TaskDispatcher {
    let broker = PgTaskBroker::new(pool.clone(), DEFAULT_QUEUE);
    TaskDispatcher::new(pool.clone(), Arc::new(broker))
}

async fn published_count(pool: &PgPool, task_id: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM task_messages WHERE task_id = $1")
        .bind(task_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn dispatch_stores_handle_on_explanation(pool: PgPool) {
    let understanding_id = seed_understanding(&pool).await;
    let id = seed_explanation(&pool, understanding_id, "shap", json!({})).await;

    let handle = dispatcher(&pool).dispatch(&payload(id)).await.unwrap();

    assert_eq!(stored_task_id(&pool, id).await.as_deref(), Some(handle.as_str()));
    assert_eq!(published_count(&pool, handle.as_str()).await, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_explanation_leaves_orphaned_task(pool: PgPool) {
    let err = dispatcher(&pool)
        .dispatch(&payload(999_999))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "PERSIST_FAILURE");
    let task_id = assert_matches!(
        err,
        DispatchError::PersistFailure { explanation_id: 999_999, task_id, .. } => task_id
    );

    // The broker already accepted the message.
    assert_eq!(published_count(&pool, task_id.as_str()).await, 1);
    let status: String = sqlx::query_scalar("SELECT status FROM task_meta WHERE task_id = $1")
        .bind(task_id.as_str())
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "PENDING");
}
