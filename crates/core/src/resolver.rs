//! Argument resolution: stored explanation record -> typed invocation payload.
//!
//! [`resolve`] is a pure function. It parses the stored argument bag,
//! coerces the `instance` row against the dataset's ordered feature list,
//! and looks up the worker routing key for the requested algorithm.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::algorithm::Algorithm;
use crate::arguments::{
    ArgumentValue, ColumnType, DatasetColumnTypes, TypedArgument, TypedArguments, INSTANCE_KEY,
};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Prediction task of the dataset/model pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskDomain {
    Classification,
    Regression,
}

impl TaskDomain {
    pub const fn as_str(self) -> &'static str {
        match self {
            TaskDomain::Classification => "classification",
            TaskDomain::Regression => "regression",
        }
    }
}

impl fmt::Display for TaskDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskDomain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classification" => Ok(TaskDomain::Classification),
            "regression" => Ok(TaskDomain::Regression),
            other => Err(format!("Unknown task type '{other}'")),
        }
    }
}

/// Everything the resolver needs from an explanation record and the
/// understanding it belongs to.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub explanation_id: DbId,
    /// Algorithm identifier as stored; parsed during resolution.
    pub algorithm: String,
    /// Stored argument bag. Either a JSON object or a string holding one.
    pub arguments: Value,
    pub task_type: TaskDomain,
    pub dataset_uri: String,
    pub model_uri: String,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Strongly-typed payload for one dispatch. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvocationPayload {
    pub explanation_id: DbId,
    pub algorithm: Algorithm,
    pub routing_key: &'static str,
    pub arguments: TypedArguments,
    pub task_type: TaskDomain,
    pub dataset_uri: String,
    pub model_uri: String,
}

impl InvocationPayload {
    /// Keyword arguments in the shape the worker tasks accept.
    pub fn worker_kwargs(&self) -> Value {
        json!({
            "explanation_id": self.explanation_id,
            "feature_importance": self.arguments,
            "task_type": self.task_type,
            "uri_datasource": self.dataset_uri,
            "uri_model": self.model_uri,
        })
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a stored record could not be turned into an [`InvocationPayload`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolutionError {
    #[error("Malformed arguments: {0}")]
    MalformedArguments(String),

    #[error(
        "Cannot cast instance value {value} at position {position} \
         to {expected} for feature '{feature}'"
    )]
    TypeCastFailure {
        position: usize,
        feature: String,
        expected: ColumnType,
        value: String,
    },

    #[error("Instance has {actual} values but the dataset declares {expected} features")]
    InstanceLengthMismatch { expected: usize, actual: usize },

    #[error("Unknown algorithm '{0}'")]
    UnknownAlgorithm(String),
}

impl ResolutionError {
    /// Stable error-kind code for API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            ResolutionError::MalformedArguments(_) => "MALFORMED_ARGUMENTS",
            ResolutionError::TypeCastFailure { .. }
            | ResolutionError::InstanceLengthMismatch { .. } => "TYPE_CAST_FAILURE",
            ResolutionError::UnknownAlgorithm(_) => "UNKNOWN_ALGORITHM",
        }
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Build the invocation payload for `request`.
///
/// The `instance` row, if present, is cast positionally: value `i` is cast
/// to the type of feature `i` of `columns`.
pub fn resolve(
    request: &DispatchRequest,
    columns: &DatasetColumnTypes,
) -> Result<InvocationPayload, ResolutionError> {
    let algorithm: Algorithm = request
        .algorithm
        .parse()
        .map_err(|_| ResolutionError::UnknownAlgorithm(request.algorithm.clone()))?;

    let bag = parse_argument_bag(&request.arguments)?;

    let mut arguments = TypedArguments::new();
    for (key, value) in bag {
        let typed = if key == INSTANCE_KEY {
            TypedArgument::Instance(cast_instance(&value, columns)?)
        } else {
            TypedArgument::Passthrough(value)
        };
        arguments.insert(key, typed);
    }

    Ok(InvocationPayload {
        explanation_id: request.explanation_id,
        algorithm,
        routing_key: algorithm.routing_key(),
        arguments,
        task_type: request.task_type,
        dataset_uri: request.dataset_uri.clone(),
        model_uri: request.model_uri.clone(),
    })
}

/// Accept a JSON object, or a string containing one (legacy rows).
fn parse_argument_bag(raw: &Value) -> Result<Map<String, Value>, ResolutionError> {
    match raw {
        Value::Object(map) => Ok(map.clone()),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(ResolutionError::MalformedArguments(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
            Err(e) => Err(ResolutionError::MalformedArguments(e.to_string())),
        },
        Value::Null => Ok(Map::new()),
        other => Err(ResolutionError::MalformedArguments(format!(
            "expected a JSON object, got {}",
            json_kind(other)
        ))),
    }
}

fn cast_instance(
    value: &Value,
    columns: &DatasetColumnTypes,
) -> Result<Vec<ArgumentValue>, ResolutionError> {
    let Value::Array(items) = value else {
        return Err(ResolutionError::MalformedArguments(format!(
            "'{INSTANCE_KEY}' must be an array, got {}",
            json_kind(value)
        )));
    };

    if items.len() != columns.len() {
        return Err(ResolutionError::InstanceLengthMismatch {
            expected: columns.len(),
            actual: items.len(),
        });
    }

    items
        .iter()
        .zip(columns.columns())
        .enumerate()
        .map(|(position, (item, column))| {
            column
                .dtype
                .cast(item)
                .ok_or_else(|| ResolutionError::TypeCastFailure {
                    position,
                    feature: column.name.clone(),
                    expected: column.dtype,
                    value: item.to_string(),
                })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
