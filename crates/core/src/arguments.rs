//! Typed argument values and dataset column metadata.
//!
//! Explanation arguments are stored as free-form JSON and only coerced
//! into [`ArgumentValue`]s when a dispatch is requested. Coercion is
//! driven by the dataset's ordered feature list ([`DatasetColumnTypes`]).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reserved argument key holding a single data instance (one value per
/// feature, in feature-declaration order).
pub const INSTANCE_KEY: &str = "instance";

// ---------------------------------------------------------------------------
// Column metadata
// ---------------------------------------------------------------------------

/// Primitive type tag of a dataset column.
///
/// Serialized with the dtype names the dataset profiler produces
/// (`float64`, `int64`, `object`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    #[serde(rename = "float64", alias = "float")]
    Float64,
    #[serde(rename = "int64", alias = "int")]
    Int64,
    #[serde(rename = "object", alias = "str", alias = "string")]
    Object,
}

impl ColumnType {
    pub const fn as_str(self) -> &'static str {
        match self {
            ColumnType::Float64 => "float64",
            ColumnType::Int64 => "int64",
            ColumnType::Object => "object",
        }
    }

    /// Cast a loosely-typed JSON value into this column's primitive type.
    ///
    /// Returns `None` when the value cannot be represented. Object columns
    /// accept every value.
    pub fn cast(self, value: &Value) -> Option<ArgumentValue> {
        match self {
            ColumnType::Float64 => match value {
                Value::Number(n) => n
                    .as_f64()
                    .filter(|v| v.is_finite())
                    .map(ArgumentValue::Float),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(ArgumentValue::Float),
                _ => None,
            },
            ColumnType::Int64 => match value {
                Value::Number(n) => n
                    .as_i64()
                    .or_else(|| n.as_f64().and_then(integral_f64))
                    .map(ArgumentValue::Int),
                Value::String(s) => s.trim().parse::<i64>().ok().map(ArgumentValue::Int),
                _ => None,
            },
            // Strings pass through; anything else is kept as its JSON text.
            ColumnType::Object => match value {
                Value::String(s) => Some(ArgumentValue::Str(s.clone())),
                other => Some(ArgumentValue::Str(other.to_string())),
            },
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accept floats like `30.0` for integer columns, reject `1.5`.
fn integral_f64(v: f64) -> Option<i64> {
    let in_range = v >= i64::MIN as f64 && v < i64::MAX as f64;
    (v.fract() == 0.0 && in_range).then_some(v as i64)
}

/// One column of a registered dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureColumn {
    pub name: String,
    pub dtype: ColumnType,
}

/// Ordered feature list of a dataset. Immutable once the dataset is
/// registered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetColumnTypes(Vec<FeatureColumn>);

impl DatasetColumnTypes {
    pub fn new(columns: Vec<FeatureColumn>) -> Self {
        Self(columns)
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ColumnType)> for DatasetColumnTypes {
    fn from_iter<I: IntoIterator<Item = (String, ColumnType)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, dtype)| FeatureColumn { name, dtype })
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Typed values
// ---------------------------------------------------------------------------

/// A single instance value after schema-driven coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    Float(f64),
    Int(i64),
    Str(String),
}

impl ArgumentValue {
    /// The column type this value satisfies.
    pub fn column_type(&self) -> ColumnType {
        match self {
            ArgumentValue::Float(_) => ColumnType::Float64,
            ArgumentValue::Int(_) => ColumnType::Int64,
            ArgumentValue::Str(_) => ColumnType::Object,
        }
    }
}

/// A resolved argument: either the coerced instance row or any other
/// algorithm option, passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedArgument {
    Instance(Vec<ArgumentValue>),
    Passthrough(Value),
}

/// Resolved argument mapping handed to a worker.
pub type TypedArguments = BTreeMap<String, TypedArgument>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
