//! Explainability algorithms and their worker routing keys.
//!
//! Every algorithm maps to exactly one worker task name. The mapping is a
//! `match` over a closed enum, so adding a variant without a routing key
//! fails to compile.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An explainability algorithm an explanation record can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Ale,
    Ensemble,
    Gpx,
    Knn,
    Lime,
    Linear,
    Logit,
    Shap,
    Tree,
}

impl Algorithm {
    /// All algorithms, in alphabetical order.
    pub const ALL: [Algorithm; 9] = [
        Algorithm::Ale,
        Algorithm::Ensemble,
        Algorithm::Gpx,
        Algorithm::Knn,
        Algorithm::Lime,
        Algorithm::Linear,
        Algorithm::Logit,
        Algorithm::Shap,
        Algorithm::Tree,
    ];

    /// Lowercase identifier as stored in the `explanations.algorithm` column.
    pub const fn as_str(self) -> &'static str {
        match self {
            Algorithm::Ale => "ale",
            Algorithm::Ensemble => "ensemble",
            Algorithm::Gpx => "gpx",
            Algorithm::Knn => "knn",
            Algorithm::Lime => "lime",
            Algorithm::Linear => "linear",
            Algorithm::Logit => "logit",
            Algorithm::Shap => "shap",
            Algorithm::Tree => "tree",
        }
    }

    /// Name of the worker task that executes this algorithm.
    pub const fn routing_key(self) -> &'static str {
        match self {
            Algorithm::Ale => "task_manager.ale_tasks.ale_exec",
            Algorithm::Ensemble => "task_manager.ensemble_tasks.ensemble_exec",
            Algorithm::Gpx => "task_manager.gpx_tasks.gp_xai_exec",
            Algorithm::Knn => "task_manager.knn_tasks.knn_exec",
            Algorithm::Lime => "task_manager.lime_tasks.lime_exec",
            Algorithm::Linear => "task_manager.linear_tasks.linear_exec",
            Algorithm::Logit => "task_manager.logit_tasks.logit_exec",
            Algorithm::Shap => "task_manager.shap_tasks.shap_exec",
            Algorithm::Tree => "task_manager.tree_tasks.tree_exec",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known algorithm.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown algorithm '{0}'")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    /// Parse an algorithm identifier. Matching is case-insensitive and
    /// ignores surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Algorithm::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
