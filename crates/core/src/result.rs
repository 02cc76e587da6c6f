//! Result representations the result endpoint can serve.

use std::str::FromStr;

/// Default file extension of rendered explanation images.
pub const DEFAULT_IMAGE_EXTENSION: &str = "png";

/// Representation requested via `?type=`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultFormat {
    /// The decoded result object, returned as-is.
    #[default]
    Raw,
    /// The rendered image artifact of the task.
    Image,
}

/// Returned when `?type=` names neither `raw` nor `image`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown result type '{0}', expected 'raw' or 'image'")]
pub struct UnknownResultFormat(pub String);

impl FromStr for ResultFormat {
    type Err = UnknownResultFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(ResultFormat::Raw),
            "image" => Ok(ResultFormat::Image),
            _ => Err(UnknownResultFormat(s.to_string())),
        }
    }
}

/// File name of the image artifact a worker renders for `task_id`.
pub fn artifact_file_name(task_id: &str, extension: &str) -> String {
    format!("{task_id}.{}", extension.trim_start_matches('.'))
}
