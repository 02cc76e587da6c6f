//! Result materializer.
//!
//! Turns a succeeded task into the representation the caller asked for:
//! the decoded result object for `raw`, or the rendered image file for
//! `image`. The image lives at `<output_dir>/<task_id>.<extension>`.

use std::path::PathBuf;

use peel_core::result::{artifact_file_name, ResultFormat};
use peel_core::task::ExplanationState;
use tokio::fs::File;

use super::tracker::TrackedTask;

/// Errors from materializing a result.
#[derive(Debug, thiserror::Error)]
pub enum MaterializeError {
    /// The task has not succeeded, so there is nothing to serve.
    #[error("Task is not finished (state {0})")]
    NotReady(ExplanationState),

    /// The task succeeded but the worker stored no result object.
    #[error("Task {0} succeeded without a stored result")]
    MissingResult(String),

    /// The rendered image is not where the worker should have written it.
    #[error("Result artifact not found at {}", .0.display())]
    ArtifactMissing(PathBuf),

    #[error("Failed to decode task result: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Failed to read result artifact: {0}")]
    Io(#[from] std::io::Error),
}

/// An opened image artifact, ready to be streamed.
#[derive(Debug)]
pub struct ImageArtifact {
    pub file: File,
    pub len: u64,
    pub content_type: &'static str,
}

/// A materialized result.
#[derive(Debug)]
pub enum ResultPayload {
    /// The decoded result object, uninterpreted.
    Raw(serde_json::Value),
    Image(ImageArtifact),
}

/// Locates and decodes task results.
#[derive(Debug, Clone)]
pub struct ResultMaterializer {
    output_dir: PathBuf,
    image_extension: String,
}

impl ResultMaterializer {
    pub fn new(output_dir: impl Into<PathBuf>, image_extension: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            image_extension: image_extension.into(),
        }
    }

    /// Path of the image artifact for `task_id`.
    pub fn artifact_path(&self, task_id: &str) -> PathBuf {
        self.output_dir
            .join(artifact_file_name(task_id, &self.image_extension))
    }

    /// Materialize the result of `task` in `format`.
    ///
    /// Fails with [`MaterializeError::NotReady`] unless the task succeeded.
    pub async fn materialize(
        &self,
        task: &TrackedTask,
        format: ResultFormat,
    ) -> Result<ResultPayload, MaterializeError> {
        if task.state != ExplanationState::Succeeded {
            return Err(MaterializeError::NotReady(task.state));
        }
        let task_id = task
            .task_id
            .as_deref()
            .ok_or(MaterializeError::NotReady(ExplanationState::NotDispatched))?;

        match format {
            ResultFormat::Raw => {
                let blob = task
                    .result
                    .as_deref()
                    .ok_or_else(|| MaterializeError::MissingResult(task_id.to_string()))?;
                Ok(ResultPayload::Raw(serde_json::from_slice(blob)?))
            }
            ResultFormat::Image => self.open_image(task_id).await.map(ResultPayload::Image),
        }
    }

    async fn open_image(&self, task_id: &str) -> Result<ImageArtifact, MaterializeError> {
        let path = self.artifact_path(task_id);
        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(MaterializeError::ArtifactMissing(path));
            }
            Err(e) => return Err(e.into()),
        };
        let len = file.metadata().await?.len();

        Ok(ImageArtifact {
            file,
            len,
            content_type: content_type_for(&self.image_extension),
        })
    }
}

/// MIME type for an image extension.
fn content_type_for(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use tokio::io::AsyncReadExt;

    fn succeeded(task_id: &str, result: Option<&[u8]>) -> TrackedTask {
        TrackedTask {
            state: ExplanationState::Succeeded,
            task_id: Some(task_id.to_string()),
            result: result.map(<[u8]>::to_vec),
            traceback: None,
        }
    }

    #[tokio::test]
    async fn raw_result_is_decoded_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let materializer = ResultMaterializer::new(dir.path(), "png");
        let blob = serde_json::to_vec(&json!({"age": 0.4, "color": [0.1, 0.2]})).unwrap();

        let payload = materializer
            .materialize(&succeeded("t-1", Some(blob.as_slice())), ResultFormat::Raw)
            .await
            .unwrap();

        assert_matches!(payload, ResultPayload::Raw(v) if v == json!({"age": 0.4, "color": [0.1, 0.2]}));
    }

    #[tokio::test]
    async fn raw_result_without_blob_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let materializer = ResultMaterializer::new(dir.path(), "png");

        let err = materializer
            .materialize(&succeeded("t-1", None), ResultFormat::Raw)
            .await
            .unwrap_err();

        assert_matches!(err, MaterializeError::MissingResult(id) if id == "t-1");
    }

    #[tokio::test]
    async fn undecodable_blob_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let materializer = ResultMaterializer::new(dir.path(), "png");

        let err = materializer
            .materialize(&succeeded("t-1", Some(b"\x80\x04not json".as_slice())), ResultFormat::Raw)
            .await
            .unwrap_err();

        assert_matches!(err, MaterializeError::Decode(_));
    }

    #[tokio::test]
    async fn image_is_opened_from_derived_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("t-2.png"), b"\x89PNG fake").unwrap();
        let materializer = ResultMaterializer::new(dir.path(), "png");

        let payload = materializer
            .materialize(&succeeded("t-2", None), ResultFormat::Image)
            .await
            .unwrap();

        let ResultPayload::Image(mut image) = payload else {
            panic!("expected an image payload");
        };
        assert_eq!(image.content_type, "image/png");
        assert_eq!(image.len, 9);
        let mut bytes = Vec::new();
        image.file.read_to_end(&mut bytes).await.unwrap();
        assert_eq!(bytes, b"\x89PNG fake");
    }

    #[tokio::test]
    async fn missing_image_is_artifact_missing() {
        let dir = tempfile::tempdir().unwrap();
        let materializer = ResultMaterializer::new(dir.path(), "png");

        let err = materializer
            .materialize(&succeeded("t-3", Some(b"{}".as_slice())), ResultFormat::Image)
            .await
            .unwrap_err();

        assert_matches!(err, MaterializeError::ArtifactMissing(path) if path == dir.path().join("t-3.png"));
    }

    #[tokio::test]
    async fn unfinished_task_is_not_materialized() {
        let dir = tempfile::tempdir().unwrap();
        let materializer = ResultMaterializer::new(dir.path(), "png");
        let task = TrackedTask {
            state: ExplanationState::Started,
            task_id: Some("t-4".to_string()),
            result: None,
            traceback: None,
        };

        let err = materializer
            .materialize(&task, ResultFormat::Raw)
            .await
            .unwrap_err();

        assert_matches!(err, MaterializeError::NotReady(ExplanationState::Started));
    }

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(content_type_for("PNG"), "image/png");
        assert_eq!(content_type_for("jpeg"), "image/jpeg");
        assert_eq!(content_type_for("bin"), "application/octet-stream");
    }
}
