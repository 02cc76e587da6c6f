use std::path::PathBuf;

use peel_core::result::DEFAULT_IMAGE_EXTENSION;
use peel_tasks::pg_broker::DEFAULT_QUEUE;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long in-flight requests may drain after a shutdown signal (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Directory the workers render explanation images into.
    pub output_dir: PathBuf,
    /// File extension of rendered images, without the dot.
    pub image_extension: String,
    /// Queue every task message is published to.
    pub broker_queue: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    /// | `OUTPUT_DIR`           | `storage/output`           |
    /// | `IMAGE_EXTENSION`      | `png`                      |
    /// | `BROKER_TOPIC`         | `xai`                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let output_dir = PathBuf::from(
            std::env::var("OUTPUT_DIR").unwrap_or_else(|_| "storage/output".into()),
        );

        let image_extension = std::env::var("IMAGE_EXTENSION")
            .map(|ext| ext.trim().trim_start_matches('.').to_string())
            .ok()
            .filter(|ext| !ext.is_empty())
            .unwrap_or_else(|| DEFAULT_IMAGE_EXTENSION.into());

        let broker_queue = std::env::var("BROKER_TOPIC").unwrap_or_else(|_| DEFAULT_QUEUE.into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            output_dir,
            image_extension,
            broker_queue,
        }
    }
}
