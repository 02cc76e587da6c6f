//! Shared response envelope types for API handlers.
//!
//! Entity responses use a `{ "data": ... }` envelope. The run and result
//! endpoints answer with their own status bodies instead.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": [...], "total_rows": n, "total_pages": n }` envelope for
/// paginated listings.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub data: Vec<T>,
    pub total_rows: i64,
    pub total_pages: i64,
}

/// `{ "status": ..., "message": ... }` body used by action endpoints.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: String,
}
