//! Route definitions for explanations under an understanding.
//!
//! Mounted at `/understanding`.
//!
//! ```text
//! GET  /{id}/explanations             list_explanations
//! POST /{id}/algorithm/{algorithm}    create_explanation
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::understanding;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/explanations", get(understanding::list_explanations))
        .route(
            "/{id}/algorithm/{algorithm}",
            post(understanding::create_explanation),
        )
}
