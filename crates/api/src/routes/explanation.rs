//! Route definitions for explanations.
//!
//! Mounted at `/explanation`.
//!
//! ```text
//! GET    /{id}            get_explanation
//! DELETE /{id}            delete_explanation
//! GET    /{id}/run        run_explanation
//! GET    /{id}/result     get_result
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::explanation;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(explanation::get_explanation).delete(explanation::delete_explanation),
        )
        .route("/{id}/run", get(explanation::run_explanation))
        .route("/{id}/result", get(explanation::get_result))
}
