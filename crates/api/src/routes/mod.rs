pub mod explanation;
pub mod health;
pub mod understanding;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /understanding/{id}/explanations                list explanations (GET)
/// /understanding/{id}/algorithm/{algorithm}       create explanation (POST)
///
/// /explanation/{id}                               get, logical delete
/// /explanation/{id}/run                           dispatch to the worker queue (GET)
/// /explanation/{id}/result                        poll status / fetch result (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/understanding", understanding::router())
        .nest("/explanation", explanation::router())
}
