//! Explanation service API library.
//!
//! Exposes config, state, error handling, routes and the dispatch /
//! polling engine so integration tests and the binary entrypoint can
//! both build the same application.

pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod state;
