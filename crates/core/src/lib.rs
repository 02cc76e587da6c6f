//! Domain logic for the explanation dispatch subsystem.
//!
//! Everything in this crate is pure: no database, no network, no file
//! system. The `db`, `tasks` and `api` crates build on these types.

pub mod algorithm;
pub mod arguments;
pub mod error;
pub mod resolver;
pub mod result;
pub mod task;
pub mod types;
