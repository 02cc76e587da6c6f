//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row, plus the create DTOs used for inserts.

pub mod dataset;
pub mod explanation;
pub mod ml_model;
pub mod task_meta;
pub mod understanding;
