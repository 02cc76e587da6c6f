//! Explanation execution engine.
//!
//! Dispatches resolved explanations onto the worker queue, tracks the
//! resulting tasks through the status store, and materializes finished
//! results. Nothing here runs in the background: every call is driven by
//! a request and returns without waiting on a worker.

pub mod dispatcher;
pub mod materializer;
pub mod tracker;
