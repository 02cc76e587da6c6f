//! Outbound client for the explanation worker queue.
//!
//! Publishing is fire-and-forget: [`TaskBroker::submit`] returns as soon
//! as the message is accepted and never waits for the computation. Task
//! progress is observed separately through the `task_meta` status store.

pub mod broker;
pub mod pg_broker;

pub use broker::{BrokerError, TaskBroker};
pub use pg_broker::PgTaskBroker;
