//! Core domain types and traits for the ACP server.
//!
//! This crate contains:
//! - Job identifiers and the job lifecycle model
//! - Broadcast event types
//! - The TaskExecutor trait
//! - Common error types

pub mod error;
pub mod event;
pub mod executor;
pub mod id;
pub mod job;

pub use error::{Error, Result};
pub use event::Event;
pub use executor::TaskExecutor;
pub use id::JobId;
pub use job::{Job, JobStatus};
