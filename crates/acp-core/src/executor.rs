//! TaskExecutor trait.
//!
//! Executors perform the actual work for a task type. Concrete
//! implementations (third-party API integrations and the like) live
//! outside this crate and plug in behind the trait.

use async_trait::async_trait;

use crate::Result;

/// Trait for pluggable task executors.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    /// Name of this executor.
    fn name(&self) -> &'static str;

    /// Execute the work for `task_type` with the caller-supplied context.
    ///
    /// Returns the result payload on success. Errors end the job in the
    /// `failed` state; they are never surfaced to the original submitter.
    async fn execute(
        &self,
        task_type: &str,
        context: &serde_json::Value,
    ) -> Result<serde_json::Value>;
}
