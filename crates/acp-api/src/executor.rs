//! Built-in echo executor.
//!
//! Real task executors (Shopify syncs, Klaviyo campaigns, report
//! generation) integrate behind the `TaskExecutor` trait. The echo
//! executor lets the server run standalone and is useful for exercising
//! the dispatch and broadcast paths end to end.

use async_trait::async_trait;
use serde_json::json;

use acp_core::TaskExecutor;

/// Executor that acknowledges every task by echoing its context back.
pub struct EchoExecutor;

#[async_trait]
impl TaskExecutor for EchoExecutor {
    fn name(&self) -> &'static str {
        "echo"
    }

    async fn execute(
        &self,
        task_type: &str,
        context: &serde_json::Value,
    ) -> acp_core::Result<serde_json::Value> {
        Ok(json!({
            "taskType": task_type,
            "echo": context,
        }))
    }
}
