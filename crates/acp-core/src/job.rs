//! Job lifecycle model.
//!
//! A job represents one unit of submitted work. Its status only moves
//! forward: pending -> processing -> completed | failed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::JobId;

/// Lifecycle status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Job is queued and waiting for the dispatcher.
    Pending,
    /// Job is currently being executed.
    Processing,
    /// Job finished successfully.
    Completed,
    /// Job execution failed.
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A submitted unit of work and its tracked state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Unique identifier, assigned at creation.
    pub id: JobId,
    /// Which executor capability to invoke.
    pub task_type: String,
    /// Identifier of the requesting agent, passed through unmodified.
    pub agent_id: String,
    /// Caller-supplied payload, opaque to the dispatcher.
    pub context: serde_json::Value,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    /// Present only when status == completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Present only when status == failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Job {
    /// Create a new pending job.
    pub fn new(
        task_type: impl Into<String>,
        agent_id: impl Into<String>,
        context: serde_json::Value,
    ) -> Self {
        Self {
            id: JobId::new(),
            task_type: task_type.into(),
            agent_id: agent_id.into(),
            context,
            status: JobStatus::Pending,
            created_at: Utc::now(),
            result: None,
            error: None,
        }
    }
}
