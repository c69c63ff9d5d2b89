//! Broadcast event types.
//!
//! Events are immutable messages fanned out to every connected stream
//! client. They are not stored or replayed; a client connecting after a
//! transition never sees it retroactively.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{JobId, JobStatus};

/// A message delivered over the broadcast stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Greeting sent once to each new stream connection.
    #[serde(rename = "SYSTEM", rename_all = "camelCase")]
    System {
        message: String,
        timestamp: DateTime<Utc>,
    },
    /// A job changed state.
    #[serde(rename = "JOB_UPDATE", rename_all = "camelCase")]
    JobUpdate {
        job_id: JobId,
        status: JobStatus,
        agent_id: String,
        timestamp: DateTime<Utc>,
    },
}

impl Event {
    /// Build a JOB_UPDATE for the given job transition, stamped now.
    pub fn job_update(job_id: JobId, status: JobStatus, agent_id: impl Into<String>) -> Self {
        Event::JobUpdate {
            job_id,
            status,
            agent_id: agent_id.into(),
            timestamp: Utc::now(),
        }
    }

    /// Build the per-connection SYSTEM greeting, stamped now.
    pub fn greeting(message: impl Into<String>) -> Self {
        Event::System {
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}
