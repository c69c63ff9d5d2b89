//! In-memory job store.
//!
//! Jobs are kept for the life of the process; nothing is evicted.
//! Transition legality is the dispatcher's responsibility, not the store's.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use acp_core::{Error, Job, JobId, Result};

/// Shared handle to the job store. Cloning is cheap.
#[derive(Clone, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<JobId, Job>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new pending job.
    pub fn create(
        &self,
        task_type: impl Into<String>,
        agent_id: impl Into<String>,
        context: serde_json::Value,
    ) -> Job {
        let job = Job::new(task_type, agent_id, context);
        let mut jobs = self.jobs.write().expect("job store lock poisoned");
        jobs.insert(job.id, job.clone());
        job
    }

    /// Look up a job by id.
    pub fn get(&self, id: JobId) -> Option<Job> {
        let jobs = self.jobs.read().expect("job store lock poisoned");
        jobs.get(&id).cloned()
    }

    /// Apply a mutation to a job and return the updated copy.
    pub fn update(&self, id: JobId, mutate: impl FnOnce(&mut Job)) -> Result<Job> {
        let mut jobs = self.jobs.write().expect("job store lock poisoned");
        let job = jobs
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("job {id}")))?;
        mutate(job);
        Ok(job.clone())
    }

    /// Number of jobs ever created.
    pub fn len(&self) -> usize {
        self.jobs.read().expect("job store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
