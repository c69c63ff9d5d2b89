//! Dispatcher worker.
//!
//! A single dedicated task consumes job ids off an mpsc channel, one at a
//! time, in submission order. `submit` only validates, stores, and pushes
//! onto the channel; it never touches worker state and never awaits job
//! completion. The worker parks on `recv` while the queue is empty.

use std::sync::{Arc, Mutex};

use acp_core::{Error, Event, Job, JobId, JobStatus, Result, TaskExecutor};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::{EventBus, JobStore};

/// Handle for submitting jobs to the single dispatch worker.
#[derive(Clone)]
pub struct Dispatcher {
    store: JobStore,
    tx: mpsc::UnboundedSender<JobId>,
    // Creation and enqueue happen under one lock so channel order matches
    // creation order even when `submit` is called concurrently.
    submit_lock: Arc<Mutex<()>>,
}

impl Dispatcher {
    /// Spawn the worker task and return the submission handle.
    pub fn start(store: JobStore, bus: EventBus, executor: Arc<dyn TaskExecutor>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(store.clone(), bus, executor, rx));
        Self {
            store,
            tx,
            submit_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Validate and enqueue a new job, returning it immediately as pending.
    pub fn submit(
        &self,
        task_type: &str,
        agent_id: &str,
        context: serde_json::Value,
    ) -> Result<Job> {
        if task_type.trim().is_empty() {
            return Err(Error::InvalidInput("taskType is required".to_string()));
        }
        if agent_id.trim().is_empty() {
            return Err(Error::InvalidInput("agentId is required".to_string()));
        }

        let _guard = self.submit_lock.lock().expect("submit lock poisoned");
        let job = self.store.create(task_type, agent_id, context);
        self.tx
            .send(job.id)
            .map_err(|_| Error::Internal("dispatcher worker is not running".to_string()))?;
        Ok(job)
    }

    /// Look up a previously submitted job.
    pub fn get_job(&self, id: JobId) -> Option<Job> {
        self.store.get(id)
    }
}

/// Worker loop: drains the channel one job at a time.
async fn run_worker(
    store: JobStore,
    bus: EventBus,
    executor: Arc<dyn TaskExecutor>,
    mut rx: mpsc::UnboundedReceiver<JobId>,
) {
    info!(executor = executor.name(), "Starting dispatch worker");

    while let Some(job_id) = rx.recv().await {
        process_job(&store, &bus, executor.as_ref(), job_id).await;
    }

    info!("Dispatch worker shutting down");
}

/// Run one job through processing -> completed | failed, publishing a
/// JOB_UPDATE on each transition. Executor errors are captured into the
/// job and never escape this function.
async fn process_job(store: &JobStore, bus: &EventBus, executor: &dyn TaskExecutor, id: JobId) {
    let job = match store.update(id, |j| j.status = JobStatus::Processing) {
        Ok(job) => job,
        Err(e) => {
            warn!(job_id = %id, error = %e, "Queued job missing from store");
            return;
        }
    };
    bus.publish(Event::job_update(job.id, job.status, &job.agent_id));
    info!(job_id = %job.id, task_type = %job.task_type, agent_id = %job.agent_id, "Processing job");

    match executor.execute(&job.task_type, &job.context).await {
        Ok(result) => {
            let updated = store.update(id, |j| {
                j.status = JobStatus::Completed;
                j.result = Some(result);
            });
            match updated {
                Ok(job) => {
                    info!(job_id = %job.id, "Job completed");
                    bus.publish(Event::job_update(job.id, job.status, &job.agent_id));
                }
                Err(e) => warn!(job_id = %id, error = %e, "Failed to record job completion"),
            }
        }
        Err(e) => {
            let message = e.to_string();
            let updated = store.update(id, |j| {
                j.status = JobStatus::Failed;
                j.error = Some(message.clone());
            });
            match updated {
                Ok(job) => {
                    warn!(job_id = %job.id, error = %message, "Job failed");
                    bus.publish(Event::job_update(job.id, job.status, &job.agent_id));
                }
                Err(e) => warn!(job_id = %id, error = %e, "Failed to record job failure"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::broadcast;
    use tokio::time::timeout;

    /// Executor that succeeds after a short delay, tracking how many
    /// executions overlap.
    struct DelayExecutor {
        active: AtomicUsize,
        max_active: AtomicUsize,
    }

    impl DelayExecutor {
        fn new() -> Self {
            Self {
                active: AtomicUsize::new(0),
                max_active: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TaskExecutor for DelayExecutor {
        fn name(&self) -> &'static str {
            "delay"
        }

        async fn execute(
            &self,
            task_type: &str,
            _context: &serde_json::Value,
        ) -> acp_core::Result<serde_json::Value> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(json!({ "task": task_type }))
        }
    }

    /// Executor that always fails.
    struct FailingExecutor;

    #[async_trait]
    impl TaskExecutor for FailingExecutor {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn execute(
            &self,
            _task_type: &str,
            _context: &serde_json::Value,
        ) -> acp_core::Result<serde_json::Value> {
            Err(Error::ExecutionFailed("executor exploded".to_string()))
        }
    }

    async fn next_update(rx: &mut broadcast::Receiver<Event>) -> (JobId, JobStatus) {
        loop {
            let event = timeout(Duration::from_secs(2), rx.recv())
                .await
                .expect("timed out waiting for event")
                .expect("bus closed");
            if let Event::JobUpdate { job_id, status, .. } = event {
                return (job_id, status);
            }
        }
    }

    #[tokio::test]
    async fn jobs_run_fifo_one_at_a_time() {
        let store = JobStore::new();
        let bus = EventBus::new();
        let executor = Arc::new(DelayExecutor::new());
        let dispatcher = Dispatcher::start(store.clone(), bus.clone(), executor.clone());

        let mut rx = bus.subscribe();
        let a = dispatcher.submit("task_a", "agent-1", json!(null)).unwrap();
        let b = dispatcher.submit("task_b", "agent-1", json!(null)).unwrap();
        let c = dispatcher.submit("task_c", "agent-1", json!(null)).unwrap();

        // Processing and completion events interleave strictly: each job
        // finishes before the next one starts.
        let expected = [
            (a.id, JobStatus::Processing),
            (a.id, JobStatus::Completed),
            (b.id, JobStatus::Processing),
            (b.id, JobStatus::Completed),
            (c.id, JobStatus::Processing),
            (c.id, JobStatus::Completed),
        ];
        for (id, status) in expected {
            assert_eq!(next_update(&mut rx).await, (id, status));
        }

        assert_eq!(executor.max_active.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_job_captures_error_and_does_not_block_the_queue() {
        let store = JobStore::new();
        let bus = EventBus::new();

        struct FailFirst(AtomicUsize);

        #[async_trait]
        impl TaskExecutor for FailFirst {
            fn name(&self) -> &'static str {
                "fail-first"
            }

            async fn execute(
                &self,
                _task_type: &str,
                _context: &serde_json::Value,
            ) -> acp_core::Result<serde_json::Value> {
                if self.0.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(Error::ExecutionFailed("shopify api unreachable".to_string()))
                } else {
                    Ok(json!({"ok": true}))
                }
            }
        }

        let dispatcher = Dispatcher::start(
            store.clone(),
            bus.clone(),
            Arc::new(FailFirst(AtomicUsize::new(0))),
        );

        let mut rx = bus.subscribe();
        let bad = dispatcher.submit("sync", "agent-1", json!(null)).unwrap();
        let good = dispatcher.submit("sync", "agent-1", json!(null)).unwrap();

        assert_eq!(next_update(&mut rx).await, (bad.id, JobStatus::Processing));
        assert_eq!(next_update(&mut rx).await, (bad.id, JobStatus::Failed));
        assert_eq!(next_update(&mut rx).await, (good.id, JobStatus::Processing));
        assert_eq!(next_update(&mut rx).await, (good.id, JobStatus::Completed));

        let failed = store.get(bad.id).unwrap();
        assert_eq!(failed.status, JobStatus::Failed);
        assert_eq!(failed.error.as_deref(), Some("execution failed: shopify api unreachable"));
        assert!(failed.result.is_none());

        let completed = store.get(good.id).unwrap();
        assert_eq!(completed.status, JobStatus::Completed);
        assert!(completed.result.is_some());
        assert!(completed.error.is_none());
    }

    #[tokio::test]
    async fn failing_executor_never_propagates_to_submit() {
        let store = JobStore::new();
        let bus = EventBus::new();
        let dispatcher = Dispatcher::start(store.clone(), bus.clone(), Arc::new(FailingExecutor));

        let mut rx = bus.subscribe();
        let job = dispatcher.submit("anything", "agent-9", json!(null)).unwrap();
        assert_eq!(job.status, JobStatus::Pending);

        assert_eq!(next_update(&mut rx).await, (job.id, JobStatus::Processing));
        assert_eq!(next_update(&mut rx).await, (job.id, JobStatus::Failed));
    }

    #[tokio::test]
    async fn submit_rejects_empty_task_type_and_agent_id() {
        let store = JobStore::new();
        let bus = EventBus::new();
        let dispatcher = Dispatcher::start(store.clone(), bus, Arc::new(DelayExecutor::new()));

        let err = dispatcher.submit("", "agent-1", json!(null)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = dispatcher.submit("sync", "  ", json!(null)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        // No job was created for either rejected submission.
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn get_job_reflects_terminal_state() {
        let store = JobStore::new();
        let bus = EventBus::new();
        let dispatcher = Dispatcher::start(store, bus.clone(), Arc::new(DelayExecutor::new()));

        let mut rx = bus.subscribe();
        let job = dispatcher.submit("report", "agent-3", json!({"week": 12})).unwrap();

        assert_eq!(next_update(&mut rx).await, (job.id, JobStatus::Processing));
        assert_eq!(next_update(&mut rx).await, (job.id, JobStatus::Completed));

        let done = dispatcher.get_job(job.id).unwrap();
        assert_eq!(done.status, JobStatus::Completed);
        assert!(done.status.is_terminal());
    }
}
