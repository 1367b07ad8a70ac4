//! Concurrent context on a tokio runtime

use settle_core::{ExecutionContext, Job};
use std::time::Duration;
use tokio::runtime::Handle;

/// Runs every job as its own blocking task on a tokio runtime.
///
/// Jobs submitted together may run in parallel and in any order. Jobs are
/// plain closures, so they go to the blocking pool and may block without
/// stalling the runtime's async workers.
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    label: String,
    handle: Handle,
}

impl RuntimeContext {
    /// Create a context submitting to `handle`.
    ///
    /// Delayed jobs sleep on the runtime's timer, so `handle` must come from a
    /// runtime built with `enable_time` (or `enable_all`).
    pub fn new(label: impl Into<String>, handle: Handle) -> Self {
        Self {
            label: label.into(),
            handle,
        }
    }

    /// The runtime this context submits to
    pub fn handle(&self) -> &Handle {
        &self.handle
    }
}

impl ExecutionContext for RuntimeContext {
    fn label(&self) -> &str {
        &self.label
    }

    fn execute(&self, job: Job) {
        self.handle.spawn_blocking(job);
    }

    fn execute_after(&self, delay: Duration, job: Job) {
        let handle = self.handle.clone();
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            handle.spawn_blocking(job);
        });
    }
}
