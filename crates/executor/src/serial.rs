//! Serial context: one queue, one consumer task
//!
//! Jobs run one at a time in submission order, the way a serial dispatch
//! queue behaves. Listeners registered on the same cell through the same
//! serial context therefore run in registration order.
//!
//! Delayed jobs join the queue when their timer fires, behind whatever was
//! submitted before that moment.
//!
//! Each job runs on the blocking pool while the consumer waits for it, so a
//! blocking job does not stall async workers and a panicking job is logged
//! and skipped. The queue keeps draining after a panic.

use settle_core::{ExecutionContext, Job};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// FIFO execution context drained by a single tokio task.
#[derive(Debug, Clone)]
pub struct SerialContext {
    label: String,
    queue: mpsc::UnboundedSender<Job>,
    handle: Handle,
}

impl SerialContext {
    /// Create a context and start its consumer task on `handle`.
    ///
    /// The consumer stops once every clone of the context is dropped and
    /// the queue has drained. Timers need the runtime's time driver
    /// (`enable_time` or `enable_all`).
    pub fn new(label: impl Into<String>, handle: Handle) -> Self {
        let label = label.into();
        let (queue, jobs) = mpsc::unbounded_channel();
        handle.spawn(Self::consume(label.clone(), handle.clone(), jobs));
        Self {
            label,
            queue,
            handle,
        }
    }

    async fn consume(label: String, handle: Handle, mut jobs: mpsc::UnboundedReceiver<Job>) {
        while let Some(job) = jobs.recv().await {
            if let Err(error) = handle.spawn_blocking(job).await {
                warn!(context = %label, error = %error, "Serial job did not complete");
            }
        }
        debug!(context = %label, "Serial context drained");
    }
}

impl ExecutionContext for SerialContext {
    fn label(&self) -> &str {
        &self.label
    }

    fn execute(&self, job: Job) {
        if self.queue.send(job).is_err() {
            debug!(context = %self.label, "Serial consumer gone, job dropped");
        }
    }

    fn execute_after(&self, delay: Duration, job: Job) {
        let queue = self.queue.clone();
        let label = self.label.clone();
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if queue.send(job).is_err() {
                debug!(context = %label, "Serial consumer gone, timer job dropped");
            }
        });
    }
}
