//! Execution contexts
//!
//! An execution context is a named destination that can run a unit of work:
//! a thread pool, a serial queue, a test harness. Cells never run handlers
//! on the thread that settles them or registers them; every handler is
//! submitted to the context requested at registration time.
//!
//! The context also provides the timer facility used by the `delay`,
//! `timeout` and `retry` combinators.
//!
//! Implementations live outside the core (`settle-executor` ships
//! tokio-backed ones). They must be thread-safe and must eventually run
//! every job they accept.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// A unit of work submitted to an execution context.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Shared handle to an execution context.
pub type Context = Arc<dyn ExecutionContext>;

/// A destination that runs submitted work asynchronously.
pub trait ExecutionContext: Send + Sync + 'static {
    /// Human-readable name, used in logs
    fn label(&self) -> &str;

    /// Run `job` at some later point.
    ///
    /// Must not run `job` on the calling thread before returning.
    fn execute(&self, job: Job);

    /// Run `job` no earlier than `delay` from now.
    fn execute_after(&self, delay: Duration, job: Job);
}

impl fmt::Debug for dyn ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("label", &self.label())
            .finish()
    }
}
