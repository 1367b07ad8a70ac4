//! Retry combinator
//!
//! `retry` calls a cell-producing body, and on failure calls it again after
//! a delay, until it succeeds or the retry budget is spent.
//!
//! ## Attempt Sequence
//!
//! ```text
//! 1. call body() -> cell
//! 2. on success: settle with the value, stop
//! 3. on failure with retries left: wait `delay` on the context's timer,
//!    decrement, go to 1
//! 4. on failure with no retries left: fail with this (the last) error
//! ```
//!
//! A policy with `attempts = n` calls the body at most `n + 1` times. A
//! panicking body counts as a failed attempt with [`FutureError::Panicked`].

use serde::{Deserialize, Serialize};
use settle_concurrency::{catch_panic, Cell, Promise, Resolver};
use settle_core::{Context, FutureError};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// How many times to retry, and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries after the first call
    pub attempts: u32,
    /// Wait before each retry
    #[serde(default)]
    pub delay: Duration,
}

impl RetryPolicy {
    /// Retry up to `attempts` times with no delay
    pub fn new(attempts: u32) -> Self {
        Self {
            attempts,
            delay: Duration::ZERO,
        }
    }

    /// Set the wait before each retry
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Maximum number of body calls under this policy
    pub fn max_calls(&self) -> u64 {
        u64::from(self.attempts) + 1
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Call `body` until its cell succeeds or `policy` is exhausted.
///
/// The first call happens before `retry` returns. A success is never retried.
pub fn retry<T, E, F>(context: &Context, policy: RetryPolicy, body: F) -> Cell<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + From<FutureError> + 'static,
    F: FnMut() -> Cell<T, E> + Send + 'static,
{
    let promise = Promise::new();
    attempt(Arc::clone(context), policy, body, policy.attempts, promise.resolver(), 1);
    promise.cell()
}

fn attempt<T, E, F>(
    context: Context,
    policy: RetryPolicy,
    mut body: F,
    remaining: u32,
    resolver: Resolver<T, E>,
    number: u64,
) where
    T: Clone + Send + 'static,
    E: Clone + Send + From<FutureError> + 'static,
    F: FnMut() -> Cell<T, E> + Send + 'static,
{
    let cell = catch_panic(|| Ok::<_, E>(body())).unwrap_or_else(Cell::failed);
    let listen_on = Arc::clone(&context);
    cell.on_complete(&listen_on, move |outcome| match outcome {
        Ok(value) => {
            resolver.settle(value);
        }
        Err(error) if remaining == 0 => {
            debug!(attempts = number, "Retry budget exhausted");
            resolver.fail(error);
        }
        Err(_) => {
            debug!(
                attempt = number,
                remaining,
                delay = ?policy.delay,
                "Attempt failed, retrying"
            );
            let timer = Arc::clone(&context);
            timer.execute_after(
                policy.delay,
                Box::new(move || attempt(context, policy, body, remaining - 1, resolver, number + 1)),
            );
        }
    });
}
