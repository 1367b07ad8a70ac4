//! Hand-driven execution context for deterministic tests
//!
//! [`ManualContext`] queues every job instead of running it. Tests decide
//! when queued work runs (`run_until_idle`) and when virtual time passes
//! (`advance`), which makes dispatch order and timer behaviour observable
//! without sleeping.

use crate::context::{ExecutionContext, Job};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// A timer waiting for the virtual clock to reach `due`
struct Timer {
    due: Duration,
    seq: u64,
    job: Job,
}

#[derive(Default)]
struct ManualState {
    ready: VecDeque<Job>,
    timers: Vec<Timer>,
    now: Duration,
    next_seq: u64,
}

/// Execution context that only runs work when told to.
pub struct ManualContext {
    label: String,
    state: Mutex<ManualState>,
}

impl ManualContext {
    /// Create a new context behind an `Arc`, ready to be used as a [`crate::Context`]
    pub fn new(label: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            label: label.into(),
            state: Mutex::new(ManualState::default()),
        })
    }

    /// Number of jobs ready to run
    pub fn pending(&self) -> usize {
        self.state.lock().ready.len()
    }

    /// Number of timers not yet due
    pub fn scheduled(&self) -> usize {
        self.state.lock().timers.len()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.state.lock().now
    }

    /// Run the oldest ready job. Returns false if there was none.
    pub fn run_next(&self) -> bool {
        // Pop under the lock, run outside it: jobs may submit more work.
        let job = self.state.lock().ready.pop_front();
        match job {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Run ready jobs until the queue is empty, including jobs queued
    /// while running. Returns how many ran.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }

    /// Move the virtual clock forward and queue every timer that became due,
    /// earliest first. Does not run anything.
    pub fn advance(&self, by: Duration) {
        let mut state = self.state.lock();
        state.now += by;
        let now = state.now;

        let mut due = Vec::new();
        let mut i = 0;
        while i < state.timers.len() {
            if state.timers[i].due <= now {
                due.push(state.timers.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|t| (t.due, t.seq));
        state.ready.extend(due.into_iter().map(|t| t.job));
    }

    /// Advance the clock and run everything that becomes ready.
    pub fn advance_and_run(&self, by: Duration) -> usize {
        self.advance(by);
        self.run_until_idle()
    }
}

impl ExecutionContext for ManualContext {
    fn label(&self) -> &str {
        &self.label
    }

    fn execute(&self, job: Job) {
        self.state.lock().ready.push_back(job);
    }

    fn execute_after(&self, delay: Duration, job: Job) {
        let mut state = self.state.lock();
        let due = state.now + delay;
        let seq = state.next_seq;
        state.next_seq += 1;
        state.timers.push(Timer { due, seq, job });
    }
}
