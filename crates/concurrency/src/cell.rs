//! Completion cell: the settle-once container
//!
//! A [`Cell`] starts pending and transitions to settled at most once. Every
//! consumer holds a clone of the same cell; only the producer side
//! ([`crate::Promise`] / [`crate::Resolver`]) can settle it.
//!
//! ## Settlement Sequence
//!
//! ```text
//! 1. lock the slot
//! 2. IF already settled: unlock, report "not accepted"
//! 3. store the outcome, take the registry out of the slot
//! 4. unlock
//! 5. wake parked tasks
//! 6. submit each listener's matching handler to its own context,
//!    in registration order
//! ```
//!
//! Registration takes the same lock. It either lands in the registry before
//! step 3 (and is drained there) or observes the stored outcome and submits
//! itself. There is no window in which a listener can be lost or fired twice.
//!
//! User code never runs while the lock is held: handlers are always
//! submitted to an execution context, never invoked inline.

use crate::listener::{Listener, Registry};
use parking_lot::Mutex;
use settle_core::{Context, Outcome, State};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context as TaskContext, Poll};
use tracing::{debug, trace};

/// Source of cell identifiers for log correlation
static NEXT_CELL_ID: AtomicU64 = AtomicU64::new(1);

enum Slot<T, E> {
    Pending(Registry<T, E>),
    Settled(Outcome<T, E>),
}

struct Inner<T, E> {
    /// Identifier used in tracing output
    id: u64,

    /// Status and listeners
    ///
    /// Single lock per cell. Held only for O(1) bookkeeping: checking the
    /// status, storing the outcome, appending or draining listeners.
    slot: Mutex<Slot<T, E>>,
}

/// A thread-safe, settle-once container for a success value or a failure.
///
/// Cloning a cell is cheap and yields another handle to the same state.
///
/// # Thread Safety
///
/// Any number of threads may register listeners or read snapshots while any
/// number of producers race to settle. Exactly one settlement wins; the rest
/// are ignored.
///
/// # Awaiting
///
/// `Cell` implements [`Future`], resolving to a clone of the outcome.
pub struct Cell<T, E = settle_core::Error> {
    inner: Arc<Inner<T, E>>,
}

impl<T, E> Clone for Cell<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, E> Cell<T, E> {
    fn with_slot(slot: Slot<T, E>) -> Self {
        Self {
            inner: Arc::new(Inner {
                id: NEXT_CELL_ID.fetch_add(1, Ordering::Relaxed),
                slot: Mutex::new(slot),
            }),
        }
    }

    /// Create a pending cell. Only reachable through the producer side.
    pub(crate) fn pending() -> Self {
        Self::with_slot(Slot::Pending(Registry::new()))
    }

    /// Create a cell that has already succeeded with `value`
    pub fn succeeded(value: T) -> Self {
        Self::with_slot(Slot::Settled(Ok(value)))
    }

    /// Create a cell that has already failed with `error`
    pub fn failed(error: E) -> Self {
        Self::with_slot(Slot::Settled(Err(error)))
    }

    /// Create an already-settled cell from an outcome
    pub fn from_result(outcome: Outcome<T, E>) -> Self {
        Self::with_slot(Slot::Settled(outcome))
    }

    /// Identifier of this cell, stable across clones
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Current status
    pub fn state(&self) -> State {
        match &*self.inner.slot.lock() {
            Slot::Pending(_) => State::Pending,
            Slot::Settled(Ok(_)) => State::Resolved,
            Slot::Settled(Err(_)) => State::Rejected,
        }
    }

    /// Check if no outcome has been stored yet
    pub fn is_pending(&self) -> bool {
        self.state() == State::Pending
    }

    /// Check if two handles refer to the same cell
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T, E> Cell<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Store `outcome` if the cell is still pending.
    ///
    /// Returns whether this call performed the transition. Safe to race from
    /// any number of threads: exactly one caller observes `true`.
    pub(crate) fn try_settle(&self, outcome: Outcome<T, E>) -> bool {
        let registry = {
            let mut slot = self.inner.slot.lock();
            if let Slot::Settled(_) = &*slot {
                debug!(cell = self.inner.id, "Ignoring settlement of already-settled cell");
                return false;
            }
            match std::mem::replace(&mut *slot, Slot::Settled(outcome.clone())) {
                Slot::Pending(registry) => registry,
                // Checked above while holding the lock
                Slot::Settled(_) => return false,
            }
        };

        trace!(
            cell = self.inner.id,
            state = %State::of(Some(&outcome)),
            listeners = registry.len(),
            "Cell settled"
        );

        let (listeners, wakers) = registry.drain();
        for waker in wakers {
            waker.wake();
        }
        for listener in listeners {
            listener.dispatch(outcome.clone());
        }
        true
    }

    /// Register a listener.
    ///
    /// If the cell is pending the listener is stored and fired on settlement.
    /// If it has already settled, the matching handler is submitted to the
    /// listener's context right away. Either way the handler never runs on
    /// the calling thread.
    pub fn add_listener(&self, listener: Listener<T, E>) -> &Self {
        let settled = {
            let mut slot = self.inner.slot.lock();
            match &mut *slot {
                Slot::Pending(registry) => {
                    registry.push(listener);
                    return self;
                }
                Slot::Settled(outcome) => outcome.clone(),
            }
        };
        trace!(
            cell = self.inner.id,
            context = listener.context_label(),
            "Dispatching late listener"
        );
        listener.dispatch(settled);
        self
    }

    /// Run `f` on `context` with the value, if the cell succeeds
    pub fn on_success<F>(&self, context: &Context, f: F) -> &Self
    where
        F: FnOnce(T) + Send + 'static,
    {
        self.add_listener(Listener::on_success(Arc::clone(context), f))
    }

    /// Run `f` on `context` with the error, if the cell fails
    pub fn on_failure<F>(&self, context: &Context, f: F) -> &Self
    where
        F: FnOnce(E) + Send + 'static,
    {
        self.add_listener(Listener::on_failure(Arc::clone(context), f))
    }

    /// Run `f` on `context` with the outcome, whichever way the cell settles
    pub fn on_complete<F>(&self, context: &Context, f: F) -> &Self
    where
        F: FnOnce(Outcome<T, E>) + Send + 'static,
    {
        self.add_listener(Listener::on_complete(Arc::clone(context), f))
    }

    /// Snapshot of the outcome; `None` while pending. Never blocks on
    /// anything but the cell's own lock.
    pub fn outcome(&self) -> Option<Outcome<T, E>> {
        match &*self.inner.slot.lock() {
            Slot::Pending(_) => None,
            Slot::Settled(outcome) => Some(outcome.clone()),
        }
    }

    /// The success value, if settled successfully
    pub fn value(&self) -> Option<T> {
        self.outcome().and_then(Result::ok)
    }

    /// The error, if settled with a failure
    pub fn error(&self) -> Option<E> {
        self.outcome().and_then(Result::err)
    }
}

impl<T, E> Future for Cell<T, E>
where
    T: Clone,
    E: Clone,
{
    type Output = Outcome<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Self::Output> {
        let mut slot = self.inner.slot.lock();
        match &mut *slot {
            Slot::Settled(outcome) => Poll::Ready(outcome.clone()),
            Slot::Pending(registry) => {
                registry.park(cx.waker());
                Poll::Pending
            }
        }
    }
}

impl<T, E> fmt::Debug for Cell<T, E>
where
    T: fmt::Debug,
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Cell");
        s.field("id", &self.inner.id);
        match &*self.inner.slot.lock() {
            Slot::Pending(registry) => s
                .field("state", &State::Pending)
                .field("listeners", &registry.len()),
            Slot::Settled(outcome) => s.field("outcome", outcome),
        };
        s.finish()
    }
}
