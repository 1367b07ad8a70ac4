//! Producer side of a cell
//!
//! A [`Promise`] owns the right to settle exactly one [`Cell`]. Consumers get
//! read-only handles through [`Promise::cell`]; combinators that need several
//! settle points (one per input of a race, say) hand out [`Resolver`] clones.
//!
//! Settling is idempotent from the caller's point of view: the first call
//! wins, later calls return `false` and change nothing.

use crate::cell::Cell;
use settle_core::{Context, FutureError, Outcome};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// Write-side handle of a cell
pub struct Promise<T, E = settle_core::Error> {
    cell: Cell<T, E>,
}

/// Settle continuations of a promise, freely cloneable.
///
/// Passed to the work function of [`Promise::with_work`] and used by
/// combinators to settle a derived cell from several listeners.
pub struct Resolver<T, E = settle_core::Error> {
    cell: Cell<T, E>,
}

impl<T, E> Clone for Resolver<T, E> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T, E> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Create a promise with a pending cell
    pub fn new() -> Self {
        Self {
            cell: Cell::pending(),
        }
    }

    /// Create a promise and submit `work` to `context`.
    ///
    /// `work` receives a [`Resolver`] and settles through it, now or later.
    /// If it returns `Err` first, that error becomes the failure. If it
    /// panics first, the cell fails with [`FutureError::Panicked`].
    pub fn with_work<F>(context: &Context, work: F) -> Self
    where
        F: FnOnce(Resolver<T, E>) -> Result<(), E> + Send + 'static,
        E: From<FutureError>,
    {
        let promise = Self::new();
        let resolver = promise.resolver();
        let label = context.label().to_string();
        context.execute(Box::new(move || {
            let fallback = resolver.clone();
            let cell = fallback.cell.id();
            if let Err(error) = catch_panic(move || work(resolver)) {
                if !fallback.fail(error) {
                    debug!(cell, context = %label, "Work failed after settling");
                }
            }
        }));
        promise
    }

    /// Consumer handle of the promised cell
    pub fn cell(&self) -> Cell<T, E> {
        self.cell.clone()
    }

    /// A cloneable pair of settle continuations for this promise
    pub fn resolver(&self) -> Resolver<T, E> {
        Resolver {
            cell: self.cell.clone(),
        }
    }

    /// Settle with a value. Returns whether this call settled the cell.
    pub fn settle(&self, value: T) -> bool {
        self.cell.try_settle(Ok(value))
    }

    /// Settle with an error. Returns whether this call settled the cell.
    pub fn fail(&self, error: E) -> bool {
        self.cell.try_settle(Err(error))
    }

    /// Settle with an outcome. Returns whether this call settled the cell.
    pub fn complete(&self, outcome: Outcome<T, E>) -> bool {
        self.cell.try_settle(outcome)
    }
}

impl<T, E> Default for Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Promise<(), E>
where
    E: Clone + Send + 'static,
{
    /// A promise that has already succeeded with `()`
    pub fn done() -> Self {
        Self {
            cell: Cell::succeeded(()),
        }
    }

    /// Settle a unit promise
    pub fn resolve(&self) -> bool {
        self.settle(())
    }
}

impl<T, E> Resolver<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Settle with a value. Returns whether this call settled the cell.
    pub fn settle(&self, value: T) -> bool {
        self.cell.try_settle(Ok(value))
    }

    /// Settle with an error. Returns whether this call settled the cell.
    pub fn fail(&self, error: E) -> bool {
        self.cell.try_settle(Err(error))
    }

    /// Settle with an outcome. Returns whether this call settled the cell.
    pub fn complete(&self, outcome: Outcome<T, E>) -> bool {
        self.cell.try_settle(outcome)
    }

    /// Check if the cell is still waiting for an outcome
    pub fn is_pending(&self) -> bool {
        self.cell.is_pending()
    }
}

impl<T, E> fmt::Debug for Promise<T, E>
where
    T: fmt::Debug,
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise").field("cell", &self.cell).finish()
    }
}

impl<T, E> fmt::Debug for Resolver<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver").field("cell", &self.cell.id()).finish()
    }
}

/// Run a user function, turning a panic into [`FutureError::Panicked`].
///
/// Combinators wrap every user closure in this so a panic fails the derived
/// cell instead of leaving it pending.
pub fn catch_panic<R, E, F>(f: F) -> Result<R, E>
where
    F: FnOnce() -> Result<R, E>,
    E: From<FutureError>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!(panic = %message, "User function panicked");
            Err(E::from(FutureError::Panicked(message)))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
