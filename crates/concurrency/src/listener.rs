//! Listener entries and the per-cell callback registry
//!
//! A [`Listener`] is registered against a pending cell and fired exactly once
//! when the cell settles. It carries the execution context its handler must
//! run on, and either:
//! - a split pair of optional success / failure handlers, or
//! - one completion handler that receives the whole outcome.
//!
//! Only the handler matching the settled branch is ever submitted. A listener
//! with no handler for that branch is dropped without touching its context.
//!
//! The [`Registry`] is the ordered list of listeners (plus parked task
//! wakers) owned by a single pending cell. It never outlives the pending
//! state: settlement drains it.

use settle_core::{Context, Outcome};
use smallvec::SmallVec;
use std::fmt;
use std::task::Waker;

/// Handler run with the success value
pub type SuccessHandler<T> = Box<dyn FnOnce(T) + Send + 'static>;

/// Handler run with the failure
pub type FailureHandler<E> = Box<dyn FnOnce(E) + Send + 'static>;

/// Handler run with either branch
pub type CompletionHandler<T, E> = Box<dyn FnOnce(Outcome<T, E>) + Send + 'static>;

enum Handler<T, E> {
    Split {
        on_success: Option<SuccessHandler<T>>,
        on_failure: Option<FailureHandler<E>>,
    },
    Complete(CompletionHandler<T, E>),
}

/// An interested party waiting for a cell to settle.
///
/// Immutable once built; consumed by [`Listener::dispatch`].
pub struct Listener<T, E> {
    context: Context,
    handler: Handler<T, E>,
}

impl<T, E> Listener<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Listener with optional handlers for each branch
    pub fn new(
        context: Context,
        on_success: Option<SuccessHandler<T>>,
        on_failure: Option<FailureHandler<E>>,
    ) -> Self {
        Self {
            context,
            handler: Handler::Split {
                on_success,
                on_failure,
            },
        }
    }

    /// Listener that only cares about success
    pub fn on_success<F>(context: Context, f: F) -> Self
    where
        F: FnOnce(T) + Send + 'static,
    {
        Self::new(context, Some(Box::new(f)), None)
    }

    /// Listener that only cares about failure
    pub fn on_failure<F>(context: Context, f: F) -> Self
    where
        F: FnOnce(E) + Send + 'static,
    {
        Self::new(context, None, Some(Box::new(f)))
    }

    /// Listener that receives the outcome whichever way it settles
    pub fn on_complete<F>(context: Context, f: F) -> Self
    where
        F: FnOnce(Outcome<T, E>) + Send + 'static,
    {
        Self {
            context,
            handler: Handler::Complete(Box::new(f)),
        }
    }

    /// Label of the context the handler will run on
    pub fn context_label(&self) -> &str {
        self.context.label()
    }

    /// Submit the handler matching `outcome` to the listener's context.
    ///
    /// Returns whether anything was submitted. Never runs the handler on
    /// the calling thread.
    pub fn dispatch(self, outcome: Outcome<T, E>) -> bool {
        let Listener { context, handler } = self;
        match (handler, outcome) {
            (Handler::Complete(f), outcome) => {
                context.execute(Box::new(move || f(outcome)));
                true
            }
            (
                Handler::Split {
                    on_success: Some(f),
                    ..
                },
                Ok(value),
            ) => {
                context.execute(Box::new(move || f(value)));
                true
            }
            (
                Handler::Split {
                    on_failure: Some(f),
                    ..
                },
                Err(error),
            ) => {
                context.execute(Box::new(move || f(error)));
                true
            }
            _ => false,
        }
    }
}

impl<T, E> fmt::Debug for Listener<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.handler {
            Handler::Split {
                on_success,
                on_failure,
            } => match (on_success.is_some(), on_failure.is_some()) {
                (true, true) => "both",
                (true, false) => "success",
                (false, true) => "failure",
                (false, false) => "none",
            },
            Handler::Complete(_) => "complete",
        };
        f.debug_struct("Listener")
            .field("context", &self.context.label())
            .field("handles", &kind)
            .finish()
    }
}

/// Ordered listeners and parked wakers of one pending cell
pub(crate) struct Registry<T, E> {
    listeners: SmallVec<[Listener<T, E>; 2]>,
    wakers: Vec<Waker>,
}

impl<T, E> Registry<T, E> {
    pub(crate) fn new() -> Self {
        Self {
            listeners: SmallVec::new(),
            wakers: Vec::new(),
        }
    }

    /// Append a listener, preserving registration order
    pub(crate) fn push(&mut self, listener: Listener<T, E>) {
        self.listeners.push(listener);
    }

    /// Park a task waker, replacing an earlier one for the same task
    pub(crate) fn park(&mut self, waker: &Waker) {
        if !self.wakers.iter().any(|w| w.will_wake(waker)) {
            self.wakers.push(waker.clone());
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Take everything out, in registration order
    pub(crate) fn drain(self) -> (SmallVec<[Listener<T, E>; 2]>, Vec<Waker>) {
        (self.listeners, self.wakers)
    }
}
