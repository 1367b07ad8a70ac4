//! Chaining combinators
//!
//! Each combinator derives a new cell from one source cell:
//!
//! | Combinator | On success | On failure |
//! |------------|------------|------------|
//! | `map` | settle with `f(value)` | propagate |
//! | `flat_map` | follow the cell returned by `f(value)` | propagate |
//! | `inspect` | run `f(&value)`, forward value | propagate |
//! | `recover` | forward value | follow the cell returned by `f(error)` |
//! | `validate` | keep value if predicate holds | propagate |
//! | `always` | run action | run action |
//!
//! User functions run on the context passed to the combinator and report
//! failure by returning `Err`. An `Err` from a user function fails the
//! derived cell with that error; a panic fails it with
//! [`FutureError::Panicked`].

use settle_concurrency::{catch_panic, Cell, Promise, Resolver};
use settle_core::{Context, FutureError, Outcome};
use std::sync::Arc;

/// Chaining combinators over a [`Cell`].
pub trait CellExt<T, E>: Sized {
    /// Transform the success value
    fn map<U, F>(&self, context: &Context, f: F) -> Cell<U, E>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Result<U, E> + Send + 'static;

    /// Chain a cell-returning step, flattening one level of nesting
    fn flat_map<U, F>(&self, context: &Context, f: F) -> Cell<U, E>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Result<Cell<U, E>, E> + Send + 'static;

    /// Run `f` for its effect and forward the original value.
    ///
    /// If `f` fails, the chain fails with its error instead.
    fn inspect<F>(&self, context: &Context, f: F) -> Cell<T, E>
    where
        F: FnOnce(&T) -> Result<(), E> + Send + 'static;

    /// Replace a failure with the outcome of the cell returned by `f`
    fn recover<F>(&self, context: &Context, f: F) -> Cell<T, E>
    where
        F: FnOnce(E) -> Result<Cell<T, E>, E> + Send + 'static;

    /// Keep the value only if `predicate` holds.
    ///
    /// A `false` predicate fails the chain with [`FutureError::ValidationFailed`].
    fn validate<F>(&self, context: &Context, predicate: F) -> Cell<T, E>
    where
        F: FnOnce(&T) -> Result<bool, E> + Send + 'static;

    /// Run `action` once the cell settles either way.
    ///
    /// Returns the same cell: the outcome is untouched and later listeners
    /// see it unchanged.
    fn always<F>(&self, context: &Context, action: F) -> Cell<T, E>
    where
        F: FnOnce() + Send + 'static;

    /// Alias of [`CellExt::always`]
    fn finally<F>(&self, context: &Context, action: F) -> Cell<T, E>
    where
        F: FnOnce() + Send + 'static,
    {
        self.always(context, action)
    }
}

/// Settle `resolver` with whatever `source` settles with
pub(crate) fn forward<T, E>(context: &Context, source: &Cell<T, E>, resolver: Resolver<T, E>)
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    source.on_complete(context, move |outcome| {
        resolver.complete(outcome);
    });
}

/// Derive a cell whose outcome is `step(source outcome)`
fn derive<T, U, E, F>(source: &Cell<T, E>, context: &Context, step: F) -> Cell<U, E>
where
    T: Clone + Send + 'static,
    U: Clone + Send + 'static,
    E: Clone + Send + From<FutureError> + 'static,
    F: FnOnce(Outcome<T, E>) -> Outcome<U, E> + Send + 'static,
{
    let promise = Promise::new();
    let resolver = promise.resolver();
    source.on_complete(context, move |outcome| {
        resolver.complete(catch_panic(move || step(outcome)));
    });
    promise.cell()
}

impl<T, E> CellExt<T, E> for Cell<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + From<FutureError> + 'static,
{
    fn map<U, F>(&self, context: &Context, f: F) -> Cell<U, E>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Result<U, E> + Send + 'static,
    {
        derive(self, context, move |outcome| outcome.and_then(f))
    }

    fn flat_map<U, F>(&self, context: &Context, f: F) -> Cell<U, E>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Result<Cell<U, E>, E> + Send + 'static,
    {
        let promise = Promise::new();
        let resolver = promise.resolver();
        let inner_context = Arc::clone(context);
        self.on_complete(context, move |outcome| {
            match catch_panic(move || outcome.and_then(f)) {
                Ok(inner) => forward(&inner_context, &inner, resolver),
                Err(error) => {
                    resolver.fail(error);
                }
            }
        });
        promise.cell()
    }

    fn inspect<F>(&self, context: &Context, f: F) -> Cell<T, E>
    where
        F: FnOnce(&T) -> Result<(), E> + Send + 'static,
    {
        derive(self, context, move |outcome| {
            outcome.and_then(|value| f(&value).map(|()| value))
        })
    }

    fn recover<F>(&self, context: &Context, f: F) -> Cell<T, E>
    where
        F: FnOnce(E) -> Result<Cell<T, E>, E> + Send + 'static,
    {
        let promise = Promise::new();
        let resolver = promise.resolver();
        let inner_context = Arc::clone(context);
        self.on_complete(context, move |outcome| match outcome {
            Ok(value) => {
                resolver.settle(value);
            }
            Err(error) => match catch_panic(move || f(error)) {
                Ok(replacement) => forward(&inner_context, &replacement, resolver),
                Err(error) => {
                    resolver.fail(error);
                }
            },
        });
        promise.cell()
    }

    fn validate<F>(&self, context: &Context, predicate: F) -> Cell<T, E>
    where
        F: FnOnce(&T) -> Result<bool, E> + Send + 'static,
    {
        derive(self, context, move |outcome| {
            outcome.and_then(|value| match predicate(&value) {
                Ok(true) => Ok(value),
                Ok(false) => Err(E::from(FutureError::ValidationFailed)),
                Err(error) => Err(error),
            })
        })
    }

    fn always<F>(&self, context: &Context, action: F) -> Cell<T, E>
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_complete(context, move |_| action());
        self.clone()
    }
}
