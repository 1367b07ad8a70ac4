//! Bridges from callback-style completion APIs to cells
//!
//! Older APIs report completion by calling a callback, either with a pair of
//! optional arguments or with a tagged result. The wrappers here hand such an
//! API a callback, then turn whatever it is called with into a cell outcome.
//!
//! | Callback arguments       | Outcome                          |
//! |--------------------------|----------------------------------|
//! | `(Some(v), _)`           | `Ok(v)` (a value beats an error) |
//! | `(None, Some(e))`        | `Err(e)`                         |
//! | `(None, None)`           | `Err(MalformedAdapterInput)`     |
//!
//! The callback is single use. If it is dropped without being called, the
//! cell stays pending.

use settle_concurrency::{Cell, Promise};
use settle_core::{Context, FutureError, Outcome};

/// Callback handed to a two-option API
pub type OptionalCallback<T, E> = Box<dyn FnOnce(Option<T>, Option<E>) + Send>;

/// Callback handed to a tagged-result API
pub type ResultCallback<T, E> = Box<dyn FnOnce(Outcome<T, E>) + Send>;

/// Turn a `(value, error)` pair into an outcome
pub fn outcome_from_parts<T, E>(value: Option<T>, error: Option<E>) -> Outcome<T, E>
where
    E: From<FutureError>,
{
    match (value, error) {
        (Some(value), _) => Ok(value),
        (None, Some(error)) => Err(error),
        (None, None) => Err(E::from(FutureError::MalformedAdapterInput)),
    }
}

/// Wrap an API that completes through a `(Option<T>, Option<E>)` callback.
///
/// `start` runs on `context` and receives the callback to pass along. A
/// panic inside `start` fails the cell with [`FutureError::Panicked`].
pub fn wrap_optional<T, E, S>(context: &Context, start: S) -> Cell<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + From<FutureError> + 'static,
    S: FnOnce(OptionalCallback<T, E>) + Send + 'static,
{
    Promise::with_work(context, move |resolver| {
        start(Box::new(move |value, error| {
            resolver.complete(outcome_from_parts(value, error));
        }));
        Ok(())
    })
    .cell()
}

/// Wrap an API that completes through a tagged-result callback.
pub fn wrap_result<T, E, S>(context: &Context, start: S) -> Cell<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + From<FutureError> + 'static,
    S: FnOnce(ResultCallback<T, E>) + Send + 'static,
{
    Promise::with_work(context, move |resolver| {
        start(Box::new(move |outcome| {
            resolver.complete(outcome);
        }));
        Ok(())
    })
    .cell()
}
