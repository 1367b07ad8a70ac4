//! Collection combinators
//!
//! Derive one cell from many:
//! - [`all`]: every value, in input order, or the first failure observed
//! - [`race`] / [`first_completed`]: the first outcome observed, either way
//! - [`race_either`]: race two cells of different types
//! - [`zip`] / [`zip3`]: a tuple of values once every input succeeded
//!
//! "First observed" means whichever input's listener wins the settle race on
//! the derived cell. Under concurrent failures that choice is
//! nondeterministic; no tie-break by input position is attempted.
//!
//! Losing inputs are not cancelled. Their later outcomes reach a derived cell
//! that has already settled and are discarded.

use parking_lot::Mutex;
use settle_concurrency::{Cell, Promise};
use settle_core::{Context, Either, FutureError};
use std::sync::Arc;
use tracing::trace;

/// Values gathered so far by `all`
struct Gather<T> {
    values: Vec<Option<T>>,
    remaining: usize,
}

/// Succeed with every value, in input order, once all inputs succeed.
///
/// Fails as soon as any input fails, without waiting for the others. An
/// empty input succeeds immediately with an empty vector.
pub fn all<T, E, I>(context: &Context, cells: I) -> Cell<Vec<T>, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    I: IntoIterator<Item = Cell<T, E>>,
{
    let cells: Vec<Cell<T, E>> = cells.into_iter().collect();
    if cells.is_empty() {
        return Cell::succeeded(Vec::new());
    }

    let promise = Promise::new();
    let gather = Arc::new(Mutex::new(Gather {
        values: vec![None; cells.len()],
        remaining: cells.len(),
    }));
    trace!(inputs = cells.len(), cell = promise.cell().id(), "Gathering cells");

    for (index, cell) in cells.iter().enumerate() {
        let resolver = promise.resolver();
        let gather = Arc::clone(&gather);
        cell.on_complete(context, move |outcome| match outcome {
            Ok(value) => {
                let complete = {
                    let mut g = gather.lock();
                    g.values[index] = Some(value);
                    g.remaining -= 1;
                    if g.remaining == 0 {
                        // Every input confirmed successful: assemble in order
                        let values = std::mem::take(&mut g.values);
                        values.into_iter().collect::<Option<Vec<T>>>()
                    } else {
                        None
                    }
                };
                if let Some(values) = complete {
                    resolver.settle(values);
                }
            }
            Err(error) => {
                resolver.fail(error);
            }
        });
    }
    promise.cell()
}

/// Settle with the outcome of whichever input settles first.
///
/// An empty input fails immediately with [`FutureError::EmptyRace`].
pub fn race<T, E, I>(context: &Context, cells: I) -> Cell<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static + From<FutureError>,
    I: IntoIterator<Item = Cell<T, E>>,
{
    let cells: Vec<Cell<T, E>> = cells.into_iter().collect();
    if cells.is_empty() {
        return Cell::failed(E::from(FutureError::EmptyRace));
    }

    let promise = Promise::new();
    for cell in &cells {
        let resolver = promise.resolver();
        cell.on_complete(context, move |outcome| {
            resolver.complete(outcome);
        });
    }
    promise.cell()
}

/// Alias of [`race`] for collections
pub fn first_completed<T, E, I>(context: &Context, cells: I) -> Cell<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static + From<FutureError>,
    I: IntoIterator<Item = Cell<T, E>>,
{
    race(context, cells)
}

/// Race two cells of different types
pub fn race_either<A, B, E>(
    context: &Context,
    first: &Cell<A, E>,
    second: &Cell<B, E>,
) -> Cell<Either<A, B>, E>
where
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    let promise = Promise::new();
    let left = promise.resolver();
    first.on_complete(context, move |outcome| {
        left.complete(outcome.map(Either::Left));
    });
    let right = promise.resolver();
    second.on_complete(context, move |outcome| {
        right.complete(outcome.map(Either::Right));
    });
    promise.cell()
}

/// Succeed with both values once both inputs succeed.
///
/// Fails with whichever failure is observed first.
pub fn zip<A, B, E>(
    context: &Context,
    first: &Cell<A, E>,
    second: &Cell<B, E>,
) -> Cell<(A, B), E>
where
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    let promise = Promise::new();
    let pair: Arc<Mutex<(Option<A>, Option<B>)>> = Arc::new(Mutex::new((None, None)));

    let resolver = promise.resolver();
    let slots = Arc::clone(&pair);
    first.on_complete(context, move |outcome| match outcome {
        Ok(a) => {
            let both = {
                let mut p = slots.lock();
                p.0 = Some(a);
                take_pair(&mut p)
            };
            if let Some(values) = both {
                resolver.settle(values);
            }
        }
        Err(error) => {
            resolver.fail(error);
        }
    });

    let resolver = promise.resolver();
    second.on_complete(context, move |outcome| match outcome {
        Ok(b) => {
            let both = {
                let mut p = pair.lock();
                p.1 = Some(b);
                take_pair(&mut p)
            };
            if let Some(values) = both {
                resolver.settle(values);
            }
        }
        Err(error) => {
            resolver.fail(error);
        }
    });

    promise.cell()
}

/// Take both values, only if both are present
fn take_pair<A, B>(pair: &mut (Option<A>, Option<B>)) -> Option<(A, B)> {
    if pair.0.is_some() && pair.1.is_some() {
        match (pair.0.take(), pair.1.take()) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        }
    } else {
        None
    }
}

/// Succeed with all three values once every input succeeds
pub fn zip3<A, B, C, E>(
    context: &Context,
    first: &Cell<A, E>,
    second: &Cell<B, E>,
    third: &Cell<C, E>,
) -> Cell<(A, B, C), E>
where
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
    C: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    let promise = Promise::new();
    let resolver = promise.resolver();
    zip(context, &zip(context, first, second), third).on_complete(context, move |outcome| {
        resolver.complete(outcome.map(|((a, b), c)| (a, b, c)));
    });
    promise.cell()
}

/// Collection combinators on anything that yields cells.
///
/// ```ignore
/// let values = vec![a, b, c].join_all(&ctx);
/// let winner = vec![a, b, c].first_completed(&ctx);
/// ```
pub trait CellsExt<T, E>: IntoIterator<Item = Cell<T, E>> + Sized
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// See [`all`]
    fn join_all(self, context: &Context) -> Cell<Vec<T>, E> {
        all(context, self)
    }

    /// See [`first_completed`]
    fn first_completed(self, context: &Context) -> Cell<T, E>
    where
        E: From<FutureError>,
    {
        race(context, self)
    }
}

impl<T, E, I> CellsExt<T, E> for I
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    I: IntoIterator<Item = Cell<T, E>>,
{
}
