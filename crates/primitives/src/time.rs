//! Timer-gated combinators
//!
//! Both use the timer facility of the execution context passed in
//! (`ExecutionContext::execute_after`); nothing here owns a clock.

use crate::chain::forward;
use settle_concurrency::{Cell, Promise};
use settle_core::{Context, FutureError};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Timing combinators over a [`Cell`].
pub trait TimeExt<T, E>: Sized {
    /// Forward this cell's outcome no earlier than `duration` from now
    fn delay(&self, context: &Context, duration: Duration) -> Cell<T, E>;

    /// Race this cell against a timer failing with [`FutureError::Timeout`].
    ///
    /// If the timer wins, a later outcome of this cell is discarded; the
    /// derived cell is never corrected after the fact.
    fn timeout(&self, context: &Context, duration: Duration) -> Cell<T, E>
    where
        E: From<FutureError>;
}

impl<T, E> TimeExt<T, E> for Cell<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn delay(&self, context: &Context, duration: Duration) -> Cell<T, E> {
        let promise = Promise::new();
        let resolver = promise.resolver();
        let source = self.clone();
        let listen_on = Arc::clone(context);
        context.execute_after(
            duration,
            Box::new(move || forward(&listen_on, &source, resolver)),
        );
        promise.cell()
    }

    fn timeout(&self, context: &Context, duration: Duration) -> Cell<T, E>
    where
        E: From<FutureError>,
    {
        let promise = Promise::new();
        let timer = promise.resolver();
        let source_id = self.id();
        context.execute_after(
            duration,
            Box::new(move || {
                if timer.fail(E::from(FutureError::Timeout(duration))) {
                    warn!(cell = source_id, ?duration, "Cell timed out");
                }
            }),
        );
        forward(context, self, promise.resolver());
        promise.cell()
    }
}
