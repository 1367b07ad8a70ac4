//! # Settle
//!
//! Settle-once completion cells and the combinators that compose them.
//!
//! A [`Cell`] starts pending and settles exactly once, with a value or an
//! error. Its [`Promise`] is the producer side. Listeners registered on a
//! cell run once, on the execution context they asked for, whether they
//! were registered before or after settlement.
//!
//! ## Quick Start
//!
//! ```ignore
//! use settle::prelude::*;
//!
//! let ctx = ContextBuilder::new().label("app").build()?;
//!
//! let promise: Promise<u32> = Promise::new();
//! let doubled = promise
//!     .cell()
//!     .map(&ctx, |v| Ok(v * 2))
//!     .timeout(&ctx, Duration::from_secs(1));
//!
//! promise.settle(21);
//! assert_eq!(doubled.await?, 42);
//! ```
//!
//! ## Combinators
//!
//! - [`CellExt`] - map, flat_map, inspect, recover, validate, always
//! - [`all`], [`race`], [`zip`] and friends - combining several cells
//! - [`TimeExt`] - delay and timeout
//! - [`retry()`] - repeated attempts under a [`RetryPolicy`]
//! - [`wrap_optional`] / [`wrap_result`] - callback-style APIs as cells
//!
//! ## Execution Contexts
//!
//! Every handler runs on an [`ExecutionContext`]. [`RuntimeContext`] and
//! [`SerialContext`] run on tokio; enable the `testing` feature for the
//! hand-driven `ManualContext`.

#![warn(missing_docs)]

pub mod prelude;

// Completion primitive
pub use settle_concurrency::{catch_panic, Cell, Listener, Promise, Resolver};

// Shared vocabulary
pub use settle_core::{Context, Either, Error, ExecutionContext, FutureError, Job, Outcome, Result, State};

// Combinators
pub use settle_primitives::{
    all, first_completed, outcome_from_parts, race, race_either, retry, wrap_optional, wrap_result, zip,
    zip3, CellExt, CellsExt, OptionalCallback, ResultCallback, RetryPolicy, TimeExt,
};

// Execution contexts
pub use settle_executor::{ContextBuilder, ContextError, RuntimeContext, SerialContext};

/// Hand-driven execution context for deterministic tests
#[cfg(feature = "testing")]
pub use settle_core::testing;
