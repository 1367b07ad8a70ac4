//! Combinators over settle cells
//!
//! Every combinator returns a new cell driven by listeners on its inputs:
//! - `chain`: map, flat_map, inspect, recover, validate, always
//! - `collection`: all, race, first_completed, race_either, zip, zip3
//! - `time`: delay and timeout on the context's timer
//! - `retry`: repeated attempts under a [`RetryPolicy`]
//! - `adapter`: callback-style completion APIs wrapped as cells
//!
//! Combinators never block and never run user code inline; every handler
//! is submitted to the execution context passed in.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapter;
pub mod chain;
pub mod collection;
pub mod retry;
pub mod time;

pub use adapter::{outcome_from_parts, wrap_optional, wrap_result, OptionalCallback, ResultCallback};
pub use chain::CellExt;
pub use collection::{all, first_completed, race, race_either, zip, zip3, CellsExt};
pub use retry::{retry, RetryPolicy};
pub use time::TimeExt;
