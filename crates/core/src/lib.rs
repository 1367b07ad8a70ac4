//! Core types for settle
//!
//! This crate defines the vocabulary shared by every other settle crate:
//! - [`Outcome`] and [`State`]: the settled result of a cell and its snapshot status
//! - [`ExecutionContext`]: the external collaborator that runs dispatched work
//! - [`FutureError`] and [`Error`]: the combinator error taxonomy and the default error type
//! - [`Either`]: result of racing two cells of different types
//!
//! No cell logic lives here. See `settle-concurrency` for the completion cell
//! and `settle-primitives` for the combinators.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod error;
pub mod outcome;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use context::{Context, ExecutionContext, Job};
pub use error::{Error, FutureError, Result};
pub use outcome::{Either, Outcome, State};
