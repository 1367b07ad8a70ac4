//! tokio-backed execution contexts
//!
//! Cells submit every listener to an [`ExecutionContext`]. This crate
//! supplies implementations on top of a tokio runtime:
//!
//! - [`RuntimeContext`]: concurrent, one blocking task per job
//! - [`SerialContext`]: one job at a time, in submission order
//! - [`ContextBuilder`]: picks one and binds it to a runtime handle
//!
//! The completion and combinator crates never depend on this one.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod runtime;
pub mod serial;

pub use builder::{ContextBuilder, ContextError, Ordering};
pub use runtime::RuntimeContext;
pub use serial::SerialContext;

pub use settle_core::{Context, ExecutionContext};
