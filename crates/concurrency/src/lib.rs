//! Completion primitive for settle
//!
//! This crate implements the settle-once cell and its producer side:
//! - Cell: pending / settled status behind a single per-cell lock
//! - Listener registry: ordered handlers fired exactly once on settlement
//! - Promise / Resolver: the only way to settle a cell
//! - Dispatch through execution contexts, never inline
//!
//! Combinators built on top of cells live in `settle-primitives`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cell;
pub mod listener;
pub mod promise;

pub use cell::Cell;
pub use listener::{CompletionHandler, FailureHandler, Listener, SuccessHandler};
pub use promise::{catch_panic, Promise, Resolver};

// Re-export the shared vocabulary from core for convenience
pub use settle_core::{Context, ExecutionContext, Outcome, State};
