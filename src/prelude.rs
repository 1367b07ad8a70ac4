//! Convenient imports for settle.
//!
//! ```ignore
//! use settle::prelude::*;
//!
//! let ctx = ContextBuilder::new().serial().build()?;
//! let cell = Cell::<u32>::succeeded(1).map(&ctx, |v| Ok(v + 1));
//! ```

// Completion primitive
pub use crate::{Cell, Promise, Resolver};

// Error handling
pub use crate::{Error, FutureError, Result};

// Combinators
pub use crate::{all, race, retry, zip, CellExt, CellsExt, RetryPolicy, TimeExt};

// Contexts
pub use crate::{Context, ContextBuilder, ExecutionContext, RuntimeContext, SerialContext};

// Shared types
pub use crate::{Either, Outcome, State};

pub use std::time::Duration;
