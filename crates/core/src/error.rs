//! Error types for settle.
//!
//! Two layers:
//! - [`FutureError`]: conditions raised by the combinators themselves
//!   (empty race, timeout, failed validation, malformed adapter input,
//!   panicking work). Any error type used with a combinator that can raise
//!   one of these must implement `From<FutureError>`.
//! - [`Error`]: the default failure type of a cell. It carries either a
//!   combinator condition or an arbitrary user error, and is `Clone` so an
//!   outcome can be handed to every listener of a cell.

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Conditions raised by combinators.
///
/// These are domain conditions, not transport errors: they describe why a
/// derived cell failed without any user error being involved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FutureError {
    /// `race` was called with no cells
    #[error("race called with no cells")]
    EmptyRace,

    /// The source cell did not settle within the allowed duration
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// A validation predicate rejected the value
    #[error("validation failed")]
    ValidationFailed,

    /// A legacy callback supplied neither a value nor an error
    #[error("malformed adapter input: callback supplied neither a value nor an error")]
    MalformedAdapterInput,

    /// The work function of a promise panicked before settling it
    #[error("work panicked: {0}")]
    Panicked(String),
}

/// Default failure type of a cell.
///
/// User errors pass through unchanged inside [`Error::Failed`]; combinator
/// conditions arrive as [`Error::Future`].
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A condition raised by a combinator
    #[error(transparent)]
    Future(#[from] FutureError),

    /// An arbitrary user error
    #[error("{0}")]
    Failed(Arc<dyn StdError + Send + Sync + 'static>),

    /// A user failure described only by a message
    #[error("{0}")]
    Message(String),
}

/// Result type for settle operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an arbitrary error.
    pub fn other<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Error::Failed(Arc::new(error))
    }

    /// Create an error from a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Error::Message(message.into())
    }

    /// The combinator condition, if this error is one.
    pub fn as_future_error(&self) -> Option<&FutureError> {
        match self {
            Error::Future(e) => Some(e),
            _ => None,
        }
    }

    /// Check if this error is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Future(FutureError::Timeout(_)))
    }

    /// Check if this error comes from racing an empty set of cells.
    pub fn is_empty_race(&self) -> bool {
        matches!(self, Error::Future(FutureError::EmptyRace))
    }

    /// Check if this error is a rejected validation.
    pub fn is_validation_failed(&self) -> bool {
        matches!(self, Error::Future(FutureError::ValidationFailed))
    }

    /// Check if this error comes from a malformed legacy callback.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Error::Future(FutureError::MalformedAdapterInput))
    }

    /// Check if this error was produced by a panicking work function.
    pub fn is_panic(&self) -> bool {
        matches!(self, Error::Future(FutureError::Panicked(_)))
    }

    /// Check if this error was produced by user code rather than a combinator.
    pub fn is_user(&self) -> bool {
        matches!(self, Error::Failed(_) | Error::Message(_))
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Error::Message(message)
    }
}

impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Error::Message(message.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::other(e)
    }
}
