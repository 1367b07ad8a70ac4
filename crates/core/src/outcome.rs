//! Outcome and status types
//!
//! A settled cell holds an [`Outcome`]: `Ok` for success, `Err` for
//! failure. There is no "both" or "neither" state; legacy callbacks with
//! two optional arguments are normalized by the adapters before they reach
//! a cell.

use serde::{Deserialize, Serialize};

/// The settled result of a cell.
pub type Outcome<T, E = crate::Error> = std::result::Result<T, E>;

/// Snapshot status of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum State {
    /// No outcome yet
    Pending,
    /// Settled with a value
    Resolved,
    /// Settled with an error
    Rejected,
}

impl State {
    /// Status matching an optional outcome
    pub fn of<T, E>(outcome: Option<&Outcome<T, E>>) -> Self {
        match outcome {
            None => State::Pending,
            Some(Ok(_)) => State::Resolved,
            Some(Err(_)) => State::Rejected,
        }
    }

    /// Check if the cell has settled either way
    pub fn is_settled(&self) -> bool {
        !matches!(self, State::Pending)
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            State::Pending => "pending",
            State::Resolved => "resolved",
            State::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// One of two values, produced by racing cells of different types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Either<A, B> {
    /// The first cell won
    Left(A),
    /// The second cell won
    Right(B),
}

impl<A, B> Either<A, B> {
    /// Check if the first cell won
    pub fn is_left(&self) -> bool {
        matches!(self, Either::Left(_))
    }

    /// Check if the second cell won
    pub fn is_right(&self) -> bool {
        matches!(self, Either::Right(_))
    }

    /// The left value, if any
    pub fn left(self) -> Option<A> {
        match self {
            Either::Left(a) => Some(a),
            Either::Right(_) => None,
        }
    }

    /// The right value, if any
    pub fn right(self) -> Option<B> {
        match self {
            Either::Left(_) => None,
            Either::Right(b) => Some(b),
        }
    }
}
