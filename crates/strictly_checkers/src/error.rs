//! Error types for the rules engine.
//!
//! Illegal moves are not errors: [`evaluate_move`](crate::evaluate_move)
//! reports them as [`MoveOutcome::Illegal`](crate::MoveOutcome). The types
//! here cover the two ways a caller can misuse the engine.

use crate::outcome::IllegalReason;
use crate::types::{Move, Square};
use derive_more::{Display, Error, From};

/// A square lies outside the 8x8 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Square {} is outside the 8x8 board", square)]
pub struct OutOfBoundsError {
    /// The offending square.
    pub square: Square,
}

impl OutOfBoundsError {
    /// Creates a new out-of-bounds error.
    pub fn new(square: Square) -> Self {
        Self { square }
    }
}

/// A transition was requested for a move the engine classifies as illegal.
///
/// This means a caller skipped validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Illegal transition {}: {}", mv, reason)]
pub struct IllegalTransitionError {
    /// The rejected move.
    pub mv: Move,
    /// Why the engine rejected it.
    pub reason: IllegalReason,
}

/// Failure of [`apply_move`](crate::apply_move).
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum TransitionError {
    /// The move names a square off the board.
    #[display("{}", _0)]
    OutOfBounds(OutOfBoundsError),
    /// The move is illegal in the given state.
    #[display("{}", _0)]
    IllegalTransition(IllegalTransitionError),
    /// A postcondition failed after applying the move.
    #[display("Invariant violation: {}", _0)]
    #[from(ignore)]
    InvariantViolation(#[error(not(source))] String),
}
