//! Strictly Checkers - authoritative checkers rules engine
//!
//! This crate is the single source of truth for checkers move legality and
//! game state. It performs no I/O; transports and user interfaces hold
//! read-only projections and submit moves through it.
//!
//! # Architecture
//!
//! - **Board**: 8x8 occupancy store ([`Board`])
//! - **Rules**: the ordered legality decision list ([`evaluate_move`])
//! - **Transition**: applying legal moves ([`apply_move`])
//! - **Contracts/Invariants**: postconditions checked in debug builds
//!
//! # Example
//!
//! ```
//! use strictly_checkers::{apply_move, evaluate_move, initial_state, Color, Move, MoveOutcome, Square};
//!
//! let state = initial_state();
//! let mv = Move::new(Square::new(5, 0), Square::new(4, 1));
//!
//! assert_eq!(evaluate_move(&state, mv, Color::White)?, MoveOutcome::LegalSimple);
//! let next = apply_move(&state, mv)?;
//! assert_eq!(next.turn(), Some(Color::Black));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod contracts;
mod error;
mod invariants;
mod outcome;
mod rules;
mod state;
mod transition;
mod types;

pub use board::Board;
pub use contracts::{Contract, MoveContract};
pub use error::{IllegalTransitionError, OutOfBoundsError, TransitionError};
pub use invariants::{
    check_state, check_transition, CaptureAccountingInvariant, CheckersInvariants, Invariant,
    InvariantSet, InvariantViolation, PieceBudgetInvariant, PlayableSquaresInvariant, StatePair,
};
pub use outcome::{IllegalReason, MoveOutcome};
pub use rules::{classify_step, evaluate_move, legal_moves, Step};
pub use state::{initial_state, GameState};
pub use transition::apply_move;
pub use types::{
    CapturedCounts, Color, Move, Piece, RulesConfig, Square, TurnPolicy, BOARD_SIZE,
    PIECES_PER_SIDE,
};
