//! Move legality rules for checkers.
//!
//! This module contains pure functions that classify proposed moves.
//! [`evaluate_move`] is the single place legality is decided; everything
//! else (transitions, move listing, the server) asks it.

pub mod evaluate;
pub mod geometry;
pub mod legal;

pub use evaluate::evaluate_move;
pub use geometry::{classify_step, Step};
pub use legal::legal_moves;
