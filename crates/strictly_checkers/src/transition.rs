//! Applying validated moves.

use crate::contracts::{Contract, MoveContract};
use crate::error::TransitionError;
use crate::state::GameState;
use crate::types::{Move, Piece};
use tracing::{error, info, instrument};

/// Applies a legal move and returns the successor state.
///
/// The move is re-validated with [`evaluate_move`](crate::evaluate_move)
/// for the color of the piece on `mv.from`. An illegal move fails with
/// [`TransitionError::IllegalTransition`]; since `state` is borrowed
/// immutably it is untouched either way.
///
/// Postconditions are checked in debug builds.
#[instrument(skip(state), fields(version = state.version()))]
pub fn apply_move(state: &GameState, mv: Move) -> Result<GameState, TransitionError> {
    let (color, outcome) = MoveContract::pre(state, &mv).inspect_err(|e| {
        error!(%mv, error = %e, "Transition requested for a move that failed validation");
    })?;

    let mut next = state.clone();
    let board = next.board_mut();
    board.set_piece(mv.from, None)?;
    board.set_piece(mv.to, Some(Piece::new(color)))?;

    if let Some(captured) = outcome.captured() {
        board.set_piece(captured, None)?;
        next.captured_mut().increment(color.opponent());
    }
    next.advance();

    #[cfg(debug_assertions)]
    MoveContract::post(state, &next)?;

    info!(
        %mv,
        %color,
        %outcome,
        version = next.version(),
        "Move applied"
    );
    Ok(next)
}
