//! Enumeration of legal moves.

use super::evaluate::evaluate_move;
use crate::outcome::MoveOutcome;
use crate::state::GameState;
use crate::types::{Color, Move};
use tracing::instrument;

/// Lists every legal move for `color` together with its outcome.
///
/// Candidates are the four forward squares (two steps, two jumps) of each
/// piece, each run through [`evaluate_move`]. Moves come out in row-major
/// order of their source square.
#[instrument(skip(state), fields(version = state.version()))]
pub fn legal_moves(state: &GameState, color: Color) -> Vec<(Move, MoveOutcome)> {
    let forward = color.forward();
    state
        .board()
        .pieces()
        .filter(|(_, piece)| piece.color == color)
        .flat_map(|(from, _)| {
            [
                from.offset(forward, -1),
                from.offset(forward, 1),
                from.offset(2 * forward, -2),
                from.offset(2 * forward, 2),
            ]
            .into_iter()
            .filter(|to| to.is_on_board())
            .map(move |to| Move::new(from, to))
        })
        .filter_map(|mv| match evaluate_move(state, mv, color) {
            Ok(outcome) if outcome.is_legal() => Some((mv, outcome)),
            _ => None,
        })
        .collect()
}
