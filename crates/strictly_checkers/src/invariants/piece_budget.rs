//! No side ever has more than its starting material.

use super::Invariant;
use crate::state::GameState;
use crate::types::{Color, PIECES_PER_SIDE};
use strum::IntoEnumIterator;

/// Invariant: per color, pieces on board plus pieces captured is at most 12.
///
/// Equality holds for every state reached from the standard start.
pub struct PieceBudgetInvariant;

impl Invariant<GameState> for PieceBudgetInvariant {
    fn holds(state: &GameState) -> bool {
        Color::iter().all(|color| {
            let on_board = state.board().count(color);
            let captured = state.captured().of(color) as usize;
            on_board + captured <= PIECES_PER_SIDE
        })
    }

    fn description() -> &'static str {
        "Each side has at most 12 pieces on board plus captured"
    }
}
