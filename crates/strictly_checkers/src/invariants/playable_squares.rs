//! Pieces only ever stand on playable squares.

use super::Invariant;
use crate::state::GameState;

/// Invariant: no piece occupies a square with even `row + col`.
pub struct PlayableSquaresInvariant;

impl Invariant<GameState> for PlayableSquaresInvariant {
    fn holds(state: &GameState) -> bool {
        state.board().pieces().all(|(square, _)| square.is_playable())
    }

    fn description() -> &'static str {
        "Pieces occupy only playable squares"
    }
}
