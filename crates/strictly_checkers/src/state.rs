//! Authoritative game state.

use crate::board::Board;
use crate::types::{CapturedCounts, Color, Move, RulesConfig, TurnPolicy};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Complete snapshot of a game at one point in time.
///
/// A state is a value: transitions produce a new state and never touch
/// the old one. `version` counts the moves applied since the start, so two
/// participants holding the same version of the same game hold equal states.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    turn: Option<Color>,
    captured: CapturedCounts,
    version: u64,
}

impl GameState {
    /// Standard starting position under the given rules.
    #[instrument]
    pub fn initial(config: RulesConfig) -> Self {
        let turn = match config.turn_policy {
            TurnPolicy::Strict => Some(config.first_to_move),
            TurnPolicy::Free => None,
        };
        Self {
            board: Board::standard(),
            turn,
            captured: CapturedCounts::default(),
            version: 0,
        }
    }

    /// Builds a state from an arbitrary position.
    ///
    /// `turn` of `None` disables turn enforcement.
    #[instrument(skip(board))]
    pub fn from_parts(board: Board, turn: Option<Color>, captured: CapturedCounts) -> Self {
        Self {
            board,
            turn,
            captured,
            version: 0,
        }
    }

    /// Replays moves from the starting position.
    ///
    /// Fails on the first move the engine rejects.
    #[instrument(skip(moves), fields(count = moves.len()))]
    pub fn replay(
        config: RulesConfig,
        moves: &[Move],
    ) -> Result<Self, crate::error::TransitionError> {
        moves
            .iter()
            .try_fold(Self::initial(config), |state, mv| crate::apply_move(&state, *mv))
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side to move, or `None` when turns are not enforced.
    pub fn turn(&self) -> Option<Color> {
        self.turn
    }

    /// Turn policy this state was created under.
    pub fn turn_policy(&self) -> TurnPolicy {
        match self.turn {
            Some(_) => TurnPolicy::Strict,
            None => TurnPolicy::Free,
        }
    }

    /// Capture tallies.
    pub fn captured(&self) -> CapturedCounts {
        self.captured
    }

    /// Number of moves applied to reach this state.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub(crate) fn captured_mut(&mut self) -> &mut CapturedCounts {
        &mut self.captured
    }

    /// Flips the turn (if enforced) and bumps the version.
    pub(crate) fn advance(&mut self) {
        self.turn = self.turn.map(Color::opponent);
        self.version += 1;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial(RulesConfig::default())
    }
}

/// Standard starting state with default rules.
#[instrument]
pub fn initial_state() -> GameState {
    GameState::initial(RulesConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PIECES_PER_SIDE;

    #[test]
    fn test_initial_state() {
        let state = initial_state();
        assert_eq!(state.turn(), Some(Color::White));
        assert_eq!(state.captured(), CapturedCounts::default());
        assert_eq!(state.version(), 0);
        assert_eq!(state.board().count(Color::White), PIECES_PER_SIDE);
        assert_eq!(state.board().count(Color::Black), PIECES_PER_SIDE);
    }

    #[test]
    fn test_free_policy_has_no_turn() {
        let config = RulesConfig {
            turn_policy: TurnPolicy::Free,
            ..RulesConfig::default()
        };
        let state = GameState::initial(config);
        assert_eq!(state.turn(), None);
        assert_eq!(state.turn_policy(), TurnPolicy::Free);
    }

    #[test]
    fn test_first_to_move_is_configurable() {
        let config = RulesConfig {
            turn_policy: TurnPolicy::Strict,
            first_to_move: Color::Black,
        };
        assert_eq!(GameState::initial(config).turn(), Some(Color::Black));
    }

    #[test]
    fn test_state_serializes() {
        let state = initial_state();
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }
}
