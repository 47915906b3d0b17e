//! Contract-based validation for move transitions.
//!
//! Contracts state what must hold before a move is applied and what must
//! hold after: {P} apply {Q}.

use crate::error::{IllegalTransitionError, TransitionError};
use crate::invariants::check_transition;
use crate::outcome::MoveOutcome;
use crate::rules::evaluate_move;
use crate::state::GameState;
use crate::types::{Color, Move};
use tracing::{instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// Preconditions and postconditions for a state transition.
pub trait Contract<S, A> {
    /// What the precondition yields on success.
    type Approval;

    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<Self::Approval, TransitionError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), TransitionError>;
}

// ─────────────────────────────────────────────────────────────
//  Move Contract
// ─────────────────────────────────────────────────────────────

/// Contract for [`apply_move`](crate::apply_move).
///
/// Precondition: [`evaluate_move`] classifies the move as legal for the
/// color of the piece on its source square.
///
/// Postconditions:
/// - the move introduced no position invariant violation
/// - [`CaptureAccountingInvariant`](crate::CaptureAccountingInvariant) holds
/// - the version advanced by one
pub struct MoveContract;

impl MoveContract {
    /// Color of the piece on the move's source square, if any.
    fn mover(state: &GameState, mv: &Move) -> Result<Option<Color>, TransitionError> {
        Ok(state.board().piece_at(mv.from)?.map(|piece| piece.color))
    }
}

impl Contract<GameState, Move> for MoveContract {
    type Approval = (Color, MoveOutcome);

    #[instrument(skip(state), fields(version = state.version()))]
    fn pre(state: &GameState, mv: &Move) -> Result<Self::Approval, TransitionError> {
        // An empty source still goes through evaluation so the reason is
        // reported the same way as any other rejection.
        let color = Self::mover(state, mv)?
            .or(state.turn())
            .unwrap_or(Color::White);

        match evaluate_move(state, *mv, color)? {
            MoveOutcome::Illegal(reason) => Err(IllegalTransitionError { mv: *mv, reason }.into()),
            outcome => Ok((color, outcome)),
        }
    }

    fn post(before: &GameState, after: &GameState) -> Result<(), TransitionError> {
        check_transition(before, after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            warn!(%descriptions, "Move broke an invariant");
            TransitionError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })?;

        if after.version() != before.version() + 1 {
            return Err(TransitionError::InvariantViolation(
                "Postcondition failed: version did not advance by one".to_string(),
            ));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Tests
// ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::IllegalReason;
    use crate::board::Board;
    use crate::state::initial_state;
    use crate::types::{CapturedCounts, Piece, Square};

    #[test]
    fn test_precondition_legal_move() {
        let state = initial_state();
        let mv = Move::new(Square::new(5, 0), Square::new(4, 1));
        assert_eq!(
            MoveContract::pre(&state, &mv),
            Ok((Color::White, MoveOutcome::LegalSimple))
        );
    }

    #[test]
    fn test_precondition_empty_source() {
        let state = initial_state();
        let mv = Move::new(Square::new(4, 1), Square::new(3, 2));
        assert_eq!(
            MoveContract::pre(&state, &mv),
            Err(TransitionError::IllegalTransition(IllegalTransitionError {
                mv,
                reason: IllegalReason::NoPieceAtSource,
            }))
        );
    }

    #[test]
    fn test_precondition_wrong_turn() {
        let state = initial_state();
        let mv = Move::new(Square::new(2, 1), Square::new(3, 0));
        assert!(matches!(
            MoveContract::pre(&state, &mv),
            Err(TransitionError::IllegalTransition(IllegalTransitionError {
                reason: IllegalReason::WrongTurnOrColor,
                ..
            }))
        ));
    }

    #[test]
    fn test_postcondition_holds_after_move() {
        let before = initial_state();
        let after = crate::apply_move(&before, Move::new(Square::new(5, 0), Square::new(4, 1)))
            .unwrap();
        assert!(MoveContract::post(&before, &after).is_ok());
    }

    #[test]
    fn test_postcondition_detects_vanished_piece() {
        let before = initial_state();
        let mut after = crate::apply_move(&before, Move::new(Square::new(5, 0), Square::new(4, 1)))
            .unwrap();
        after.board_mut().set_piece(Square::new(0, 1), None).unwrap();
        assert!(MoveContract::post(&before, &after).is_err());
    }

    #[test]
    fn test_postcondition_detects_misplaced_piece() {
        let before = initial_state();
        let mut after = crate::apply_move(&before, Move::new(Square::new(5, 0), Square::new(4, 1)))
            .unwrap();
        after
            .board_mut()
            .set_piece(Square::new(4, 1), None)
            .unwrap();
        after
            .board_mut()
            .set_piece(Square::new(4, 0), Some(Piece::new(Color::White)))
            .unwrap();
        assert!(MoveContract::post(&before, &after).is_err());
    }

    #[test]
    fn test_postcondition_tolerates_inherited_violation() {
        let mut board = Board::empty();
        board
            .set_piece(Square::new(0, 0), Some(Piece::new(Color::Black)))
            .unwrap();
        board
            .set_piece(Square::new(5, 0), Some(Piece::new(Color::White)))
            .unwrap();
        let before = GameState::from_parts(board, None, CapturedCounts::default());
        let after = crate::apply_move(&before, Move::new(Square::new(5, 0), Square::new(4, 1)))
            .unwrap();
        assert!(MoveContract::post(&before, &after).is_ok());
    }
}
