//! The ordered legality decision list.

use super::geometry::{classify_step, Step};
use crate::board::Board;
use crate::error::OutOfBoundsError;
use crate::outcome::{IllegalReason, MoveOutcome};
use crate::state::GameState;
use crate::types::{Color, Move, Piece};
use tracing::{debug, instrument};

/// Classifies a proposed move by `moving_color` in `state`.
///
/// Checks run in a fixed order and stop at the first failure:
///
/// 1. the source holds a piece of `moving_color`, and it is that color's
///    turn when turns are enforced;
/// 2. the destination is playable and empty;
/// 3. the move is a forward diagonal step, or a forward diagonal jump over
///    an opposing piece.
///
/// Fails only when either square is off the board.
#[instrument(skip(state), fields(version = state.version()))]
pub fn evaluate_move(
    state: &GameState,
    mv: Move,
    moving_color: Color,
) -> Result<MoveOutcome, OutOfBoundsError> {
    let board = state.board();
    let source = board.piece_at(mv.from)?;
    let destination = board.piece_at(mv.to)?;

    let outcome = match decide(board, state.turn(), mv, moving_color, source, destination) {
        Ok(outcome) => outcome,
        Err(reason) => MoveOutcome::Illegal(reason),
    };

    debug!(%mv, %moving_color, %outcome, "Evaluated move");
    Ok(outcome)
}

fn decide(
    board: &Board,
    turn: Option<Color>,
    mv: Move,
    moving_color: Color,
    source: Option<Piece>,
    destination: Option<Piece>,
) -> Result<MoveOutcome, IllegalReason> {
    source_belongs_to_mover(source, turn, moving_color)?;
    destination_is_open(board, mv, destination)?;

    match classify_step(mv) {
        step @ Step::Adjacent { .. } if step.is_forward_for(moving_color) => {
            Ok(MoveOutcome::LegalSimple)
        }
        step @ Step::Jump { .. } if step.is_forward_for(moving_color) => {
            let midpoint = mv.from.midpoint(mv.to);
            // On the board whenever both endpoints are.
            match board.piece_at(midpoint).ok().flatten() {
                None => Err(IllegalReason::CaptureMidpointEmpty),
                Some(piece) if piece.color == moving_color => {
                    Err(IllegalReason::CaptureRequiresOpponentAtMidpoint)
                }
                Some(_) => Ok(MoveOutcome::LegalCapture(midpoint)),
            }
        }
        _ => Err(IllegalReason::NotDiagonalAdjacentOrJump),
    }
}

fn source_belongs_to_mover(
    source: Option<Piece>,
    turn: Option<Color>,
    moving_color: Color,
) -> Result<(), IllegalReason> {
    let piece = source.ok_or(IllegalReason::NoPieceAtSource)?;
    if piece.color != moving_color {
        return Err(IllegalReason::WrongTurnOrColor);
    }
    match turn {
        Some(to_move) if to_move != moving_color => Err(IllegalReason::WrongTurnOrColor),
        _ => Ok(()),
    }
}

fn destination_is_open(
    board: &Board,
    mv: Move,
    destination: Option<Piece>,
) -> Result<(), IllegalReason> {
    if !board.is_playable_square(mv.to) {
        return Err(IllegalReason::DestinationNotPlayable);
    }
    if destination.is_some() {
        return Err(IllegalReason::DestinationOccupied);
    }
    Ok(())
}
