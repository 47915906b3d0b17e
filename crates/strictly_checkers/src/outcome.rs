//! Classification of proposed moves.

use crate::types::Square;
use serde::{Deserialize, Serialize};

/// Why a proposed move was rejected.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IllegalReason {
    /// The source square is empty.
    NoPieceAtSource,
    /// The piece belongs to the other side, or it is not this side's turn.
    WrongTurnOrColor,
    /// The destination already holds a piece.
    DestinationOccupied,
    /// The destination is a non-playable square.
    DestinationNotPlayable,
    /// The geometry is neither a forward step nor a forward jump.
    NotDiagonalAdjacentOrJump,
    /// The jumped square holds a piece of the moving side.
    CaptureRequiresOpponentAtMidpoint,
    /// The jumped square is empty.
    CaptureMidpointEmpty,
}

impl IllegalReason {
    /// Human-readable explanation suitable for showing to the proposer.
    pub fn describe(self) -> &'static str {
        match self {
            Self::NoPieceAtSource => "there is no piece on the source square",
            Self::WrongTurnOrColor => "that piece cannot be moved by this side right now",
            Self::DestinationOccupied => "the destination square is occupied",
            Self::DestinationNotPlayable => "pieces only stand on dark squares",
            Self::NotDiagonalAdjacentOrJump => {
                "pieces move one square diagonally forward or jump two"
            }
            Self::CaptureRequiresOpponentAtMidpoint => "you can only jump over an opposing piece",
            Self::CaptureMidpointEmpty => "there is no piece to jump over",
        }
    }
}

/// Result of evaluating a move against a game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum MoveOutcome {
    /// The move breaks a rule.
    Illegal(IllegalReason),
    /// One-step diagonal move, nothing captured.
    LegalSimple,
    /// Two-step jump removing the piece on the given square.
    LegalCapture(Square),
}

impl MoveOutcome {
    /// True for either legal variant.
    pub fn is_legal(&self) -> bool {
        !matches!(self, MoveOutcome::Illegal(_))
    }

    /// The captured square, if this is a capture.
    pub fn captured(&self) -> Option<Square> {
        match self {
            MoveOutcome::LegalCapture(square) => Some(*square),
            _ => None,
        }
    }

    /// The rejection reason, if illegal.
    pub fn illegal_reason(&self) -> Option<IllegalReason> {
        match self {
            MoveOutcome::Illegal(reason) => Some(*reason),
            _ => None,
        }
    }
}

impl std::fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveOutcome::Illegal(reason) => write!(f, "illegal ({})", reason),
            MoveOutcome::LegalSimple => write!(f, "legal"),
            MoveOutcome::LegalCapture(square) => write!(f, "legal, captures {}", square),
        }
    }
}
