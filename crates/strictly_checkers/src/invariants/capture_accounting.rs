//! Pieces leave the board only by being captured.

use super::{Invariant, StatePair};
use crate::state::GameState;

/// Invariant: between two consecutive states the number of pieces on the
/// board drops by exactly the number of new captures, and at most one
/// piece is captured.
pub struct CaptureAccountingInvariant;

impl Invariant<StatePair<'_>> for CaptureAccountingInvariant {
    fn holds(pair: &StatePair<'_>) -> bool {
        let pieces = |state: &GameState| state.board().pieces().count() as u32;
        let removed = pieces(pair.before).checked_sub(pieces(pair.after));
        let captured = pair
            .after
            .captured()
            .total()
            .checked_sub(pair.before.captured().total());

        matches!(
            (removed, captured),
            (Some(removed), Some(captured)) if removed == captured && captured <= 1
        )
    }

    fn description() -> &'static str {
        "Board pieces drop by exactly the captures recorded, at most one per move"
    }
}
