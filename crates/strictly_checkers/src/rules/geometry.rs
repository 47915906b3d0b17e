//! Shape of a move, independent of board contents.

use crate::types::{Color, Move};
use tracing::instrument;

/// Geometric class of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// One row and one column diagonally.
    Adjacent {
        /// Signed row delta (`+1` or `-1`).
        row_diff: i8,
    },
    /// Two rows and two columns diagonally.
    Jump {
        /// Signed row delta (`+2` or `-2`).
        row_diff: i8,
    },
    /// Anything else.
    Other,
}

impl Step {
    /// True if the step heads in `color`'s forward direction.
    ///
    /// Always false for [`Step::Other`].
    pub fn is_forward_for(self, color: Color) -> bool {
        match self {
            Step::Adjacent { row_diff } => row_diff == color.forward(),
            Step::Jump { row_diff } => row_diff == 2 * color.forward(),
            Step::Other => false,
        }
    }
}

/// Classifies a move by its row and column deltas.
#[instrument]
pub fn classify_step(mv: Move) -> Step {
    let row_diff = i16::from(mv.to.row) - i16::from(mv.from.row);
    let col_diff = (i16::from(mv.to.col) - i16::from(mv.from.col)).abs();

    match (row_diff.abs(), col_diff) {
        (1, 1) => Step::Adjacent {
            row_diff: row_diff as i8,
        },
        (2, 2) => Step::Jump {
            row_diff: row_diff as i8,
        },
        _ => Step::Other,
    }
}
