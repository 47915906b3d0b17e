//! 8x8 checkers board.
//!
//! The board is a plain occupancy store. It answers queries and performs
//! writes, and holds no rule knowledge beyond the playable-square parity.

use crate::error::OutOfBoundsError;
use crate::types::{Color, Piece, Square, BOARD_SIZE, PIECES_PER_SIDE};
use serde::{Deserialize, Serialize};
use tracing::instrument;

const SIDE: usize = BOARD_SIZE as usize;

/// Cell occupancy in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [[Option<Piece>; SIDE]; SIDE],
}

impl Board {
    /// Creates a board with no pieces.
    pub fn empty() -> Self {
        Self {
            cells: [[None; SIDE]; SIDE],
        }
    }

    /// Creates the standard starting layout.
    ///
    /// Black fills the playable squares of rows 0-2, White those of rows 5-7.
    #[instrument]
    pub fn standard() -> Self {
        let mut board = Self::empty();
        for square in Square::all().filter(|s| s.is_playable()) {
            let color = match square.row {
                0..=2 => Color::Black,
                5..=7 => Color::White,
                _ => continue,
            };
            board.cells[square.row as usize][square.col as usize] = Some(Piece::new(color));
        }
        debug_assert_eq!(board.count(Color::White), PIECES_PER_SIDE);
        debug_assert_eq!(board.count(Color::Black), PIECES_PER_SIDE);
        board
    }

    fn index(square: Square) -> Result<(usize, usize), OutOfBoundsError> {
        if square.is_on_board() {
            Ok((square.row as usize, square.col as usize))
        } else {
            Err(OutOfBoundsError::new(square))
        }
    }

    /// Returns the piece on a square.
    pub fn piece_at(&self, square: Square) -> Result<Option<Piece>, OutOfBoundsError> {
        let (row, col) = Self::index(square)?;
        Ok(self.cells[row][col])
    }

    /// Writes a square unconditionally.
    ///
    /// No rule is checked here. Game states only change through
    /// [`apply_move`](crate::apply_move).
    pub fn set_piece(
        &mut self,
        square: Square,
        piece: Option<Piece>,
    ) -> Result<(), OutOfBoundsError> {
        let (row, col) = Self::index(square)?;
        self.cells[row][col] = piece;
        Ok(())
    }

    /// True iff the square can ever hold a piece.
    pub fn is_playable_square(&self, square: Square) -> bool {
        square.is_playable()
    }

    /// True if the square is on the board and unoccupied.
    pub fn is_empty(&self, square: Square) -> bool {
        matches!(self.piece_at(square), Ok(None))
    }

    /// Iterates occupied squares in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|square| {
            self.cells[square.row as usize][square.col as usize].map(|piece| (square, piece))
        })
    }

    /// Number of pieces of a color on the board.
    pub fn count(&self, color: Color) -> usize {
        self.pieces().filter(|(_, p)| p.color == color).count()
    }

    /// Formats the board as plain text, row 0 first.
    ///
    /// `w`/`b` mark pieces, `.` an empty playable square, and a space an
    /// unplayable square.
    pub fn display(&self) -> String {
        let mut result = String::from("  01234567\n");
        for row in 0..BOARD_SIZE {
            result.push_str(&row.to_string());
            result.push(' ');
            for col in 0..BOARD_SIZE {
                let square = Square::new(row, col);
                let symbol = match self.cells[row as usize][col as usize] {
                    Some(piece) => piece.symbol(),
                    None if square.is_playable() => '.',
                    None => ' ',
                };
                result.push(symbol);
            }
            result.push('\n');
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}
