//! Board / game state
//!
//! An 8x8 grid of optional pieces addressed by [`Square`], plus the mapping
//! from squares to world-space positions on the board mesh.

mod piece;
mod square;

pub use piece::{Piece, PieceColor, PieceKind};
pub use square::{Square, BOARD_SIZE};

use crate::foundation::math::Vec3;
use thiserror::Error;

/// World-space x/y of the centre of square a1
const ORIGIN_OFFSET: f32 = -3.5;

/// Board errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Row outside `1..=8`
    #[error("row {0} is outside 1..=8")]
    RowOutOfRange(u8),

    /// Column outside `'a'..='h'`
    #[error("column '{0}' is outside a..=h")]
    ColumnOutOfRange(char),

    /// Zero-based index outside the grid
    #[error("grid index ({row_index}, {column_index}) is outside the board")]
    IndexOutOfRange {
        /// Row index
        row_index: usize,
        /// Column index
        column_index: usize,
    },

    /// Unparseable square name
    #[error("invalid square: {0:?}")]
    InvalidSquare(String),

    /// Unparseable piece identifier
    #[error("unknown piece identifier: {0:?}")]
    UnknownPiece(String),
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Fixed-size chess board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<Piece>; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self {
            cells: [[None; BOARD_SIZE as usize]; BOARD_SIZE as usize],
        }
    }

    /// Create a board in the standard starting position
    pub fn standard() -> Self {
        let mut board = Self::new();
        for (column_index, kind) in BACK_RANK.into_iter().enumerate() {
            board.cells[0][column_index] = Some(Piece::new(kind, PieceColor::White));
            board.cells[1][column_index] = Some(Piece::new(PieceKind::Pawn, PieceColor::White));
            board.cells[6][column_index] = Some(Piece::new(PieceKind::Pawn, PieceColor::Black));
            board.cells[7][column_index] = Some(Piece::new(kind, PieceColor::Black));
        }
        board
    }

    /// Piece on `square`, if any
    pub fn get_piece(&self, square: Square) -> Option<Piece> {
        self.cells[square.row_index()][square.column_index()]
    }

    /// Place or clear a piece
    pub fn set_piece(&mut self, square: Square, piece: Option<Piece>) {
        self.cells[square.row_index()][square.column_index()] = piece;
    }

    /// World-space centre of `square`: `(-3.5 + column_index, -3.5 + row_index, 0)`
    pub fn get_position(&self, square: Square) -> Vec3 {
        Vec3::new(
            ORIGIN_OFFSET + square.column_index() as f32,
            ORIGIN_OFFSET + square.row_index() as f32,
            0.0,
        )
    }

    /// Occupied squares in row-major order
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|square| self.get_piece(square).map(|piece| (square, piece)))
    }

    /// Number of occupied squares
    pub fn occupied_count(&self) -> usize {
        self.occupied().count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn standard_position_has_sixteen_pieces_per_side() {
        let board = Board::standard();
        assert_eq!(board.occupied_count(), 32);

        let white = board.occupied().filter(|(_, p)| p.color == PieceColor::White).count();
        let black = board.occupied().filter(|(_, p)| p.color == PieceColor::Black).count();
        assert_eq!((white, black), (16, 16));

        for row in 3..=6 {
            for column in 'a'..='h' {
                assert_eq!(board.get_piece(Square::new(row, column).unwrap()), None);
            }
        }
    }

    #[test]
    fn standard_back_ranks() {
        let board = Board::standard();
        assert_eq!(board.get_piece(sq("a1")).unwrap().id(), "rook_white");
        assert_eq!(board.get_piece(sq("b1")).unwrap().id(), "knight_white");
        assert_eq!(board.get_piece(sq("d1")).unwrap().id(), "queen_white");
        assert_eq!(board.get_piece(sq("e1")).unwrap().id(), "king_white");
        assert_eq!(board.get_piece(sq("e8")).unwrap().id(), "king_black");
        assert_eq!(board.get_piece(sq("c7")).unwrap().id(), "pawn_black");
        assert_eq!(board.get_piece(sq("h2")).unwrap().id(), "pawn_white");
    }

    #[test]
    fn position_is_affine_in_indices() {
        let board = Board::new();
        assert_relative_eq!(board.get_position(sq("a1")), Vec3::new(-3.5, -3.5, 0.0));
        assert_relative_eq!(board.get_position(sq("h8")), Vec3::new(3.5, 3.5, 0.0));

        for square in Square::all() {
            let expected = Vec3::new(-3.5, -3.5, 0.0)
                + Vec3::new(square.column_index() as f32, square.row_index() as f32, 0.0);
            assert_relative_eq!(board.get_position(square), expected);
        }
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut board = Board::new();
        let queen = Piece::new(PieceKind::Queen, PieceColor::Black);
        for square in Square::all() {
            board.set_piece(square, Some(queen));
            assert_eq!(board.get_piece(square), Some(queen));
            board.set_piece(square, None);
            assert_eq!(board.get_piece(square), None);
        }
    }
}
