//! Validated board coordinates

use std::fmt;
use std::str::FromStr;

use super::BoardError;

/// Number of rows and columns on the board
pub const BOARD_SIZE: u8 = 8;

/// A square addressed by row `1..=8` and column `'a'..='h'`.
///
/// Out-of-range coordinates are rejected at construction, so every `Square`
/// maps to a valid grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: u8,
    column: u8,
}

impl Square {
    /// Create a square from a row number and a column letter
    pub fn new(row: u8, column: char) -> Result<Self, BoardError> {
        if !(1..=BOARD_SIZE).contains(&row) {
            return Err(BoardError::RowOutOfRange(row));
        }
        if !('a'..='h').contains(&column) {
            return Err(BoardError::ColumnOutOfRange(column));
        }
        Ok(Self {
            row: row - 1,
            column: column as u8 - b'a',
        })
    }

    /// Create a square from zero-based grid indices
    pub fn from_indices(row_index: usize, column_index: usize) -> Result<Self, BoardError> {
        let size = usize::from(BOARD_SIZE);
        if row_index >= size || column_index >= size {
            return Err(BoardError::IndexOutOfRange { row_index, column_index });
        }
        // Both indices are below 8 here.
        Ok(Self {
            row: row_index as u8,
            column: column_index as u8,
        })
    }

    /// Row number, `1..=8`
    pub const fn row(self) -> u8 {
        self.row + 1
    }

    /// Column letter, `'a'..='h'`
    pub const fn column(self) -> char {
        (b'a' + self.column) as char
    }

    /// `row - 1`
    pub const fn row_index(self) -> usize {
        self.row as usize
    }

    /// `column - 'a'`
    pub const fn column_index(self) -> usize {
        self.column as usize
    }

    /// All 64 squares in row-major order (row 1 first, columns a..h)
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |column| Square { row, column }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column(), self.row())
    }
}

impl FromStr for Square {
    type Err = BoardError;

    /// Parse algebraic notation such as `e4`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(column), Some(row), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(BoardError::InvalidSquare(s.to_string()));
        };
        let row = row
            .to_digit(10)
            .ok_or_else(|| BoardError::InvalidSquare(s.to_string()))?;
        Self::new(row as u8, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_offsets_from_origin() {
        let sq = Square::new(1, 'a').unwrap();
        assert_eq!((sq.row_index(), sq.column_index()), (0, 0));

        let sq = Square::new(8, 'h').unwrap();
        assert_eq!((sq.row_index(), sq.column_index()), (7, 7));
        assert_eq!((sq.row(), sq.column()), (8, 'h'));
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert_eq!(Square::new(0, 'a'), Err(BoardError::RowOutOfRange(0)));
        assert_eq!(Square::new(9, 'a'), Err(BoardError::RowOutOfRange(9)));
        assert_eq!(Square::new(1, 'i'), Err(BoardError::ColumnOutOfRange('i')));
        assert!(Square::from_indices(8, 0).is_err());
    }

    #[test]
    fn all_is_row_major_and_complete() {
        let squares: Vec<Square> = Square::all().collect();
        assert_eq!(squares.len(), 64);
        assert_eq!(squares[0].to_string(), "a1");
        assert_eq!(squares[1].to_string(), "b1");
        assert_eq!(squares[8].to_string(), "a2");
        assert_eq!(squares[63].to_string(), "h8");
    }

    #[test]
    fn parses_algebraic_notation() {
        let sq: Square = "e4".parse().unwrap();
        assert_eq!((sq.row(), sq.column()), (4, 'e'));
        assert!("e9".parse::<Square>().is_err());
        assert!("e10".parse::<Square>().is_err());
        assert!("".parse::<Square>().is_err());
    }
}
