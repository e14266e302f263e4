//! Piece identifiers

use std::fmt;
use std::str::FromStr;

use super::BoardError;

/// Piece type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    /// Pawn
    Pawn,
    /// Rook
    Rook,
    /// Knight
    Knight,
    /// Bishop
    Bishop,
    /// Queen
    Queen,
    /// King
    King,
}

impl PieceKind {
    /// Every kind, in model-loading order
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::King,
        PieceKind::Queen,
    ];

    /// Lowercase name used in identifiers and asset paths
    pub const fn name(self) -> &'static str {
        match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Rook => "rook",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        }
    }
}

/// Piece color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceColor {
    /// White side, starts on rows 1 and 2
    White,
    /// Black side, starts on rows 7 and 8
    Black,
}

impl PieceColor {
    /// Lowercase name used in identifiers and asset paths
    pub const fn name(self) -> &'static str {
        match self {
            PieceColor::White => "white",
            PieceColor::Black => "black",
        }
    }
}

/// A colored piece. Its identifier is `"{kind}_{color}"`, e.g. `knight_white`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Piece {
    /// Piece type
    pub kind: PieceKind,
    /// Piece color
    pub color: PieceColor,
}

impl Piece {
    /// Create a piece
    pub const fn new(kind: PieceKind, color: PieceColor) -> Self {
        Self { kind, color }
    }

    /// All twelve distinct pieces, white first
    pub fn all() -> impl Iterator<Item = Piece> {
        [PieceColor::White, PieceColor::Black]
            .into_iter()
            .flat_map(|color| PieceKind::ALL.into_iter().map(move |kind| Piece::new(kind, color)))
    }

    /// Identifier string, also the asset directory name
    pub fn id(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.kind.name(), self.color.name())
    }
}

impl FromStr for Piece {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || BoardError::UnknownPiece(s.to_string());
        let (kind, color) = s.split_once('_').ok_or_else(unknown)?;
        let kind = PieceKind::ALL
            .into_iter()
            .find(|k| k.name() == kind)
            .ok_or_else(unknown)?;
        let color = match color {
            "white" => PieceColor::White,
            "black" => PieceColor::Black,
            _ => return Err(unknown()),
        };
        Ok(Piece::new(kind, color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_round_trip() {
        for piece in Piece::all() {
            let parsed: Piece = piece.id().parse().unwrap();
            assert_eq!(parsed, piece);
        }
        assert_eq!(Piece::all().count(), 12);
    }

    #[test]
    fn identifier_format() {
        let knight = Piece::new(PieceKind::Knight, PieceColor::White);
        assert_eq!(knight.id(), "knight_white");
    }

    #[test]
    fn rejects_unknown_identifiers() {
        assert!("".parse::<Piece>().is_err());
        assert!("wizard_white".parse::<Piece>().is_err());
        assert!("rook_green".parse::<Piece>().is_err());
        assert!("rook".parse::<Piece>().is_err());
    }
}
