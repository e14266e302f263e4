//! # Draw Queue
//!
//! Collects one frame's draw commands. Scene geometry (the board, then the
//! pieces) is drawn by every pass; light markers are kept apart because only
//! the main pass draws them.
//!
//! Pieces are sorted back-to-front (farthest first) so alpha-blended models
//! composite correctly. The sort key is `(distance, row, column)` compared in
//! descending order with `f32::total_cmp`, which makes the order total and
//! deterministic for a fixed camera position.

use crate::board::{Piece, Square};
use crate::foundation::math::{Mat4, Vec3};
use std::cmp::Ordering;

/// What a draw command draws
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawKind {
    /// The board mesh
    Board,
    /// A piece mesh on a square
    Piece {
        /// The piece
        piece: Piece,
        /// The square it stands on
        square: Square,
    },
    /// A light marker cube
    LightMarker {
        /// Tint (the light's diffuse color)
        color: Vec3,
    },
}

/// Individual draw command
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// What to draw
    pub kind: DrawKind,
    /// World transform written to `model`
    pub transform: Mat4,
    /// Distance from the camera
    pub sort_key: f32,
}

impl DrawCommand {
    /// Square a piece command stands on
    pub fn square(&self) -> Option<Square> {
        match self.kind {
            DrawKind::Piece { square, .. } => Some(square),
            _ => None,
        }
    }

    /// Descending `(distance, row, column)` order
    fn back_to_front(a: &Self, b: &Self) -> Ordering {
        b.sort_key
            .total_cmp(&a.sort_key)
            .then_with(|| b.square().cmp(&a.square()))
    }
}

/// One frame's draw commands
#[derive(Debug, Clone, Default)]
pub struct DrawQueue {
    board: Option<DrawCommand>,
    pieces: Vec<DrawCommand>,
    markers: Vec<DrawCommand>,
}

impl DrawQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue with room for `pieces` piece commands and `markers` markers
    pub fn with_capacity(pieces: usize, markers: usize) -> Self {
        Self {
            board: None,
            pieces: Vec::with_capacity(pieces),
            markers: Vec::with_capacity(markers),
        }
    }

    /// Set the board command
    pub fn set_board(&mut self, transform: Mat4) {
        self.board = Some(DrawCommand {
            kind: DrawKind::Board,
            transform,
            sort_key: 0.0,
        });
    }

    /// Queue a piece
    pub fn add_piece(&mut self, piece: Piece, square: Square, transform: Mat4, distance: f32) {
        self.pieces.push(DrawCommand {
            kind: DrawKind::Piece { piece, square },
            transform,
            sort_key: distance,
        });
    }

    /// Queue a light marker
    pub fn add_marker(&mut self, color: Vec3, transform: Mat4) {
        self.markers.push(DrawCommand {
            kind: DrawKind::LightMarker { color },
            transform,
            sort_key: 0.0,
        });
    }

    /// Sort pieces farthest first
    pub fn sort_commands(&mut self) {
        self.pieces.sort_by(DrawCommand::back_to_front);
    }

    /// Board command, if set
    pub fn board(&self) -> Option<&DrawCommand> {
        self.board.as_ref()
    }

    /// Piece commands in queue order
    pub fn pieces(&self) -> &[DrawCommand] {
        &self.pieces
    }

    /// Marker commands
    pub fn markers(&self) -> &[DrawCommand] {
        &self.markers
    }

    /// Board followed by pieces, the geometry every pass draws
    pub fn scene_commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.board.iter().chain(self.pieces.iter())
    }

    /// Total number of commands
    pub fn command_count(&self) -> usize {
        usize::from(self.board.is_some()) + self.pieces.len() + self.markers.len()
    }

    /// Whether the queue holds nothing
    pub fn is_empty(&self) -> bool {
        self.command_count() == 0
    }

    /// Clear all commands for the next frame
    pub fn clear(&mut self) {
        self.board = None;
        self.pieces.clear();
        self.markers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{PieceColor, PieceKind};

    fn pawn() -> Piece {
        Piece::new(PieceKind::Pawn, PieceColor::White)
    }

    fn square(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn new_queue_is_empty() {
        let queue = DrawQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.command_count(), 0);
        assert_eq!(queue.scene_commands().count(), 0);
    }

    #[test]
    fn pieces_sort_farthest_first() {
        let mut queue = DrawQueue::new();
        queue.add_piece(pawn(), square("a2"), Mat4::identity(), 5.0);
        queue.add_piece(pawn(), square("b2"), Mat4::identity(), 10.0);
        queue.add_piece(pawn(), square("c2"), Mat4::identity(), 7.5);
        queue.sort_commands();

        let keys: Vec<f32> = queue.pieces().iter().map(|c| c.sort_key).collect();
        assert_eq!(keys, vec![10.0, 7.5, 5.0]);
    }

    #[test]
    fn equal_distances_break_ties_by_row_then_column() {
        let mut queue = DrawQueue::new();
        queue.add_piece(pawn(), square("a2"), Mat4::identity(), 3.0);
        queue.add_piece(pawn(), square("h1"), Mat4::identity(), 3.0);
        queue.add_piece(pawn(), square("c2"), Mat4::identity(), 3.0);
        queue.sort_commands();

        let order: Vec<String> = queue
            .pieces()
            .iter()
            .filter_map(DrawCommand::square)
            .map(|s| s.to_string())
            .collect();
        assert_eq!(order, vec!["c2", "a2", "h1"]);
    }

    #[test]
    fn scene_commands_put_board_first() {
        let mut queue = DrawQueue::new();
        queue.add_piece(pawn(), square("e2"), Mat4::identity(), 1.0);
        queue.set_board(Mat4::identity());
        queue.add_marker(Vec3::repeat(1.0), Mat4::identity());

        let kinds: Vec<DrawKind> = queue.scene_commands().map(|c| c.kind).collect();
        assert_eq!(kinds[0], DrawKind::Board);
        assert_eq!(kinds.len(), 2);
        assert_eq!(queue.command_count(), 3);

        queue.clear();
        assert!(queue.is_empty());
    }
}
