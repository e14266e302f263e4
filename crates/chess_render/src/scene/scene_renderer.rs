//! Scene Renderer - draws the board, pieces and light markers
//!
//! Scene geometry is drawn with whichever stage the caller has made active:
//! the depth stage during shadow passes, the lit stage in the main pass. Each
//! draw is preceded by its `model` uniform. Light markers use the emissive
//! stage and are drawn by the main pass only, so lights never shadow
//! themselves.

use crate::assets::SceneMeshes;
use crate::board::{Board, Piece, PieceKind, PieceColor, Square};
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::render::api::{BackendResult, MeshHandle, RenderBackend, ShaderStage};
use crate::render::lighting::LightRegistry;
use crate::scene::render_queue::{DrawKind, DrawQueue};
use crate::scene::SceneState;

/// Uniform scale applied to the board and piece models
pub const MODEL_SCALE: f32 = 0.183;

/// Board model lift above the cell plane
pub const BOARD_OFFSET: Vec3 = Vec3::new(0.0, 0.0, 0.06);

/// Uniform scale applied to light marker cubes
pub const MARKER_SCALE: f32 = 0.1;

/// Distance the knight models are shifted towards their own side
pub const KNIGHT_NUDGE: f32 = 0.06;

/// World transform of the board
pub fn board_transform() -> Mat4 {
    Mat4::translate_scale(BOARD_OFFSET, MODEL_SCALE)
}

/// Per-model centring offset
///
/// The knight models are asymmetric: white knights shift along +Y and black
/// knights along −Y.
pub fn piece_offset(piece: Piece) -> Vec3 {
    match (piece.kind, piece.color) {
        (PieceKind::Knight, PieceColor::White) => Vec3::new(0.0, KNIGHT_NUDGE, 0.0),
        (PieceKind::Knight, PieceColor::Black) => Vec3::new(0.0, -KNIGHT_NUDGE, 0.0),
        _ => Vec3::zeros(),
    }
}

/// World transform of a piece standing on `square`
pub fn piece_transform(board: &Board, square: Square, piece: Piece) -> Mat4 {
    Mat4::translate_scale(board.get_position(square) + piece_offset(piece), MODEL_SCALE)
}

/// World transform of a light marker
pub fn marker_transform(position: Vec3) -> Mat4 {
    Mat4::translate_scale(position, MARKER_SCALE)
}

/// A piece in draw order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceDraw {
    /// Square the piece stands on
    pub square: Square,
    /// The piece
    pub piece: Piece,
    /// Distance from the camera to the square's centre
    pub distance: f32,
}

/// Every occupied square, farthest from `camera_position` first
///
/// Ties are broken by descending row, then descending column.
pub fn piece_draw_order(board: &Board, camera_position: Vec3) -> Vec<PieceDraw> {
    let mut queue = DrawQueue::with_capacity(32, 0);
    queue_pieces(&mut queue, board, camera_position);
    queue
        .pieces()
        .iter()
        .filter_map(|command| match command.kind {
            DrawKind::Piece { piece, square } => Some(PieceDraw {
                square,
                piece,
                distance: command.sort_key,
            }),
            _ => None,
        })
        .collect()
}

fn queue_pieces(queue: &mut DrawQueue, board: &Board, camera_position: Vec3) {
    for (square, piece) in board.occupied() {
        let distance = (board.get_position(square) - camera_position).norm();
        queue.add_piece(piece, square, piece_transform(board, square, piece), distance);
    }
    queue.sort_commands();
}

/// Rebuild `queue` for the current scene
///
/// Called once per frame; the piece order follows the camera.
pub fn build_draw_queue(queue: &mut DrawQueue, scene: &SceneState) {
    queue.clear();
    queue.set_board(board_transform());
    queue_pieces(queue, &scene.board, scene.camera.position);
    if scene.show_light_markers {
        queue_markers(queue, &scene.lights);
    }
}

fn queue_markers(queue: &mut DrawQueue, lights: &LightRegistry) {
    for marker in lights.markers() {
        queue.add_marker(marker.color, marker_transform(marker.position));
    }
}

fn mesh_for(kind: DrawKind, meshes: &SceneMeshes) -> Option<MeshHandle> {
    match kind {
        DrawKind::Board => Some(meshes.board),
        DrawKind::Piece { piece, .. } => meshes.piece(piece),
        DrawKind::LightMarker { .. } => Some(meshes.cube),
    }
}

/// Draw the board and the sorted pieces with the active stage
///
/// Returns the number of draw calls.
pub fn render_scene(
    backend: &mut dyn RenderBackend,
    queue: &DrawQueue,
    meshes: &SceneMeshes,
) -> BackendResult<usize> {
    let mut draws = 0;
    for command in queue.scene_commands() {
        let Some(mesh) = mesh_for(command.kind, meshes) else {
            log::trace!("No mesh for {:?}", command.kind);
            continue;
        };
        backend.set_uniform("model", command.transform.into())?;
        backend.draw_mesh(mesh)?;
        draws += 1;
    }
    Ok(draws)
}

/// Draw the queued light markers with the emissive stage
///
/// Switches to [`ShaderStage::Emissive`] and writes its `projection` and
/// `view`; each marker gets `model` and `lightColor`. Returns the number of
/// draw calls.
pub fn render_light_markers(
    backend: &mut dyn RenderBackend,
    queue: &DrawQueue,
    meshes: &SceneMeshes,
    projection: Mat4,
    view: Mat4,
) -> BackendResult<usize> {
    if queue.markers().is_empty() {
        return Ok(0);
    }

    backend.use_stage(ShaderStage::Emissive)?;
    backend.set_uniform("projection", projection.into())?;
    backend.set_uniform("view", view.into())?;

    for command in queue.markers() {
        if let DrawKind::LightMarker { color } = command.kind {
            backend.set_uniform("model", command.transform.into())?;
            backend.set_uniform("lightColor", color.into())?;
            backend.draw_mesh(meshes.cube)?;
        }
    }
    Ok(queue.markers().len())
}
