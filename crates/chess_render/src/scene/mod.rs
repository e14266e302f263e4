//! Scene state and draw ordering
//!
//! ```text
//! SceneState (board, lights, camera)
//!      ↓
//! DrawQueue (board, back-to-front pieces, markers)
//!      ↓
//! RenderBackend (active stage)
//! ```

mod render_queue;
mod scene_renderer;
mod scene_state;

pub use render_queue::{DrawCommand, DrawKind, DrawQueue};
pub use scene_renderer::{
    board_transform, build_draw_queue, marker_transform, piece_draw_order, piece_offset,
    piece_transform, render_light_markers, render_scene, PieceDraw, BOARD_OFFSET, KNIGHT_NUDGE,
    MARKER_SCALE, MODEL_SCALE,
};
pub use scene_state::SceneState;
