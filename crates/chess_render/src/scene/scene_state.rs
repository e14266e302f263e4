//! Application state threaded through the frame loop
//!
//! Owned by the caller and passed to every phase; input handlers mutate it
//! between frames and the renderer only reads it.

use crate::board::Board;
use crate::foundation::math::Vec3;
use crate::render::lighting::LightRegistry;
use crate::render::primitives::Camera;

/// Board, lights, camera and view toggles
#[derive(Debug, Clone)]
pub struct SceneState {
    /// Piece placement
    pub board: Board,
    /// Lights in slot order
    pub lights: LightRegistry,
    /// The viewer
    pub camera: Camera,
    /// Main pass clear color
    pub clear_color: Vec3,
    /// UI mode: cursor released and the debug overlay shown
    pub ui_enabled: bool,
    /// Whether mouse movement turns the camera
    pub camera_mouse_enabled: bool,
    /// Whether the main pass draws light markers
    pub show_light_markers: bool,
}

impl SceneState {
    /// Create a state with UI mode off and markers shown
    pub fn new(board: Board, lights: LightRegistry, camera: Camera) -> Self {
        Self {
            board,
            lights,
            camera,
            clear_color: Vec3::zeros(),
            ui_enabled: false,
            camera_mouse_enabled: true,
            show_light_markers: true,
        }
    }

    /// Enter or leave UI mode; camera mouse look is its inverse
    pub fn set_ui_enabled(&mut self, enabled: bool) {
        self.ui_enabled = enabled;
        self.camera_mouse_enabled = !enabled;
    }

    /// Flip UI mode, returning the new state
    pub fn toggle_ui(&mut self) -> bool {
        self.set_ui_enabled(!self.ui_enabled);
        log::info!("UI mode {}", if self.ui_enabled { "on" } else { "off" });
        self.ui_enabled
    }

    /// Flip light marker drawing, returning the new state
    pub fn toggle_light_markers(&mut self) -> bool {
        self.show_light_markers = !self.show_light_markers;
        log::info!("Light markers {}", if self.show_light_markers { "shown" } else { "hidden" });
        self.show_light_markers
    }
}

impl Default for SceneState {
    /// Standard position, reference lights, default camera
    fn default() -> Self {
        Self::new(Board::standard(), LightRegistry::reference(), Camera::default())
    }
}
