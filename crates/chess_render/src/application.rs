//! Application events and top-level errors

use crate::config::ConfigError;
use crate::core::persisted::StateError;
use crate::input::KeyCode;
use crate::render::window::WindowError;
use crate::render::RenderError;
use thiserror::Error;

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Window or context creation failed
    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    /// Backend initialization or a backend call failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Configuration could not be loaded or is invalid
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// View state could not be read or written
    #[error("State error: {0}")]
    State(#[from] StateError),
}

impl AppError {
    /// Whether the error happened before the frame loop could start
    pub fn is_initialization_failure(&self) -> bool {
        matches!(
            self,
            AppError::Window(_) | AppError::Config(_) | AppError::Render(RenderError::InitializationFailed(_))
        )
    }
}

/// Window and input events delivered between frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// Framebuffer was resized
    WindowResized {
        /// New framebuffer width
        width: u32,
        /// New framebuffer height
        height: u32,
    },

    /// Window close requested
    WindowCloseRequested,

    /// Key was pressed
    KeyPressed(KeyCode),

    /// Key was released
    KeyReleased(KeyCode),

    /// Cursor moved
    MouseMoved {
        /// Cursor x in screen coordinates
        x: f64,
        /// Cursor y in screen coordinates, growing downwards
        y: f64,
    },

    /// Mouse wheel
    MouseWheel {
        /// Horizontal scroll delta
        delta_x: f64,
        /// Vertical scroll delta
        delta_y: f64,
    },
}
