//! # Rendering System
//!
//! Backend-agnostic rendering for the chess scene. The frame loop drives a
//! [`RenderBackend`] through three shading stages: per-light depth cube passes,
//! the lit main pass and an optional emissive marker pass.
//!
//! ## Architecture
//!
//! - **api**: the backend contract (handles, stages, uniform values)
//! - **backends**: the command-recording backend used headless and in tests
//! - **lighting**: point/spot lights and the ordered light registry
//! - **shadow**: cube face transforms and per-light depth passes
//! - **frame_loop**: per-frame orchestration of the passes
//! - **window**: glfw window and input event translation

pub mod api;
pub mod backends;
pub mod frame_loop;
pub mod lighting;
pub mod primitives;
pub mod shadow;
pub mod window;

pub use api::{
    BackendResult, ClearFlags, DepthTargetHandle, MeshHandle, RenderBackend, ShaderStage,
    UniformValue, Viewport,
};
pub use backends::{BackendCall, RecordingBackend};
pub use frame_loop::{render_shadow_passes, FrameLoop, FramePhase, FrameStats};
pub use lighting::{Attenuation, LightId, LightRegistry, PointLight, SpotLight};
pub use primitives::{Camera, CameraConfig, Mesh, Movement, Vertex};
pub use shadow::{CubeFace, ShadowMaps, ShadowSettings};
pub use window::{WindowError, WindowHandle};

use thiserror::Error;

/// Rendering error types
#[derive(Error, Debug)]
pub enum RenderError {
    /// Renderer initialization failed during setup
    ///
    /// Fatal: the application reports it and exits.
    #[error("Renderer initialization failed: {0}")]
    InitializationFailed(String),

    /// A handle did not refer to a live backend resource
    #[error("Invalid {kind} handle")]
    InvalidHandle {
        /// Resource kind the handle was meant to address
        kind: &'static str,
    },

    /// A call arrived in a state the backend cannot accept it in
    #[error("Rendering failed: {0}")]
    RenderingFailed(String),

    /// Backend-specific error
    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
