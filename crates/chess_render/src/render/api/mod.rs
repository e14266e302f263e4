//! Backend-facing rendering API

pub mod render_backend;

pub use render_backend::{
    BackendResult, ClearFlags, DepthTargetHandle, MeshHandle, RenderBackend, ShaderStage,
    UniformValue, Viewport,
};
