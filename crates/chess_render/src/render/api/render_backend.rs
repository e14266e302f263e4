//! Backend abstraction traits for the rendering system
//!
//! This module defines the contract a graphics backend fulfils for the frame
//! loop: mesh upload, depth cube targets, pass begin/clear, shading stage
//! selection, named uniform writes, texture slot binding and draw calls.
//! Stage programs address their inputs by name (`pointLights[0].diffuse`,
//! `depthMaps[2]`, `model`, ...), so every uniform goes through
//! [`RenderBackend::set_uniform`].

use crate::foundation::math::{Mat4, Vec3};
use crate::render::primitives::Mesh;
use crate::render::RenderError;
use bitflags::bitflags;
use slotmap::new_key_type;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

new_key_type! {
    /// Handle to a mesh uploaded to the backend
    pub struct MeshHandle;

    /// Handle to a per-light depth cube map and its framebuffer
    pub struct DepthTargetHandle;
}

/// The three shading stages the scene needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Depth-only stage writing linear light distance into a cube map
    Depth,
    /// Forward-lit stage sampling every light's depth map
    Lit,
    /// Unlit stage for light markers
    Emissive,
}

/// Value written to a named uniform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// `float`
    Float(f32),
    /// `int` / sampler slot
    Int(i32),
    /// `bool`
    Bool(bool),
    /// `vec3`
    Vec3(Vec3),
    /// `mat4`
    Mat4(Mat4),
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<i32> for UniformValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for UniformValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec3> for UniformValue {
    fn from(value: Vec3) -> Self {
        Self::Vec3(value)
    }
}

impl From<Mat4> for UniformValue {
    fn from(value: Mat4) -> Self {
        Self::Mat4(value)
    }
}

bitflags! {
    /// Buffers cleared at the start of a pass
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u8 {
        /// Color attachment
        const COLOR = 0b01;
        /// Depth attachment
        const DEPTH = 0b10;
    }
}

/// Viewport rectangle in pixels, origin at the lower-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Viewport {
    /// Create a viewport
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either side is zero, as for a minimized window
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height; a zero-height (minimized) viewport reports 1.0
    pub fn aspect_ratio(self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Main rendering backend trait
///
/// Calls are issued strictly in order from the frame-loop thread; a backend
/// may record them or submit them immediately.
pub trait RenderBackend {
    /// Upload mesh data and return an opaque handle
    fn upload_mesh(&mut self, mesh: &Mesh) -> BackendResult<MeshHandle>;

    /// Allocate a square depth cube map (six faces of `resolution`²) with a
    /// depth-only framebuffer attached to it
    fn create_depth_cube_target(&mut self, resolution: u32) -> BackendResult<DepthTargetHandle>;

    /// Bind the target's framebuffer, set the viewport to its resolution and
    /// clear its depth
    fn begin_depth_pass(&mut self, target: DepthTargetHandle) -> BackendResult<()>;

    /// Bind the default framebuffer, set the viewport and clear color and
    /// depth to `clear_color`
    fn begin_main_pass(&mut self, viewport: Viewport, clear_color: Vec3) -> BackendResult<()>;

    /// Make `stage` the active stage for subsequent uniform writes and draws
    fn use_stage(&mut self, stage: ShaderStage) -> BackendResult<()>;

    /// Write a named uniform of the active stage
    fn set_uniform(&mut self, name: &str, value: UniformValue) -> BackendResult<()>;

    /// Bind a depth cube map to a texture unit
    fn bind_depth_cube(&mut self, texture_unit: u32, target: DepthTargetHandle) -> BackendResult<()>;

    /// Draw a mesh with the active stage and its current uniforms
    fn draw_mesh(&mut self, mesh: MeshHandle) -> BackendResult<()>;

    /// Finish the frame; blocks until the frame has been handed off
    fn present(&mut self) -> BackendResult<()>;
}
