//! Command-recording backend
//!
//! Implements [`RenderBackend`] without a GPU: resources live in slotmaps and
//! every call is appended to an in-memory log of [`BackendCall`]s. Headless
//! runs use it to exercise the full frame pipeline, and tests inspect the log
//! to check pass ordering, uniform writes and draw counts.

use crate::foundation::math::Vec3;
use crate::render::api::{
    BackendResult, ClearFlags, DepthTargetHandle, MeshHandle, RenderBackend, ShaderStage,
    UniformValue, Viewport,
};
use crate::render::primitives::Mesh;
use crate::render::RenderError;
use slotmap::SlotMap;
use std::collections::HashMap;

/// One recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    /// A mesh was uploaded
    UploadMesh {
        /// Handle returned to the caller
        handle: MeshHandle,
        /// Vertex count
        vertices: usize,
        /// Index count
        indices: usize,
    },
    /// A depth cube target was allocated
    CreateDepthCubeTarget {
        /// Handle returned to the caller
        handle: DepthTargetHandle,
        /// Face edge length in texels
        resolution: u32,
    },
    /// A depth pass started on a cube target
    BeginDepthPass {
        /// Bound target
        target: DepthTargetHandle,
        /// Viewport edge length (the target resolution)
        resolution: u32,
        /// Buffers cleared
        clear: ClearFlags,
    },
    /// The main pass started on the default framebuffer
    BeginMainPass {
        /// Viewport size
        viewport: Viewport,
        /// Clear color
        clear_color: Vec3,
        /// Buffers cleared
        clear: ClearFlags,
    },
    /// A shading stage became active
    UseStage(ShaderStage),
    /// A uniform was written
    SetUniform {
        /// Uniform name
        name: String,
        /// Written value
        value: UniformValue,
    },
    /// A depth cube map was bound to a texture unit
    BindDepthCube {
        /// Texture unit
        texture_unit: u32,
        /// Bound target
        target: DepthTargetHandle,
    },
    /// A mesh was drawn
    DrawMesh {
        /// Drawn mesh
        mesh: MeshHandle,
        /// Stage active at draw time
        stage: ShaderStage,
    },
    /// The frame was presented
    Present,
}

#[derive(Debug, Clone)]
struct MeshRecord {
    index_count: usize,
}

#[derive(Debug, Clone)]
struct DepthTargetRecord {
    resolution: u32,
}

/// In-memory backend that records every call
#[derive(Debug, Default)]
pub struct RecordingBackend {
    meshes: SlotMap<MeshHandle, MeshRecord>,
    depth_targets: SlotMap<DepthTargetHandle, DepthTargetRecord>,
    calls: Vec<BackendCall>,
    uniforms: HashMap<String, UniformValue>,
    stage: Option<ShaderStage>,
    frames_presented: u64,
    indices_drawn: u64,
    discard_calls: bool,
}

impl RecordingBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend that tracks resources, counters and uniform values
    /// but keeps no call log, for long-running loops
    pub fn discarding() -> Self {
        Self {
            discard_calls: true,
            ..Self::default()
        }
    }

    fn record(&mut self, call: BackendCall) {
        if !self.discard_calls {
            self.calls.push(call);
        }
    }

    /// Every call recorded since creation or the last [`Self::clear_calls`]
    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    /// Drop the recorded call log; resources and last uniform values stay
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Number of recorded calls matching `predicate`
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&BackendCall) -> bool,
    {
        self.calls.iter().filter(|c| predicate(c)).count()
    }

    /// Most recent value written to `name`
    pub fn last_uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniforms.get(name).copied()
    }

    /// Draw calls in the log issued while `stage` was active
    pub fn draws_in_stage(&self, stage: ShaderStage) -> usize {
        self.count(|c| matches!(c, BackendCall::DrawMesh { stage: s, .. } if *s == stage))
    }

    /// Stage currently active
    pub fn current_stage(&self) -> Option<ShaderStage> {
        self.stage
    }

    /// Number of uploaded meshes
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Number of allocated depth cube targets
    pub fn depth_target_count(&self) -> usize {
        self.depth_targets.len()
    }

    /// Frames presented since creation
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Indices submitted by all draws since creation
    pub fn indices_drawn(&self) -> u64 {
        self.indices_drawn
    }

    fn depth_target(&self, target: DepthTargetHandle) -> BackendResult<&DepthTargetRecord> {
        self.depth_targets
            .get(target)
            .ok_or(RenderError::InvalidHandle { kind: "depth target" })
    }
}

impl RenderBackend for RecordingBackend {
    fn upload_mesh(&mut self, mesh: &Mesh) -> BackendResult<MeshHandle> {
        if !mesh.is_valid() {
            return Err(RenderError::BackendError(format!(
                "mesh with {} vertices has out-of-range or partial-triangle indices",
                mesh.vertices.len()
            )));
        }
        let handle = self.meshes.insert(MeshRecord { index_count: mesh.index_count() });
        log::trace!("Uploaded mesh {:?} ({} indices)", handle, mesh.index_count());
        self.record(BackendCall::UploadMesh {
            handle,
            vertices: mesh.vertices.len(),
            indices: mesh.index_count(),
        });
        Ok(handle)
    }

    fn create_depth_cube_target(&mut self, resolution: u32) -> BackendResult<DepthTargetHandle> {
        if resolution == 0 {
            return Err(RenderError::BackendError(
                "depth cube target resolution must be non-zero".to_string(),
            ));
        }
        let handle = self.depth_targets.insert(DepthTargetRecord { resolution });
        self.record(BackendCall::CreateDepthCubeTarget { handle, resolution });
        Ok(handle)
    }

    fn begin_depth_pass(&mut self, target: DepthTargetHandle) -> BackendResult<()> {
        let resolution = self.depth_target(target)?.resolution;
        self.record(BackendCall::BeginDepthPass {
            target,
            resolution,
            clear: ClearFlags::DEPTH,
        });
        Ok(())
    }

    fn begin_main_pass(&mut self, viewport: Viewport, clear_color: Vec3) -> BackendResult<()> {
        self.record(BackendCall::BeginMainPass {
            viewport,
            clear_color,
            clear: ClearFlags::COLOR | ClearFlags::DEPTH,
        });
        Ok(())
    }

    fn use_stage(&mut self, stage: ShaderStage) -> BackendResult<()> {
        self.stage = Some(stage);
        self.record(BackendCall::UseStage(stage));
        Ok(())
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) -> BackendResult<()> {
        self.uniforms.insert(name.to_string(), value);
        self.record(BackendCall::SetUniform { name: name.to_string(), value });
        Ok(())
    }

    fn bind_depth_cube(&mut self, texture_unit: u32, target: DepthTargetHandle) -> BackendResult<()> {
        self.depth_target(target)?;
        self.record(BackendCall::BindDepthCube { texture_unit, target });
        Ok(())
    }

    fn draw_mesh(&mut self, mesh: MeshHandle) -> BackendResult<()> {
        let index_count = self
            .meshes
            .get(mesh)
            .ok_or(RenderError::InvalidHandle { kind: "mesh" })?
            .index_count;
        let stage = self
            .stage
            .ok_or_else(|| RenderError::RenderingFailed("draw issued with no active stage".to_string()))?;
        self.indices_drawn += index_count as u64;
        self.record(BackendCall::DrawMesh { mesh, stage });
        Ok(())
    }

    fn present(&mut self) -> BackendResult<()> {
        self.frames_presented += 1;
        self.stage = None;
        self.record(BackendCall::Present);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uploads_and_draws_are_recorded() {
        let mut backend = RecordingBackend::new();
        let cube = backend.upload_mesh(&Mesh::cube()).unwrap();
        backend.use_stage(ShaderStage::Lit).unwrap();
        backend.draw_mesh(cube).unwrap();
        backend.present().unwrap();

        assert_eq!(backend.mesh_count(), 1);
        assert_eq!(backend.draws_in_stage(ShaderStage::Lit), 1);
        assert_eq!(backend.indices_drawn(), 36);
        assert_eq!(backend.frames_presented(), 1);
        assert_eq!(backend.current_stage(), None);
        assert_eq!(backend.calls().last(), Some(&BackendCall::Present));
    }

    #[test]
    fn unknown_handles_are_rejected() {
        let mut backend = RecordingBackend::new();
        let mut other = RecordingBackend::new();
        let foreign_mesh = other.upload_mesh(&Mesh::cube()).unwrap();
        let foreign_target = other.create_depth_cube_target(16).unwrap();

        backend.use_stage(ShaderStage::Depth).unwrap();
        assert!(matches!(
            backend.draw_mesh(foreign_mesh),
            Err(RenderError::InvalidHandle { kind: "mesh" })
        ));
        assert!(matches!(
            backend.begin_depth_pass(foreign_target),
            Err(RenderError::InvalidHandle { .. })
        ));
        assert!(backend.bind_depth_cube(15, foreign_target).is_err());
    }

    #[test]
    fn draw_without_stage_fails() {
        let mut backend = RecordingBackend::new();
        let cube = backend.upload_mesh(&Mesh::cube()).unwrap();
        assert!(matches!(backend.draw_mesh(cube), Err(RenderError::RenderingFailed(_))));
    }

    #[test]
    fn depth_pass_clears_depth_at_target_resolution() {
        let mut backend = RecordingBackend::new();
        let target = backend.create_depth_cube_target(2048).unwrap();
        backend.begin_depth_pass(target).unwrap();
        assert_eq!(
            backend.calls().last(),
            Some(&BackendCall::BeginDepthPass { target, resolution: 2048, clear: ClearFlags::DEPTH })
        );
    }

    #[test]
    fn last_uniform_tracks_latest_write() {
        let mut backend = RecordingBackend::new();
        backend.set_uniform("far_plane", 10.0_f32.into()).unwrap();
        backend.set_uniform("far_plane", 25.0_f32.into()).unwrap();
        assert_eq!(backend.last_uniform("far_plane"), Some(UniformValue::Float(25.0)));
        assert_eq!(backend.last_uniform("missing"), None);

        backend.clear_calls();
        assert!(backend.calls().is_empty());
        assert_eq!(backend.last_uniform("far_plane"), Some(UniformValue::Float(25.0)));
    }

    #[test]
    fn state_changes_are_logged_in_call_order() {
        let mut backend = RecordingBackend::new();
        backend.use_stage(ShaderStage::Lit).unwrap();
        backend.set_uniform("shininess", 32.0_f32.into()).unwrap();
        backend.present().unwrap();

        assert_eq!(
            backend.calls(),
            &[
                BackendCall::UseStage(ShaderStage::Lit),
                BackendCall::SetUniform { name: "shininess".to_string(), value: UniformValue::Float(32.0) },
                BackendCall::Present,
            ]
        );
    }

    #[test]
    fn discarding_backend_keeps_counters_only() {
        let mut backend = RecordingBackend::discarding();
        let cube = backend.upload_mesh(&Mesh::cube()).unwrap();
        backend.use_stage(ShaderStage::Emissive).unwrap();
        backend.set_uniform("lightColor", Vec3::new(1.0, 0.0, 0.0).into()).unwrap();
        backend.draw_mesh(cube).unwrap();
        backend.present().unwrap();

        assert!(backend.calls().is_empty());
        assert_eq!(backend.indices_drawn(), 36);
        assert_eq!(backend.frames_presented(), 1);
        assert_eq!(backend.last_uniform("lightColor"), Some(UniformValue::Vec3(Vec3::new(1.0, 0.0, 0.0))));
    }
}
