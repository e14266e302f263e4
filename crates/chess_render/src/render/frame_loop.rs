//! Per-frame orchestration
//!
//! One frame runs a depth pass per enabled light, then the lit main pass,
//! then the optional light marker pass, then presents:
//!
//! ```text
//! Init → ShadowPass(slot)* → MainPass → LightDebugPass? → Present
//! ```
//!
//! The loop owns the depth targets and the draw queue. Scene state is passed
//! in each frame so input handling can mutate it between frames.

use crate::assets::SceneMeshes;
use crate::render::api::{BackendResult, RenderBackend, ShaderStage, Viewport};
use crate::render::shadow::{ShadowMaps, ShadowSettings};
use crate::render::RenderError;
use crate::scene::{build_draw_queue, render_light_markers, render_scene, DrawQueue, SceneState};

/// Specular exponent used for every surface
pub const MATERIAL_SHININESS: f32 = 32.0;

/// Where the loop is within a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePhase {
    /// Draw queue being rebuilt
    Init,
    /// Depth pass for the light in this slot
    ShadowPass(usize),
    /// Lit pass into the default target
    MainPass,
    /// Emissive light markers
    LightDebugPass,
    /// Frame handed to the backend
    Present,
}

/// Counters for one rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Depth passes run (one per enabled light)
    pub shadow_passes: usize,
    /// Depth maps bound for the lit stage
    pub depth_bindings: usize,
    /// Light uniform writes in the main pass
    pub light_uniform_writes: usize,
    /// Pieces drawn in the main pass
    pub piece_draws: usize,
    /// Light markers drawn
    pub marker_draws: usize,
    /// Every draw call of the frame, depth passes included
    pub draw_calls: usize,
}

/// Run the depth pass of every enabled light
///
/// `on_pass` is called with the slot and the number of draw calls after each
/// pass. Returns the number of passes.
pub fn render_shadow_passes<F>(
    backend: &mut dyn RenderBackend,
    maps: &ShadowMaps,
    scene: &SceneState,
    queue: &DrawQueue,
    meshes: &SceneMeshes,
    mut on_pass: F,
) -> BackendResult<usize>
where
    F: FnMut(usize, usize),
{
    let rendered = maps.render_passes(backend, &scene.lights, |backend, slot| {
        let draws = render_scene(backend, queue, meshes)?;
        on_pass(slot, draws);
        Ok(())
    })?;
    Ok(rendered.len())
}

/// Owns the depth targets and draw queue across frames
pub struct FrameLoop {
    shadow_maps: ShadowMaps,
    queue: DrawQueue,
    meshes: SceneMeshes,
    phase: FramePhase,
    phase_log: Vec<FramePhase>,
    frames: u64,
}

impl FrameLoop {
    /// Allocate one depth cube map per light in `scene`
    pub fn new(
        backend: &mut dyn RenderBackend,
        scene: &SceneState,
        settings: ShadowSettings,
        meshes: SceneMeshes,
    ) -> BackendResult<Self> {
        let shadow_maps = ShadowMaps::allocate(backend, scene.lights.len(), settings)?;
        Ok(Self {
            shadow_maps,
            queue: DrawQueue::with_capacity(scene.board.occupied_count(), scene.lights.len()),
            meshes,
            phase: FramePhase::Init,
            phase_log: Vec::new(),
            frames: 0,
        })
    }

    /// Current phase
    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Phases entered during the last frame, in order
    pub fn last_frame_phases(&self) -> &[FramePhase] {
        &self.phase_log
    }

    /// Frames presented so far
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Depth targets
    pub fn shadow_maps(&self) -> &ShadowMaps {
        &self.shadow_maps
    }

    /// Draw queue of the last frame
    pub fn queue(&self) -> &DrawQueue {
        &self.queue
    }

    /// Meshes used for drawing
    pub fn meshes(&self) -> &SceneMeshes {
        &self.meshes
    }

    fn enter(&mut self, phase: FramePhase) {
        log::trace!("Frame {}: {:?}", self.frames, phase);
        self.phase = phase;
        self.phase_log.push(phase);
    }

    /// Render and present one frame
    pub fn render_frame(
        &mut self,
        backend: &mut dyn RenderBackend,
        scene: &SceneState,
        viewport: Viewport,
    ) -> BackendResult<FrameStats> {
        if scene.lights.len() != self.shadow_maps.len() {
            return Err(RenderError::RenderingFailed(format!(
                "light count changed from {} to {} after shadow maps were allocated",
                self.shadow_maps.len(),
                scene.lights.len()
            )));
        }

        self.phase_log.clear();
        self.enter(FramePhase::Init);
        build_draw_queue(&mut self.queue, scene);

        let mut stats = FrameStats::default();

        let phase = &mut self.phase;
        let phase_log = &mut self.phase_log;
        let frame = self.frames;
        let mut depth_draws = 0;
        stats.shadow_passes = render_shadow_passes(
            backend,
            &self.shadow_maps,
            scene,
            &self.queue,
            &self.meshes,
            |slot, draws| {
                log::trace!("Frame {}: {:?}", frame, FramePhase::ShadowPass(slot));
                *phase = FramePhase::ShadowPass(slot);
                phase_log.push(*phase);
                depth_draws += draws;
            },
        )?;
        stats.draw_calls += depth_draws;

        self.enter(FramePhase::MainPass);
        backend.begin_main_pass(viewport, scene.clear_color)?;
        backend.use_stage(ShaderStage::Lit)?;
        stats.depth_bindings = self.shadow_maps.bind_for_lighting(backend)?;
        stats.light_uniform_writes = scene.lights.push_uniforms(backend)?;

        let projection = scene.camera.projection_matrix();
        let view = scene.camera.view_matrix();
        backend.set_uniform("viewPosition", scene.camera.position.into())?;
        backend.set_uniform("material.shininess", MATERIAL_SHININESS.into())?;
        backend.set_uniform("projection", projection.into())?;
        backend.set_uniform("view", view.into())?;
        stats.draw_calls += render_scene(backend, &self.queue, &self.meshes)?;
        stats.piece_draws = self.queue.pieces().len();

        if !self.queue.markers().is_empty() {
            self.enter(FramePhase::LightDebugPass);
            stats.marker_draws =
                render_light_markers(backend, &self.queue, &self.meshes, projection, view)?;
            stats.draw_calls += stats.marker_draws;
        }

        self.enter(FramePhase::Present);
        backend.present()?;
        self.frames += 1;

        log::debug!(
            "Frame {}: {} shadow passes, {} draw calls, {} markers",
            self.frames,
            stats.shadow_passes,
            stats.draw_calls,
            stats.marker_draws
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::render::backends::{BackendCall, RecordingBackend};
    use crate::render::lighting::{LightId, LightRegistry};
    use crate::render::primitives::{Camera, CameraConfig};

    fn setup(scene: &SceneState) -> (RecordingBackend, FrameLoop) {
        let mut backend = RecordingBackend::new();
        let meshes = SceneMeshes::procedural(&mut backend).unwrap();
        let frame_loop = FrameLoop::new(&mut backend, scene, ShadowSettings::default(), meshes).unwrap();
        backend.clear_calls();
        (backend, frame_loop)
    }

    #[test]
    fn reference_frame_runs_four_shadow_passes() {
        let scene = SceneState::default();
        let (mut backend, mut frame_loop) = setup(&scene);

        let stats = frame_loop.render_frame(&mut backend, &scene, Viewport::new(800, 600)).unwrap();
        assert_eq!(stats.shadow_passes, 4);
        assert_eq!(stats.depth_bindings, 4);
        assert_eq!(stats.piece_draws, 32);
        assert_eq!(stats.marker_draws, 4);
        // 33 per depth pass, 33 in the main pass, 4 markers
        assert_eq!(stats.draw_calls, 33 * 5 + 4);
        assert_eq!(backend.frames_presented(), 1);
    }

    #[test]
    fn phases_follow_the_frame_order() {
        let mut scene = SceneState::default();
        scene.lights.set_enabled(LightId::Spot(1), false);
        let (mut backend, mut frame_loop) = setup(&scene);

        frame_loop.render_frame(&mut backend, &scene, Viewport::new(800, 600)).unwrap();
        assert_eq!(
            frame_loop.last_frame_phases(),
            &[
                FramePhase::Init,
                FramePhase::ShadowPass(0),
                FramePhase::ShadowPass(1),
                FramePhase::ShadowPass(3),
                FramePhase::MainPass,
                FramePhase::LightDebugPass,
                FramePhase::Present,
            ]
        );
        assert_eq!(frame_loop.phase(), FramePhase::Present);
    }

    #[test]
    fn hidden_markers_skip_the_debug_pass() {
        let mut scene = SceneState::default();
        scene.show_light_markers = false;
        let (mut backend, mut frame_loop) = setup(&scene);

        let stats = frame_loop.render_frame(&mut backend, &scene, Viewport::new(800, 600)).unwrap();
        assert_eq!(stats.marker_draws, 0);
        assert!(!frame_loop.last_frame_phases().contains(&FramePhase::LightDebugPass));
        assert_eq!(backend.draws_in_stage(ShaderStage::Emissive), 0);
    }

    #[test]
    fn main_pass_writes_camera_and_material_uniforms() {
        let scene = SceneState::default();
        let (mut backend, mut frame_loop) = setup(&scene);
        frame_loop.render_frame(&mut backend, &scene, Viewport::new(800, 600)).unwrap();

        assert_eq!(
            backend.last_uniform("material.shininess"),
            Some(MATERIAL_SHININESS.into())
        );
        assert_eq!(
            backend.last_uniform("viewPosition"),
            Some(scene.camera.position.into())
        );
        assert_eq!(backend.last_uniform("depthMaps[3]"), Some(18_i32.into()));
        assert_eq!(
            backend.count(|call| matches!(call, BackendCall::BindDepthCube { .. })),
            4
        );
        assert_eq!(
            backend.count(|call| matches!(call, BackendCall::BeginMainPass { .. })),
            1
        );
    }

    #[test]
    fn empty_board_without_lights_draws_only_the_board() {
        let scene = SceneState::new(
            Board::new(),
            LightRegistry::new(),
            Camera::new(&CameraConfig::default(), 800.0 / 600.0),
        );
        let (mut backend, mut frame_loop) = setup(&scene);

        let stats = frame_loop.render_frame(&mut backend, &scene, Viewport::new(800, 600)).unwrap();
        assert_eq!(stats.shadow_passes, 0);
        assert_eq!(stats.depth_bindings, 0);
        assert_eq!(stats.light_uniform_writes, 2);
        assert_eq!(stats.draw_calls, 1);
    }

    #[test]
    fn changing_the_light_count_is_an_error() {
        let scene = SceneState::default();
        let (mut backend, mut frame_loop) = setup(&scene);

        let mut grown = scene.clone();
        grown.lights = grown.lights.add_point(crate::render::lighting::PointLight::at(
            crate::foundation::math::Vec3::new(0.0, 0.0, 6.0),
        ));
        let result = frame_loop.render_frame(&mut backend, &grown, Viewport::new(800, 600));
        assert!(matches!(result, Err(RenderError::RenderingFailed(_))));
    }

    #[test]
    fn shadow_passes_draw_casters_with_the_depth_stage() {
        let mut scene = SceneState::default();
        scene.lights.set_enabled(LightId::Point(0), false);
        let (mut backend, frame_loop) = setup(&scene);

        let mut queue = DrawQueue::new();
        build_draw_queue(&mut queue, &scene);
        let mut passes = Vec::new();
        let count = render_shadow_passes(
            &mut backend,
            frame_loop.shadow_maps(),
            &scene,
            &queue,
            frame_loop.meshes(),
            |slot, draws| passes.push((slot, draws)),
        )
        .unwrap();

        assert_eq!(count, 3);
        assert_eq!(passes, vec![(1, 33), (2, 33), (3, 33)]);
        assert_eq!(backend.draws_in_stage(ShaderStage::Depth), 99);
        assert_eq!(backend.draws_in_stage(ShaderStage::Emissive), 0);
    }
}
