//! Application driver
//!
//! Builds the scene from configuration, restores the saved view, and runs
//! the frame loop either against a window or headless for a fixed number of
//! frames.

use crate::application::{AppError, AppEvent};
use crate::assets::load_scene_meshes;
use crate::board::Board;
use crate::core::config::ApplicationConfig;
use crate::core::persisted::PersistedState;
use crate::debug::DebugOverlay;
use crate::foundation::time::{FramePacer, Timer};
use crate::input::{apply_input, InputAction, InputState};
use crate::render::api::{RenderBackend, Viewport};
use crate::render::backends::RecordingBackend;
use crate::render::frame_loop::{FrameLoop, FrameStats};
use crate::render::primitives::Camera;
use crate::render::window::WindowHandle;
use crate::scene::SceneState;

/// Fixed step used by headless runs
pub const HEADLESS_FRAME_TIME: f32 = 1.0 / 60.0;

/// Longest block on window events while the framebuffer is empty
pub const MINIMIZED_WAIT_SECS: f64 = 0.1;

/// Totals of a headless run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadlessSummary {
    /// Frames rendered
    pub frames: u64,
    /// Stats of the last frame
    pub last_frame: FrameStats,
    /// Depth passes over the whole run
    pub total_shadow_passes: usize,
    /// Draw calls over the whole run
    pub total_draw_calls: usize,
}

/// Owns the scene, input and timing for one run
pub struct Engine {
    config: ApplicationConfig,
    scene: SceneState,
    input: InputState,
    timer: Timer,
    running: bool,
}

impl Engine {
    /// Validate `config`, build the scene and restore the saved view
    pub fn new(config: ApplicationConfig) -> Result<Self, AppError> {
        config.validate()?;
        log::info!("Initializing chess scene...");

        let aspect = Viewport::new(config.window.width, config.window.height).aspect_ratio();
        let camera = Camera::new(&config.camera, aspect);
        let mut scene = SceneState::new(Board::standard(), config.lighting.clone(), camera);

        if let Some(path) = &config.state_file {
            match PersistedState::load(path) {
                Ok(Some(state)) => {
                    log::info!("Restored view state from {}", path);
                    state.apply(&mut scene);
                }
                Ok(None) => log::debug!("No view state at {}", path),
                Err(e) => log::warn!("Ignoring view state at {}: {}", path, e),
            }
        }

        log::info!(
            "Scene ready: {} pieces, {} lights",
            scene.board.occupied_count(),
            scene.lights.len()
        );
        Ok(Self {
            config,
            scene,
            input: InputState::new(),
            timer: Timer::new(),
            running: true,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &ApplicationConfig {
        &self.config
    }

    /// Scene state
    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    /// Mutable scene state
    pub fn scene_mut(&mut self) -> &mut SceneState {
        &mut self.scene
    }

    /// Frame timer
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Whether the loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Upload the scene meshes and allocate shadow maps
    pub fn prepare(&self, backend: &mut dyn RenderBackend) -> Result<FrameLoop, AppError> {
        let meshes = load_scene_meshes(backend, &self.config.assets)?;
        Ok(FrameLoop::new(backend, &self.scene, self.config.shadows, meshes)?)
    }

    /// Apply a batch of events and held-key movement for `delta_time`
    pub fn handle_events<I>(&mut self, events: I, delta_time: f32) -> Vec<InputAction>
    where
        I: IntoIterator<Item = AppEvent>,
    {
        let actions = apply_input(&mut self.input, events, &mut self.scene, delta_time);
        if actions.contains(&InputAction::Close) {
            log::info!("Close requested");
            self.running = false;
        }
        actions
    }

    /// Run against a window until it is closed
    pub fn run_windowed(&mut self, backend: &mut dyn RenderBackend) -> Result<(), AppError> {
        let mut window = WindowHandle::new(&self.config.window)?;
        let mut frame_loop = self.prepare(backend)?;

        let mut viewport = window.viewport();
        if viewport.height > 0 {
            self.scene.camera.set_aspect_ratio(viewport.aspect_ratio());
        }
        window.set_cursor_captured(!self.scene.ui_enabled);

        log::info!("Starting main loop...");
        self.timer = Timer::new();
        // Presenting may return at once, so the loop paces itself.
        let mut pacer = FramePacer::new(self.config.window.max_fps);
        let mut titled = false;
        while self.running && !window.should_close() {
            self.timer.update();
            let events = if viewport.is_empty() {
                window.wait_events_timeout(MINIMIZED_WAIT_SECS)
            } else {
                window.poll_events()
            };
            let actions = self.handle_events(events, self.timer.delta_time());
            for action in &actions {
                if let InputAction::Resize(resized) = *action {
                    viewport = resized;
                }
            }
            window.apply_actions(&actions);
            if !self.running {
                break;
            }
            if viewport.is_empty() {
                continue;
            }

            frame_loop.render_frame(backend, &self.scene, viewport)?;

            if self.scene.ui_enabled {
                let title = DebugOverlay::title(window.title(), &self.scene, &self.timer);
                window.set_title(&title);
                titled = true;
            } else if titled {
                let base = window.title().to_string();
                window.set_title(&base);
                titled = false;
            }
            pacer.wait();
        }

        log::info!("Main loop finished after {} frames", frame_loop.frames_rendered());
        self.shutdown()
    }

    /// Render `frames` frames against the recording backend without a window
    pub fn run_headless(
        &mut self,
        backend: &mut RecordingBackend,
        frames: u64,
    ) -> Result<HeadlessSummary, AppError> {
        let mut frame_loop = self.prepare(backend)?;
        let viewport = Viewport::new(self.config.window.width, self.config.window.height);
        let mut summary = HeadlessSummary::default();

        log::info!("Rendering {} headless frames at {}x{}", frames, viewport.width, viewport.height);
        for _ in 0..frames {
            if !self.running {
                break;
            }
            self.timer.advance(HEADLESS_FRAME_TIME);
            self.handle_events(std::iter::empty(), self.timer.delta_time());

            let stats = frame_loop.render_frame(backend, &self.scene, viewport)?;
            backend.clear_calls();

            summary.frames += 1;
            summary.last_frame = stats;
            summary.total_shadow_passes += stats.shadow_passes;
            summary.total_draw_calls += stats.draw_calls;
        }

        for line in DebugOverlay::lines(&self.scene, &self.timer) {
            log::debug!("{}", line);
        }
        log::info!(
            "Headless run: {} frames, {} shadow passes, {} draw calls, {} indices",
            summary.frames,
            summary.total_shadow_passes,
            summary.total_draw_calls,
            backend.indices_drawn()
        );
        self.shutdown()?;
        Ok(summary)
    }

    /// Save the view state if a state file is configured
    pub fn shutdown(&mut self) -> Result<(), AppError> {
        self.running = false;
        if let Some(path) = &self.config.state_file {
            PersistedState::capture(&self.scene).save(path)?;
            log::info!("Saved view state to {}", path);
        }
        log::info!("Shutdown complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AssetConfig;
    use crate::input::KeyCode;
    use crate::render::lighting::LightId;

    fn headless_config() -> ApplicationConfig {
        ApplicationConfig {
            // No models here; every mesh falls back to the procedural cube.
            assets: AssetConfig { root: "does/not/exist".to_string() },
            ..ApplicationConfig::default()
        }
    }

    #[test]
    fn headless_run_renders_every_frame() {
        let mut engine = Engine::new(headless_config()).unwrap();
        let mut backend = RecordingBackend::new();
        let summary = engine.run_headless(&mut backend, 3).unwrap();

        assert_eq!(summary.frames, 3);
        assert_eq!(summary.last_frame.shadow_passes, 4);
        assert_eq!(summary.total_shadow_passes, 12);
        assert_eq!(backend.frames_presented(), 3);
        assert!(backend.calls().is_empty());
        assert!(!engine.is_running());
    }

    #[test]
    fn escape_stops_the_engine() {
        let mut engine = Engine::new(headless_config()).unwrap();
        let actions = engine.handle_events([AppEvent::KeyPressed(KeyCode::Escape)], 0.0);
        assert_eq!(actions, vec![InputAction::Close]);
        assert!(!engine.is_running());
    }

    #[test]
    fn toggled_light_stays_off_across_frames() {
        let mut engine = Engine::new(headless_config()).unwrap();
        engine.handle_events([AppEvent::KeyPressed(KeyCode::Digit(1))], 0.0);
        assert_eq!(engine.scene().lights.is_enabled(LightId::Point(0)), Some(false));

        let mut backend = RecordingBackend::new();
        let summary = engine.run_headless(&mut backend, 2).unwrap();
        assert_eq!(summary.last_frame.shadow_passes, 3);
        assert_eq!(summary.last_frame.depth_bindings, 4);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = headless_config();
        config.window.width = 0;
        let err = Engine::new(config).err().unwrap();
        assert!(err.is_initialization_failure());
    }

    #[test]
    fn state_file_is_saved_and_restored() {
        let path = std::env::temp_dir().join(format!("chess_engine_state_{}.txt", std::process::id()));
        let mut config = headless_config();
        config.state_file = Some(path.to_string_lossy().into_owned());

        let mut engine = Engine::new(config.clone()).unwrap();
        engine.scene_mut().clear_color = crate::foundation::math::Vec3::new(0.1, 0.2, 0.3);
        engine.scene_mut().set_ui_enabled(true);
        engine.shutdown().unwrap();

        let restored = Engine::new(config).unwrap();
        assert!(restored.scene().ui_enabled);
        assert!(!restored.scene().camera_mouse_enabled);
        approx::assert_relative_eq!(restored.scene().clear_color.z, 0.3, epsilon = 1e-5);

        std::fs::remove_file(path).unwrap();
    }
}
