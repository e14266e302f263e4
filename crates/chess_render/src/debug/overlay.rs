//! Text overlay with camera and light diagnostics
//!
//! Produces plain lines of text each frame. The windowed runner shows them
//! in the title bar while UI mode is on; headless runs log them.

use crate::foundation::math::Vec3;
use crate::foundation::time::Timer;
use crate::render::lighting::LightId;
use crate::scene::SceneState;

/// Diagnostic text built from the scene state
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugOverlay;

impl DebugOverlay {
    /// One line per item: camera position, orientation, front, frame rate,
    /// then one line per light in shadow slot order
    pub fn lines(scene: &SceneState, timer: &Timer) -> Vec<String> {
        let camera = &scene.camera;
        let mut lines = vec![
            format!("Camera position: {}", format_vec3(camera.position)),
            format!("Yaw: {:.1}  Pitch: {:.1}", camera.yaw, camera.pitch),
            format!("Front: {}", format_vec3(camera.front)),
            format!("FPS: {:.1}", timer.current_fps()),
        ];

        let lights = &scene.lights;
        for slot in 0..lights.len() {
            let Some(id) = lights.light_at_slot(slot) else {
                continue;
            };
            let state = if lights.is_enabled(id).unwrap_or(false) { "on" } else { "off" };
            lines.push(format!("[{}] {}: {}", slot + 1, light_label(id), state));
        }
        lines
    }

    /// Single-line form for a window title
    pub fn title(base: &str, scene: &SceneState, timer: &Timer) -> String {
        let lights: String = (0..scene.lights.len())
            .map(|slot| {
                let enabled = scene
                    .lights
                    .light_at_slot(slot)
                    .and_then(|id| scene.lights.is_enabled(id))
                    .unwrap_or(false);
                if enabled { '1' } else { '0' }
            })
            .collect();
        format!(
            "{base} | pos {} | yaw {:.0} pitch {:.0} | {:.0} fps | lights {lights}",
            format_vec3(scene.camera.position),
            scene.camera.yaw,
            scene.camera.pitch,
            timer.current_fps(),
        )
    }
}

fn light_label(id: LightId) -> String {
    match id {
        LightId::Point(i) => format!("point light {i}"),
        LightId::Spot(i) => format!("spot light {i}"),
    }
}

fn format_vec3(v: Vec3) -> String {
    format!("({:.2}, {:.2}, {:.2})", v.x, v.y, v.z)
}
