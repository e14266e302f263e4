//! Input handling
//!
//! Translates [`AppEvent`]s into scene changes between frames. Held movement
//! keys are polled once per frame and scaled by the frame's delta time;
//! everything else reacts to the press event itself.
//!
//! | Input            | Effect                                   |
//! |------------------|------------------------------------------|
//! | W / S / A / D    | move forward / back / left / right       |
//! | Space / L-Shift  | move up / down                           |
//! | Escape           | close                                    |
//! | F1               | toggle UI mode (releases the cursor)     |
//! | 1 – 9            | toggle the light in slot 0 – 8           |
//! | M                | toggle light markers                     |
//! | mouse            | look, when camera mouse look is enabled  |
//! | scroll           | zoom                                     |

use crate::application::AppEvent;
use crate::render::api::Viewport;
use crate::render::primitives::Movement;
use crate::scene::SceneState;
use std::collections::HashSet;

/// Keys the renderer responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// W key
    W,
    /// A key
    A,
    /// S key
    S,
    /// D key
    D,
    /// M key
    M,
    /// Space key
    Space,
    /// Left shift
    LeftShift,
    /// Escape key
    Escape,
    /// F1 key
    F1,
    /// Number row key `1..=9`
    Digit(u8),
}

impl KeyCode {
    /// Movement bound to this key
    pub fn movement(self) -> Option<Movement> {
        match self {
            KeyCode::W => Some(Movement::Forward),
            KeyCode::S => Some(Movement::Backward),
            KeyCode::A => Some(Movement::Left),
            KeyCode::D => Some(Movement::Right),
            KeyCode::Space => Some(Movement::Up),
            KeyCode::LeftShift => Some(Movement::Down),
            _ => None,
        }
    }
}

/// Side effects the window has to carry out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Stop the frame loop
    Close,
    /// Capture (`true`) or release (`false`) the cursor
    CaptureCursor(bool),
    /// The framebuffer changed size
    Resize(Viewport),
}

/// Held keys and the last cursor sample
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<KeyCode>,
    last_cursor: Option<(f64, f64)>,
}

impl InputState {
    /// Create an input state with nothing held
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` is currently held
    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Apply one event to the scene
    pub fn handle_event(&mut self, event: AppEvent, scene: &mut SceneState) -> Option<InputAction> {
        match event {
            AppEvent::WindowCloseRequested => Some(InputAction::Close),
            AppEvent::WindowResized { width, height } => {
                let viewport = Viewport::new(width, height);
                if height > 0 {
                    scene.camera.set_aspect_ratio(viewport.aspect_ratio());
                }
                Some(InputAction::Resize(viewport))
            }
            AppEvent::KeyPressed(key) => {
                self.held.insert(key);
                self.handle_key_press(key, scene)
            }
            AppEvent::KeyReleased(key) => {
                self.held.remove(&key);
                None
            }
            AppEvent::MouseMoved { x, y } => {
                // The first sample only seeds the reference point.
                let (last_x, last_y) = self.last_cursor.replace((x, y))?;
                if scene.camera_mouse_enabled {
                    let x_offset = (x - last_x) as f32;
                    let y_offset = (last_y - y) as f32;
                    scene.camera.process_mouse_movement(x_offset, y_offset, true);
                }
                None
            }
            AppEvent::MouseWheel { delta_y, .. } => {
                scene.camera.process_mouse_scroll(delta_y as f32);
                None
            }
        }
    }

    fn handle_key_press(&mut self, key: KeyCode, scene: &mut SceneState) -> Option<InputAction> {
        match key {
            KeyCode::Escape => Some(InputAction::Close),
            KeyCode::F1 => {
                let ui = scene.toggle_ui();
                // Re-seed so the jump to the released cursor is not a look delta.
                self.last_cursor = None;
                Some(InputAction::CaptureCursor(!ui))
            }
            KeyCode::M => {
                scene.toggle_light_markers();
                None
            }
            KeyCode::Digit(n @ 1..=9) => {
                let slot = usize::from(n - 1);
                if scene.lights.toggle(slot).is_none() {
                    log::debug!("No light in slot {}", slot);
                }
                None
            }
            _ => None,
        }
    }

    /// Move the camera for every held movement key
    pub fn apply_movement(&self, scene: &mut SceneState, delta_time: f32) {
        for movement in self.held.iter().filter_map(|key| key.movement()) {
            scene.camera.process_keyboard(movement, delta_time);
        }
    }
}

/// Apply a batch of events, then held-key movement for `delta_time`
///
/// Returns the actions the window must carry out, in event order.
pub fn apply_input<I>(
    input: &mut InputState,
    events: I,
    scene: &mut SceneState,
    delta_time: f32,
) -> Vec<InputAction>
where
    I: IntoIterator<Item = AppEvent>,
{
    let actions = events
        .into_iter()
        .filter_map(|event| input.handle_event(event, scene))
        .collect();
    input.apply_movement(scene, delta_time);
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::lighting::LightId;
    use approx::assert_relative_eq;

    #[test]
    fn first_mouse_sample_does_not_turn_the_camera() {
        let mut input = InputState::new();
        let mut scene = SceneState::default();
        let yaw = scene.camera.yaw;

        input.handle_event(AppEvent::MouseMoved { x: 500.0, y: 300.0 }, &mut scene);
        assert_relative_eq!(scene.camera.yaw, yaw);

        input.handle_event(AppEvent::MouseMoved { x: 510.0, y: 290.0 }, &mut scene);
        assert_relative_eq!(scene.camera.yaw, yaw + 1.0, epsilon = 1e-5);
        assert_relative_eq!(scene.camera.pitch, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn ui_mode_blocks_mouse_look_and_releases_cursor() {
        let mut input = InputState::new();
        let mut scene = SceneState::default();

        let action = input.handle_event(AppEvent::KeyPressed(KeyCode::F1), &mut scene);
        assert_eq!(action, Some(InputAction::CaptureCursor(false)));

        input.handle_event(AppEvent::MouseMoved { x: 0.0, y: 0.0 }, &mut scene);
        input.handle_event(AppEvent::MouseMoved { x: 100.0, y: 0.0 }, &mut scene);
        assert_relative_eq!(scene.camera.yaw, -90.0);
    }

    #[test]
    fn digits_toggle_light_slots() {
        let mut input = InputState::new();
        let mut scene = SceneState::default();
        input.handle_event(AppEvent::KeyPressed(KeyCode::Digit(2)), &mut scene);
        assert_eq!(scene.lights.is_enabled(LightId::Spot(0)), Some(false));

        // Slot 8 does not exist in the reference scene.
        input.handle_event(AppEvent::KeyPressed(KeyCode::Digit(9)), &mut scene);
        assert_eq!(scene.lights.enabled_count(), 3);
    }

    #[test]
    fn held_keys_move_every_frame_until_released() {
        let mut input = InputState::new();
        let mut scene = SceneState::default();
        let start = scene.camera.position;

        let actions = apply_input(&mut input, [AppEvent::KeyPressed(KeyCode::Space)], &mut scene, 1.0);
        assert!(actions.is_empty());
        apply_input(&mut input, std::iter::empty(), &mut scene, 1.0);
        assert_relative_eq!(scene.camera.position, start + Vec3::new(0.0, 5.0, 0.0), epsilon = 1e-5);

        apply_input(&mut input, [AppEvent::KeyReleased(KeyCode::Space)], &mut scene, 1.0);
        assert_relative_eq!(scene.camera.position, start + Vec3::new(0.0, 5.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn resize_updates_aspect_and_reports_viewport() {
        let mut input = InputState::new();
        let mut scene = SceneState::default();
        let actions = apply_input(
            &mut input,
            [AppEvent::WindowResized { width: 1000, height: 500 }, AppEvent::KeyPressed(KeyCode::Escape)],
            &mut scene,
            0.0,
        );
        assert_eq!(actions, vec![InputAction::Resize(Viewport::new(1000, 500)), InputAction::Close]);
        assert_relative_eq!(scene.camera.aspect, 2.0);
    }

    #[test]
    fn scroll_zooms_and_markers_toggle() {
        let mut input = InputState::new();
        let mut scene = SceneState::default();
        input.handle_event(AppEvent::MouseWheel { delta_x: 0.0, delta_y: 5.0 }, &mut scene);
        assert_relative_eq!(scene.camera.zoom, 40.0);

        input.handle_event(AppEvent::KeyPressed(KeyCode::M), &mut scene);
        assert!(!scene.show_light_markers);
    }
}
