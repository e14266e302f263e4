//! # 3D Fly Camera
//!
//! Euler-angle camera driven by keyboard movement, mouse look and scroll zoom.
//! The renderer reads it every frame to build the view and projection
//! matrices and to measure piece distances for draw ordering.
//!
//! ## Conventions
//! - Right-handed world, `world_up` defaults to +Y
//! - `yaw`/`pitch` in degrees; yaw −90° looks down −Z
//! - `zoom` is the vertical field of view in degrees, clamped to `1..=45`

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};
use serde::{Deserialize, Serialize};

/// Pitch limit used when mouse look is constrained
const PITCH_LIMIT: f32 = 89.0;

/// Zoom (field of view) bounds in degrees
const MIN_ZOOM: f32 = 1.0;
const MAX_ZOOM: f32 = 45.0;

/// Keyboard movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Movement {
    /// Along `front`
    Forward,
    /// Against `front`
    Backward,
    /// Against `right`
    Left,
    /// Along `right`
    Right,
    /// Along world up
    Up,
    /// Against world up
    Down,
}

/// Camera start-up parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial position
    pub position: Vec3,
    /// World up axis
    pub world_up: Vec3,
    /// Initial yaw in degrees
    pub yaw: f32,
    /// Initial pitch in degrees
    pub pitch: f32,
    /// Movement speed in units per second
    pub movement_speed: f32,
    /// Degrees of rotation per pixel of mouse movement
    pub mouse_sensitivity: f32,
    /// Initial vertical field of view in degrees
    pub zoom: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, -9.0, 9.0),
            world_up: Vec3::new(0.0, 1.0, 0.0),
            yaw: -90.0,
            pitch: 0.0,
            movement_speed: 2.5,
            mouse_sensitivity: 0.1,
            zoom: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Fly camera
///
/// `front`, `right` and `up` are derived from `yaw`/`pitch` and kept in sync
/// by every mutating method.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// World-space position
    pub position: Vec3,
    /// Unit view direction
    pub front: Vec3,
    /// Unit camera up
    pub up: Vec3,
    /// Unit camera right
    pub right: Vec3,
    /// World up axis
    pub world_up: Vec3,
    /// Yaw in degrees
    pub yaw: f32,
    /// Pitch in degrees
    pub pitch: f32,
    /// Units per second
    pub movement_speed: f32,
    /// Degrees per pixel
    pub mouse_sensitivity: f32,
    /// Vertical field of view in degrees
    pub zoom: f32,
    /// Viewport width over height
    pub aspect: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a camera from configuration with the given aspect ratio
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self {
            position: config.position,
            front: Vec3::new(0.0, 0.0, -1.0),
            up: config.world_up,
            right: Vec3::new(1.0, 0.0, 0.0),
            world_up: config.world_up.normalize(),
            yaw: config.yaw,
            pitch: config.pitch,
            movement_speed: config.movement_speed,
            mouse_sensitivity: config.mouse_sensitivity,
            zoom: config.zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            aspect,
            near: config.near,
            far: config.far,
        };
        camera.update_vectors();
        camera
    }

    /// Move the camera for `delta_time` seconds in `direction`
    pub fn process_keyboard(&mut self, direction: Movement, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        let offset = match direction {
            Movement::Forward => self.front,
            Movement::Backward => -self.front,
            Movement::Left => -self.right,
            Movement::Right => self.right,
            Movement::Up => self.world_up,
            Movement::Down => -self.world_up,
        };
        self.position += offset * velocity;
    }

    /// Rotate by a mouse delta in pixels (`y_offset` positive = look up)
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch += y_offset * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_vectors();
    }

    /// Zoom by a scroll delta; scrolling up narrows the field of view
    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Update the aspect ratio for viewport changes
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > 0.01 {
            log::info!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// Point the camera along `front`, recomputing yaw and pitch
    ///
    /// A zero vector leaves the orientation unchanged.
    pub fn set_front(&mut self, front: Vec3) {
        let Some(front) = front.try_normalize(f32::EPSILON) else {
            return;
        };
        self.pitch = utils::rad_to_deg(front.y.clamp(-1.0, 1.0).asin());
        self.yaw = utils::rad_to_deg(front.z.atan2(front.x));
        self.update_vectors();
    }

    /// World-to-view transform
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.position + self.front, self.up)
    }

    /// Perspective projection using `zoom` as the vertical field of view
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(utils::deg_to_rad(self.zoom), self.aspect, self.near, self.far)
    }

    fn update_vectors(&mut self) {
        let yaw = utils::deg_to_rad(self.yaw);
        let pitch = utils::deg_to_rad(self.pitch);
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize();
        self.right = self.front.cross(&self.world_up).normalize();
        self.up = self.right.cross(&self.front).normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraConfig::default(), 800.0 / 600.0)
    }
}
