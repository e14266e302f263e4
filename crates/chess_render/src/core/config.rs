//! # Application Configuration
//!
//! Everything the renderer reads at start-up: window size, shadow map
//! parameters, the camera's initial pose, the light registry, the asset root
//! and the optional state file. Missing sections fall back to the reference
//! scene, so an empty file is a valid configuration.
//!
//! ```toml
//! log_level = "debug"
//! state_file = "resources/program_state.txt"
//!
//! [window]
//! width = 1280
//! height = 720
//!
//! [shadows]
//! resolution = 1024
//! ```

use crate::foundation::logging;
use crate::render::lighting::LightRegistry;
use crate::render::primitives::CameraConfig;
use crate::render::shadow::ShadowSettings;
use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};

/// Window creation parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Initial framebuffer width in pixels
    pub width: u32,
    /// Initial framebuffer height in pixels
    pub height: u32,
    /// Frame rate cap for the windowed loop
    pub max_fps: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Chess".to_string(),
            width: 800,
            height: 600,
            max_fps: 60,
        }
    }
}

/// Asset location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory holding `objects/`
    pub root: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self { root: "resources".to_string() }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Window parameters
    pub window: WindowConfig,
    /// Shadow map parameters
    pub shadows: ShadowSettings,
    /// Initial camera
    pub camera: CameraConfig,
    /// Lights, in slot order
    pub lighting: LightRegistry,
    /// Asset location
    pub assets: AssetConfig,
    /// Where camera and clear color persist between runs
    pub state_file: Option<String>,
    /// Default log level when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            shadows: ShadowSettings::default(),
            camera: CameraConfig::default(),
            lighting: LightRegistry::reference(),
            assets: AssetConfig::default(),
            state_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl ApplicationConfig {
    /// Log level as a filter, `Info` when unrecognised
    pub fn log_filter(&self) -> log::LevelFilter {
        logging::parse_level(&self.log_level)
    }

    /// Check values that deserialize but cannot be rendered
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.window.width == 0 || self.window.height == 0 {
            return invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            ));
        }
        if self.window.max_fps == 0 {
            return invalid("max_fps must be non-zero".to_string());
        }
        if self.shadows.resolution == 0 {
            return invalid("shadow resolution must be non-zero".to_string());
        }
        if !(self.shadows.near_plane > 0.0 && self.shadows.near_plane < self.shadows.far_plane) {
            return invalid(format!(
                "shadow planes must satisfy 0 < near < far, got {} and {}",
                self.shadows.near_plane, self.shadows.far_plane
            ));
        }
        if !(self.camera.near > 0.0 && self.camera.near < self.camera.far) {
            return invalid(format!(
                "camera planes must satisfy 0 < near < far, got {} and {}",
                self.camera.near, self.camera.far
            ));
        }
        for (i, spot) in self.lighting.spot_lights.iter().enumerate() {
            if spot.cut_off < spot.outer_cut_off {
                return invalid(format!(
                    "spot light {i}: inner cone cosine {} is below outer cone cosine {}",
                    spot.cut_off, spot.outer_cut_off
                ));
            }
        }
        Ok(())
    }
}

impl Config for ApplicationConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_reference_scene() {
        let config = ApplicationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lighting.len(), 4);
        assert_eq!(config.window.width, 800);
        assert_eq!(config.log_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let text = r#"
            log_level = "debug"
            [window]
            width = 1280
            [shadows]
            resolution = 512
        "#;
        let config: ApplicationConfig = toml::from_str(text).unwrap();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.shadows.resolution, 512);
        assert!((config.shadows.far_plane - 25.0).abs() < f32::EPSILON);
        assert_eq!(config.lighting.len(), 4);
        assert_eq!(config.log_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = ApplicationConfig::default();
        config.shadows.resolution = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ApplicationConfig::default();
        config.window.max_fps = 0;
        assert!(config.validate().is_err());

        let mut config = ApplicationConfig::default();
        config.shadows.near_plane = 30.0;
        assert!(config.validate().is_err());

        let mut config = ApplicationConfig::default();
        config.lighting.spot_lights[0] = config.lighting.spot_lights[0].clone().with_cone_degrees(20.0, 10.0);
        assert!(config.validate().is_err());

        let mut config = ApplicationConfig::default();
        config.window.height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn ron_round_trip() {
        let config = ApplicationConfig::default();
        let text = ron::ser::to_string(&config).unwrap();
        let parsed: ApplicationConfig = ron::from_str(&text).unwrap();
        assert_eq!(parsed.lighting.len(), config.lighting.len());
        assert_eq!(parsed.window, config.window);
    }
}
