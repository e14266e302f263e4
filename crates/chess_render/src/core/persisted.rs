//! Persisted view state
//!
//! A flat text file of ten numbers, one per line: clear color r g b, the UI
//! flag (0 or 1), camera position x y z and camera front x y z. Reading
//! accepts any whitespace between values. A missing file means there is
//! nothing to restore.

use crate::foundation::math::Vec3;
use crate::scene::SceneState;
use std::path::Path;
use thiserror::Error;

/// Number of values in the file
const FIELD_COUNT: usize = 10;

/// State file errors
#[derive(Error, Debug)]
pub enum StateError {
    /// The file exists but could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The file content does not match the format
    #[error("Parse error: {0}")]
    Parse(String),
}

/// View state carried between runs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersistedState {
    /// Main pass clear color
    pub clear_color: [f32; 3],
    /// Whether UI mode was on
    pub ui_enabled: bool,
    /// Camera position
    pub camera_position: Vec3,
    /// Camera view direction
    pub camera_front: Vec3,
}

impl PersistedState {
    /// Capture the persisted fields of a scene
    pub fn capture(scene: &SceneState) -> Self {
        Self {
            clear_color: [scene.clear_color.x, scene.clear_color.y, scene.clear_color.z],
            ui_enabled: scene.ui_enabled,
            camera_position: scene.camera.position,
            camera_front: scene.camera.front,
        }
    }

    /// Restore the persisted fields into a scene
    pub fn apply(&self, scene: &mut SceneState) {
        scene.clear_color = Vec3::from(self.clear_color);
        scene.set_ui_enabled(self.ui_enabled);
        scene.camera.position = self.camera_position;
        scene.camera.set_front(self.camera_front);
    }

    /// Parse the text format
    pub fn parse(text: &str) -> Result<Self, StateError> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() < FIELD_COUNT {
            return Err(StateError::Parse(format!(
                "expected {FIELD_COUNT} values, found {}",
                tokens.len()
            )));
        }

        let float = |i: usize| -> Result<f32, StateError> {
            tokens[i]
                .parse()
                .map_err(|_| StateError::Parse(format!("value {} is not a number: {:?}", i + 1, tokens[i])))
        };
        let ui_enabled = match tokens[3] {
            "0" => false,
            "1" => true,
            other => {
                return Err(StateError::Parse(format!("UI flag must be 0 or 1, got {other:?}")));
            }
        };

        Ok(Self {
            clear_color: [float(0)?, float(1)?, float(2)?],
            ui_enabled,
            camera_position: Vec3::new(float(4)?, float(5)?, float(6)?),
            camera_front: Vec3::new(float(7)?, float(8)?, float(9)?),
        })
    }

    /// Render the text format
    pub fn to_text(&self) -> String {
        let values = [
            self.clear_color[0].to_string(),
            self.clear_color[1].to_string(),
            self.clear_color[2].to_string(),
            u8::from(self.ui_enabled).to_string(),
            self.camera_position.x.to_string(),
            self.camera_position.y.to_string(),
            self.camera_position.z.to_string(),
            self.camera_front.x.to_string(),
            self.camera_front.y.to_string(),
            self.camera_front.z.to_string(),
        ];
        let mut text = values.join("\n");
        text.push('\n');
        text
    }

    /// Load from `path`; `Ok(None)` when the file does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<Self>, StateError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let state = Self::parse(&text)?;
                log::debug!("Parsed state file {}", path.display());
                Ok(Some(state))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No state file at {}", path.display());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write to `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StateError> {
        std::fs::write(path.as_ref(), self.to_text())?;
        Ok(())
    }
}
