//! # Core Application Module
//!
//! Start-up configuration and the view state persisted between runs.

pub mod config;
pub mod persisted;

pub use config::{ApplicationConfig, AssetConfig, Config, ConfigError, WindowConfig};
pub use persisted::{PersistedState, StateError};
