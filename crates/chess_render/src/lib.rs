//! # Chess Render
//!
//! A shadow-mapped chess scene: an 8x8 board with 32 pieces lit by point
//! and spot lights, each casting omnidirectional shadows through a depth
//! cube map.
//!
//! ## Features
//!
//! - **Board model**: squares, pieces and their world-space placement
//! - **Lighting**: point and spot lights with per-light enable toggles
//! - **Shadows**: one depth cube pass per enabled light each frame
//! - **Backend seam**: all GPU work goes through [`render::api::RenderBackend`]
//! - **Configuration**: TOML or RON, with the reference scene as default
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chess_render::prelude::*;
//!
//! fn main() -> Result<(), AppError> {
//!     let mut engine = Engine::new(ApplicationConfig::default())?;
//!     let mut backend = RecordingBackend::new();
//!     let summary = engine.run_headless(&mut backend, 10)?;
//!     println!("{} draw calls", summary.total_draw_calls);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod core;

pub mod application;
pub mod assets;
pub mod board;
pub mod config;
pub mod debug;
pub mod engine;
pub mod foundation;
pub mod input;
pub mod render;
pub mod scene;

pub use application::{AppError, AppEvent};
pub use engine::{Engine, HeadlessSummary};

/// Common imports for renderer users
pub mod prelude {
    pub use crate::{
        application::{AppError, AppEvent},
        board::{Board, BoardError, Piece, PieceColor, PieceKind, Square},
        core::config::{ApplicationConfig, Config},
        engine::{Engine, HeadlessSummary},
        foundation::{
            math::{Mat4, Vec3},
            time::Timer,
        },
        render::{
            api::{RenderBackend, ShaderStage, UniformValue, Viewport},
            backends::RecordingBackend,
            lighting::{LightId, LightRegistry, PointLight, SpotLight},
            primitives::{Camera, Mesh},
            FrameLoop, FrameStats, RenderError,
        },
        scene::SceneState,
    };
}
