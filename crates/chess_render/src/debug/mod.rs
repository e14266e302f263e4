//! Debug diagnostics
//!
//! Text lines describing the camera, frame rate and light states.

pub mod overlay;

pub use overlay::DebugOverlay;
