//! Backend implementations for the render module
//!
//! The recording backend keeps the full command stream in memory. GPU
//! backends implement the same [`RenderBackend`](crate::render::api::RenderBackend)
//! trait outside this crate.

pub mod recording;

pub use recording::{BackendCall, RecordingBackend};
