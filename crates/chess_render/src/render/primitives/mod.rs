//! Core primitive types for rendering
//!
//! Meshes, vertices and the fly camera.

pub mod camera;
pub mod mesh;

pub use camera::{Camera, CameraConfig, Movement};
pub use mesh::{Mesh, Vertex};
