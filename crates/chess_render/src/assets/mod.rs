//! Asset loading
//!
//! OBJ parsing and the start-up upload of every scene model.

pub mod obj_loader;
pub mod scene_meshes;

pub use obj_loader::{ObjError, ObjLoader};
pub use scene_meshes::{load_scene_meshes, SceneMeshes};
