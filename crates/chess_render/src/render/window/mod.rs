//! Window management subsystem
//!
//! GLFW window creation, cursor capture and input event translation. The
//! graphics backend attaches to the window separately; window creation
//! failure is fatal.

pub mod handle;

pub use handle::{key_code, translate_event, WindowError, WindowHandle, WindowResult};
