//! GLFW window handle
//!
//! Owns the GLFW context and the single window. Events are flushed once per
//! frame and translated into [`AppEvent`]s; held keys can also be queried
//! directly.

use crate::application::AppEvent;
use crate::core::config::WindowConfig;
use crate::input::{InputAction, KeyCode};
use crate::render::api::Viewport;
use thiserror::Error;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// GLFW could not be initialized
    #[error("GLFW initialization failed")]
    InitializationFailed,

    /// The window or its context could not be created
    #[error("Window creation failed: {0}")]
    CreationFailed(String),
}

/// Result type for window operations
pub type WindowResult<T> = Result<T, WindowError>;

/// GLFW window wrapper
pub struct WindowHandle {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
    title: String,
}

impl WindowHandle {
    /// Create the window with the cursor captured
    pub fn new(config: &WindowConfig) -> WindowResult<Self> {
        let mut glfw = glfw::init(glfw::fail_on_errors).map_err(|_| WindowError::InitializationFailed)?;

        // The graphics backend owns the context.
        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi));
        glfw.window_hint(glfw::WindowHint::Resizable(true));

        let (mut window, events) = glfw
            .create_window(config.width, config.height, &config.title, glfw::WindowMode::Windowed)
            .ok_or_else(|| {
                WindowError::CreationFailed(format!("{}x{} '{}'", config.width, config.height, config.title))
            })?;

        window.set_key_polling(true);
        window.set_close_polling(true);
        window.set_cursor_pos_polling(true);
        window.set_scroll_polling(true);
        window.set_framebuffer_size_polling(true);
        window.set_cursor_mode(glfw::CursorMode::Disabled);

        log::info!("Created {}x{} window '{}'", config.width, config.height, config.title);
        Ok(Self {
            glfw,
            window,
            events,
            title: config.title.clone(),
        })
    }

    /// Whether a close was requested
    pub fn should_close(&self) -> bool {
        self.window.should_close()
    }

    /// Request or cancel a close
    pub fn set_should_close(&mut self, should_close: bool) {
        self.window.set_should_close(should_close);
    }

    /// Poll GLFW and translate everything queued since the last call
    pub fn poll_events(&mut self) -> Vec<AppEvent> {
        self.glfw.poll_events();
        glfw::flush_messages(&self.events)
            .filter_map(|(_, event)| translate_event(event))
            .collect()
    }

    /// Block until an event arrives or `timeout` seconds pass, then
    /// translate everything queued
    pub fn wait_events_timeout(&mut self, timeout: f64) -> Vec<AppEvent> {
        self.glfw.wait_events_timeout(timeout);
        glfw::flush_messages(&self.events)
            .filter_map(|(_, event)| translate_event(event))
            .collect()
    }

    /// Whether `key` is held right now
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.window.get_key(glfw_key(key)) == glfw::Action::Press
    }

    /// Current framebuffer size
    pub fn viewport(&self) -> Viewport {
        let (width, height) = self.window.get_framebuffer_size();
        Viewport::new(non_negative(width), non_negative(height))
    }

    /// Capture or release the cursor
    pub fn set_cursor_captured(&mut self, captured: bool) {
        let mode = if captured { glfw::CursorMode::Disabled } else { glfw::CursorMode::Normal };
        self.window.set_cursor_mode(mode);
    }

    /// Base title given at creation
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Replace the title bar text
    pub fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    /// Carry out the window side of input actions
    pub fn apply_actions(&mut self, actions: &[InputAction]) {
        for action in actions {
            match *action {
                InputAction::Close => self.set_should_close(true),
                InputAction::CaptureCursor(captured) => self.set_cursor_captured(captured),
                InputAction::Resize(viewport) => {
                    log::debug!("Framebuffer resized to {}x{}", viewport.width, viewport.height);
                }
            }
        }
    }
}

fn non_negative(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

/// Translate a GLFW event; unhandled events map to `None`
pub fn translate_event(event: glfw::WindowEvent) -> Option<AppEvent> {
    match event {
        glfw::WindowEvent::Key(key, _, glfw::Action::Press, _) => key_code(key).map(AppEvent::KeyPressed),
        glfw::WindowEvent::Key(key, _, glfw::Action::Release, _) => key_code(key).map(AppEvent::KeyReleased),
        glfw::WindowEvent::CursorPos(x, y) => Some(AppEvent::MouseMoved { x, y }),
        glfw::WindowEvent::Scroll(delta_x, delta_y) => Some(AppEvent::MouseWheel { delta_x, delta_y }),
        glfw::WindowEvent::FramebufferSize(width, height) => Some(AppEvent::WindowResized {
            width: non_negative(width),
            height: non_negative(height),
        }),
        glfw::WindowEvent::Close => Some(AppEvent::WindowCloseRequested),
        _ => None,
    }
}

/// Map a GLFW key to the keys the renderer uses
pub fn key_code(key: glfw::Key) -> Option<KeyCode> {
    use glfw::Key;
    Some(match key {
        Key::W => KeyCode::W,
        Key::A => KeyCode::A,
        Key::S => KeyCode::S,
        Key::D => KeyCode::D,
        Key::M => KeyCode::M,
        Key::Space => KeyCode::Space,
        Key::LeftShift => KeyCode::LeftShift,
        Key::Escape => KeyCode::Escape,
        Key::F1 => KeyCode::F1,
        Key::Num1 => KeyCode::Digit(1),
        Key::Num2 => KeyCode::Digit(2),
        Key::Num3 => KeyCode::Digit(3),
        Key::Num4 => KeyCode::Digit(4),
        Key::Num5 => KeyCode::Digit(5),
        Key::Num6 => KeyCode::Digit(6),
        Key::Num7 => KeyCode::Digit(7),
        Key::Num8 => KeyCode::Digit(8),
        Key::Num9 => KeyCode::Digit(9),
        _ => return None,
    })
}

fn glfw_key(key: KeyCode) -> glfw::Key {
    use glfw::Key;
    match key {
        KeyCode::W => Key::W,
        KeyCode::A => Key::A,
        KeyCode::S => Key::S,
        KeyCode::D => Key::D,
        KeyCode::M => Key::M,
        KeyCode::Space => Key::Space,
        KeyCode::LeftShift => Key::LeftShift,
        KeyCode::Escape => Key::Escape,
        KeyCode::F1 => Key::F1,
        KeyCode::Digit(1) => Key::Num1,
        KeyCode::Digit(2) => Key::Num2,
        KeyCode::Digit(3) => Key::Num3,
        KeyCode::Digit(4) => Key::Num4,
        KeyCode::Digit(5) => Key::Num5,
        KeyCode::Digit(6) => Key::Num6,
        KeyCode::Digit(7) => Key::Num7,
        KeyCode::Digit(8) => Key::Num8,
        KeyCode::Digit(9) => Key::Num9,
        KeyCode::Digit(_) => Key::Unknown,
    }
}
