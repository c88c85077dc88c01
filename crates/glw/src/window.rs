//! Window management using GLFW
//!
//! Creates a window with a current OpenGL context and hands out the [`Gl`]
//! handle that every wrapped object is created from.

use glfw::Context as _;
use thiserror::Error;

use crate::config::{ConfigError, WindowConfig};
use crate::context::Gl;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// GLFW could not be initialized
    #[error("GLFW initialization failed: {0}")]
    InitializationFailed(String),

    /// The window or its context could not be created
    #[error("Window creation failed")]
    CreationFailed,

    /// The window configuration is invalid
    #[error("Invalid window configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for window operations
pub type WindowResult<T> = Result<T, WindowError>;

/// GLFW window owning the OpenGL context
///
/// Dropping the window destroys the context. Objects still alive at that point
/// only forget their names.
pub struct Window {
    gl: Gl,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
    glfw: glfw::Glfw,
}

impl Window {
    /// Open a window and make its context current
    pub fn new(config: &WindowConfig) -> WindowResult<Self> {
        config.validate()?;

        let mut glfw = glfw::init(glfw::fail_on_errors)
            .map_err(|e| WindowError::InitializationFailed(e.to_string()))?;

        let (major, minor) = config.gl_version;
        glfw.window_hint(glfw::WindowHint::ContextVersion(major, minor));
        if config.core_profile {
            glfw.window_hint(glfw::WindowHint::OpenGlProfile(glfw::OpenGlProfileHint::Core));
            glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));
        }
        glfw.window_hint(glfw::WindowHint::DoubleBuffer(true));
        glfw.window_hint(glfw::WindowHint::DepthBits(Some(config.depth_bits)));
        glfw.window_hint(glfw::WindowHint::StencilBits(Some(config.stencil_bits)));
        glfw.window_hint(glfw::WindowHint::Samples((config.samples > 0).then_some(config.samples)));
        glfw.window_hint(glfw::WindowHint::Resizable(config.resizable));

        let (mut window, events) = glfw
            .create_window(config.width, config.height, &config.title, glfw::WindowMode::Windowed)
            .ok_or(WindowError::CreationFailed)?;

        window.make_current();
        window.set_key_polling(true);
        window.set_close_polling(true);
        window.set_framebuffer_size_polling(true);
        glfw.set_swap_interval(if config.vsync {
            glfw::SwapInterval::Sync(1)
        } else {
            glfw::SwapInterval::None
        });

        // SAFETY: the window's context was made current above and outlives the
        // loader calls, which only resolve function pointers.
        let context = unsafe {
            glow::Context::from_loader_function(|name| window.get_proc_address(name) as *const _)
        };
        let gl = Gl::new(context);
        gl.set_auto_instantiate(config.auto_instantiate);

        let (width, height) = window.get_framebuffer_size();
        gl.viewport(0, 0, width, height);
        log::debug!(
            "created {}x{} window '{}' with OpenGL {major}.{minor} context",
            width,
            height,
            config.title
        );

        Ok(Self {
            gl,
            window,
            events,
            glfw,
        })
    }

    /// Poll pending events and apply the built-in handling
    ///
    /// Escape or a close request marks the window closed; framebuffer resizes
    /// update the viewport. Every event is returned for further handling.
    pub fn update_events(&mut self) -> Vec<glfw::WindowEvent> {
        self.glfw.poll_events();
        let mut drained = Vec::new();
        for (_, event) in glfw::flush_messages(&self.events) {
            match event {
                glfw::WindowEvent::Key(glfw::Key::Escape, _, glfw::Action::Press, _)
                | glfw::WindowEvent::Close => self.window.set_should_close(true),
                glfw::WindowEvent::FramebufferSize(width, height) => {
                    log::trace!("framebuffer resized to {width}x{height}");
                    self.gl.viewport(0, 0, width, height);
                }
                _ => {}
            }
            drained.push(event);
        }
        drained
    }

    /// Present the back buffer
    pub fn swap_buffers(&mut self) {
        self.window.swap_buffers();
    }

    /// Whether the window was asked to close
    pub fn is_closed(&self) -> bool {
        self.window.should_close()
    }

    /// Ask the window to close
    pub fn close(&mut self) {
        self.window.set_should_close(true);
    }

    /// Window size in screen coordinates
    pub fn size(&self) -> (i32, i32) {
        self.window.get_size()
    }

    /// Framebuffer size in pixels
    pub fn framebuffer_size(&self) -> (i32, i32) {
        self.window.get_framebuffer_size()
    }

    /// Context handle
    pub fn gl(&self) -> &Gl {
        &self.gl
    }

    /// Seconds since GLFW was initialized
    pub fn time(&self) -> f64 {
        self.glfw.get_time()
    }

    /// Underlying GLFW window
    pub fn glfw_window(&mut self) -> &mut glfw::PWindow {
        &mut self.window
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        log::debug!("destroying window, context is lost");
        self.gl.mark_lost();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_is_rejected_before_glfw() {
        let config = WindowConfig {
            width: 0,
            ..WindowConfig::default()
        };
        let err = Window::new(&config).err().map(|e| e.to_string());
        assert!(err.is_some_and(|msg| msg.starts_with("Invalid window configuration")));
    }
}
