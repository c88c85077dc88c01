//! Error types for OpenGL object management
//!
//! Shader compilation and program linking failures carry the driver's info log.
//! Everything else the driver reports through its own error state, which can be
//! polled with [`Gl::last_error`](crate::Gl::last_error).

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::framebuffer::FramebufferStatus;
use crate::shader::ShaderKind;

/// OpenGL wrapper errors
#[derive(Error, Debug)]
pub enum GlError {
    /// The driver refused to generate a new object name
    #[error("Failed to create {object}: {message}")]
    Creation {
        /// Kind of object that was being created
        object: &'static str,
        /// Message returned by the driver
        message: String,
    },

    /// A shader source file could not be read
    #[error("Shader file not found ({path}): {source}")]
    ShaderFile {
        /// Path that was requested
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Shader compilation failed
    #[error("Shader compilation failed\nShader name: {name}\nShader type: {kind}\nError:\n{log}")]
    Compile {
        /// Stage of the failing shader
        kind: ShaderKind,
        /// File path or label of the shader source
        name: String,
        /// Info log returned by the driver
        log: String,
    },

    /// Program linking failed
    #[error("Program link failed\nError:\n{log}{}", link_code_suffix(.code))]
    Link {
        /// Info log returned by the driver
        log: String,
        /// Pending driver error after the link attempt, if any
        code: Option<ErrorCode>,
    },

    /// Shaders cannot be attached through a non-owning program reference
    #[error("Program reference not accessible for attachment")]
    ProgramReference,

    /// Buffer mapping failed
    #[error("Buffer map failed: {0}")]
    Map(String),

    /// A write would run past the end of the buffer storage
    #[error("Buffer write out of range: {offset} + {len} > {capacity}")]
    OutOfRange {
        /// First element written
        offset: usize,
        /// Number of elements written
        len: usize,
        /// Allocated element capacity
        capacity: usize,
    },

    /// Pixel data is smaller than the texture upload footprint
    #[error("Texture data too small: expected {expected} bytes, got {actual}")]
    TextureData {
        /// Bytes the driver will read
        expected: usize,
        /// Bytes provided
        actual: usize,
    },

    /// Image decoding failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Framebuffer is not complete
    #[error("Framebuffer incomplete: {0:?}")]
    IncompleteFramebuffer(FramebufferStatus),
}

fn link_code_suffix(code: &Option<ErrorCode>) -> String {
    code.map(|c| format!("\nOpenGL error ({}): {c}", c.raw()))
        .unwrap_or_default()
}

/// Result type for OpenGL wrapper operations
pub type GlResult<T> = Result<T, GlError>;

/// Error codes reported by `glGetError`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// GL_INVALID_ENUM
    InvalidEnum,
    /// GL_INVALID_VALUE
    InvalidValue,
    /// GL_INVALID_OPERATION
    InvalidOperation,
    /// GL_STACK_OVERFLOW
    StackOverflow,
    /// GL_STACK_UNDERFLOW
    StackUnderflow,
    /// GL_OUT_OF_MEMORY
    OutOfMemory,
    /// GL_INVALID_FRAMEBUFFER_OPERATION
    InvalidFramebufferOperation,
    /// GL_CONTEXT_LOST
    ContextLost,
    /// Any other value
    Unknown(u32),
}

impl ErrorCode {
    /// Map a raw driver error value, `None` for `GL_NO_ERROR`
    pub fn from_raw(raw: u32) -> Option<Self> {
        let code = match raw {
            glow::NO_ERROR => return None,
            glow::INVALID_ENUM => Self::InvalidEnum,
            glow::INVALID_VALUE => Self::InvalidValue,
            glow::INVALID_OPERATION => Self::InvalidOperation,
            glow::STACK_OVERFLOW => Self::StackOverflow,
            glow::STACK_UNDERFLOW => Self::StackUnderflow,
            glow::OUT_OF_MEMORY => Self::OutOfMemory,
            glow::INVALID_FRAMEBUFFER_OPERATION => Self::InvalidFramebufferOperation,
            glow::CONTEXT_LOST => Self::ContextLost,
            other => Self::Unknown(other),
        };
        Some(code)
    }

    /// Raw driver value
    pub fn raw(self) -> u32 {
        match self {
            Self::InvalidEnum => glow::INVALID_ENUM,
            Self::InvalidValue => glow::INVALID_VALUE,
            Self::InvalidOperation => glow::INVALID_OPERATION,
            Self::StackOverflow => glow::STACK_OVERFLOW,
            Self::StackUnderflow => glow::STACK_UNDERFLOW,
            Self::OutOfMemory => glow::OUT_OF_MEMORY,
            Self::InvalidFramebufferOperation => glow::INVALID_FRAMEBUFFER_OPERATION,
            Self::ContextLost => glow::CONTEXT_LOST,
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::InvalidEnum => "invalid enumerant",
            Self::InvalidValue => "invalid value",
            Self::InvalidOperation => "invalid operation",
            Self::StackOverflow => "stack overflow",
            Self::StackUnderflow => "stack underflow",
            Self::OutOfMemory => "out of memory",
            Self::InvalidFramebufferOperation => "invalid framebuffer operation",
            Self::ContextLost => "context lost",
            Self::Unknown(_) => "unknown error",
        };
        f.write_str(text)
    }
}
