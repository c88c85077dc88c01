//! # glw
//!
//! A thin, lifetime-safe wrapper over OpenGL 3.3+ objects.
//!
//! ## Features
//!
//! - **RAII handles**: buffers, programs, textures and friends delete their
//!   driver object when dropped; non-owning references never do
//! - **Lazy creation**: objects are generated on first use unless the context
//!   enables auto instantiation
//! - **Typed buffers**: element counts instead of byte counts, mapped ranges as
//!   slices that unmap on drop
//! - **Readable failures**: shader compile and link errors carry the driver log
//! - **Window shim**: a GLFW window with a current core profile context
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use glw::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut window = Window::new(&WindowConfig::default())?;
//!     let gl = window.gl().clone();
//!
//!     let mut vbo = ArrayBuffer::<[f32; 2]>::new(&gl)?;
//!     vbo.attach_vertex_array(std::rc::Rc::new(VertexArray::create(&gl)?));
//!     vbo.upload(&[[0.0, 0.5], [-0.5, -0.5], [0.5, -0.5]], BufferUsage::StaticDraw)?;
//!     vbo.set_attribs(&[Attrib::new(0, 0).components(2)])?;
//!
//!     while !window.is_closed() {
//!         window.update_events();
//!         gl.clear().color(Color::gray(0.1));
//!         vbo.draw(Primitive::Triangles)?;
//!         window.swap_buffers();
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;

pub mod buffer;
pub mod config;
pub mod context;
pub mod driver;
pub mod error;
pub mod framebuffer;
pub mod object;
pub mod program;
pub mod renderbuffer;
pub mod sampler;
pub mod shader;
pub mod state;
pub mod texture;
pub mod uniform;
pub mod vertex_array;
pub mod window;

#[cfg(test)]
mod testing;

pub use foundation::logging;

pub use buffer::{
    ArrayBuffer, Attrib, AttribType, Buffer, BufferTarget, BufferUsage, ElementBuffer, IndexType, MapAccess,
    Mapped, MappedMut, Primitive, UniformBuffer,
};
pub use config::{Config, ConfigError, WindowConfig};
pub use context::Gl;
pub use driver::Driver;
pub use error::{ErrorCode, GlError, GlResult};
pub use framebuffer::{Attachment, Framebuffer, FramebufferStatus, FramebufferTarget};
pub use object::Object;
pub use program::Program;
pub use renderbuffer::RenderBuffer;
pub use sampler::{CompareFunction, Filter, Sampler, Wrap};
pub use shader::{AttribLocation, Collection, Shader, ShaderKind};
pub use state::{Capability, ClearFlags, Color};
pub use texture::{InternalFormat, PixelFormat, PixelType, Texture, TextureTarget};
pub use uniform::{Uniform, UniformRef, UniformStatic, UniformValue};
pub use vertex_array::VertexArray;
pub use window::{Window, WindowError, WindowResult};

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        foundation::math::{IVec2, Mat2, Mat3, Mat4, Rect, Vec2, Vec3, Vec4},
        ArrayBuffer, Attrib, AttribType, Attachment, Buffer, BufferTarget, BufferUsage, Capability, ClearFlags,
        Color, CompareFunction, Config, ElementBuffer, Filter, Framebuffer, Gl, GlError, GlResult, InternalFormat,
        Object, PixelFormat, PixelType, Primitive, Program, RenderBuffer, Sampler, Shader, ShaderKind, Texture,
        TextureTarget, Uniform, UniformBuffer, UniformRef, UniformStatic, VertexArray, Window, WindowConfig, Wrap,
    };
}
