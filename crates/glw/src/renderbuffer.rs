//! Renderbuffer objects

use crate::context::Gl;
use crate::error::GlResult;
use crate::foundation::math::IVec2;
use crate::object::{Handle, Object, ObjectKind};
use crate::texture::InternalFormat;

/// Object kind marker for renderbuffers
pub struct RenderBufferObject;

impl ObjectKind for RenderBufferObject {
    const LABEL: &'static str = "renderbuffer";

    fn delete(gl: &Gl, id: u32) {
        gl.delete_renderbuffer(id);
    }
}

/// Renderbuffer, an image that can only be rendered to
#[derive(Debug)]
pub struct RenderBuffer {
    handle: Handle<RenderBufferObject>,
    size: IVec2,
}

impl RenderBuffer {
    /// Create a renderbuffer of `size`; storage is allocated separately
    pub fn new(gl: &Gl, size: IVec2) -> GlResult<Self> {
        let renderbuffer = Self {
            handle: Handle::new(gl),
            size,
        };
        if gl.auto_instantiate() {
            renderbuffer.instantiate()?;
        }
        Ok(renderbuffer)
    }

    /// Allocate single-sample storage, optionally resizing first
    pub fn storage(&mut self, format: InternalFormat, size: Option<IVec2>) -> GlResult<()> {
        self.storage_multisample(1, format, size)
    }

    /// Allocate multisample storage, optionally resizing first
    ///
    /// A sample count of 1 or less allocates regular storage.
    pub fn storage_multisample(&mut self, samples: i32, format: InternalFormat, size: Option<IVec2>) -> GlResult<()> {
        if let Some(size) = size {
            self.size = size;
        }
        self.bind()?;
        let gl = self.handle.gl();
        if samples > 1 {
            gl.renderbuffer_storage_multisample(samples, format.raw(), self.size.x, self.size.y);
        } else {
            gl.renderbuffer_storage(format.raw(), self.size.x, self.size.y);
        }
        Ok(())
    }

    /// Set the size used by the next allocation
    pub fn set_size(&mut self, size: IVec2) {
        self.size = size;
    }

    /// Size in pixels
    pub fn size(&self) -> IVec2 {
        self.size
    }
}

impl Object for RenderBuffer {
    fn id(&self) -> u32 {
        self.handle.id()
    }

    fn bind(&self) -> GlResult<()> {
        self.instantiate()?;
        self.handle.gl().bind_renderbuffer(self.handle.id());
        Ok(())
    }

    fn instantiate(&self) -> GlResult<()> {
        self.handle.instantiate_with(|gl| gl.create_renderbuffer())?;
        Ok(())
    }

    fn destroy(&mut self) {
        self.handle.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeDriver;

    #[test]
    fn test_storage() {
        let (gl, fake) = FakeDriver::context();
        let mut rb = RenderBuffer::new(&gl, IVec2::new(640, 480)).unwrap();
        assert!(!rb.is_instantiated());

        rb.storage(InternalFormat::Depth24Stencil8, None).unwrap();
        assert!(rb.is_instantiated());
        assert!(fake.called(&format!("bind_renderbuffer({})", rb.id())));
        assert!(fake.called(&format!("renderbuffer_storage({:#x}, 640, 480)", glow::DEPTH24_STENCIL8)));
    }

    #[test]
    fn test_single_sample_uses_plain_storage() {
        let (gl, fake) = FakeDriver::context();
        let mut rb = RenderBuffer::new(&gl, IVec2::new(4, 4)).unwrap();
        rb.storage_multisample(1, InternalFormat::Rgba8, Some(IVec2::new(8, 8))).unwrap();
        assert_eq!(rb.size(), IVec2::new(8, 8));
        assert_eq!(fake.count("renderbuffer_storage_multisample"), 0);

        rb.storage_multisample(4, InternalFormat::Rgba8, None).unwrap();
        assert!(fake.called(&format!("renderbuffer_storage_multisample(4, {:#x}, 8, 8)", glow::RGBA8)));
    }

    #[test]
    fn test_drop_deletes() {
        let (gl, fake) = FakeDriver::context();
        gl.set_auto_instantiate(true);
        let rb = RenderBuffer::new(&gl, IVec2::new(1, 1)).unwrap();
        let id = rb.id();
        assert!(fake.is_live(id));
        drop(rb);
        assert!(!fake.is_live(id));
    }
}
