//! Framebuffer objects
//!
//! Off-screen render targets built from texture and renderbuffer attachments,
//! plus helpers to blit between framebuffers and to the window's back buffer.

use crate::context::Gl;
use crate::error::{GlError, GlResult};
use crate::foundation::math::Rect;
use crate::object::{Handle, Object, ObjectKind};
use crate::renderbuffer::RenderBuffer;
use crate::sampler::Filter;
use crate::state::ClearFlags;
use crate::texture::Texture;

/// Framebuffer binding target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FramebufferTarget {
    /// GL_READ_FRAMEBUFFER
    Read,
    /// GL_DRAW_FRAMEBUFFER
    Draw,
    /// GL_FRAMEBUFFER, both read and draw
    #[default]
    Frame,
}

impl FramebufferTarget {
    /// Raw GL enum
    pub const fn raw(self) -> u32 {
        match self {
            Self::Read => glow::READ_FRAMEBUFFER,
            Self::Draw => glow::DRAW_FRAMEBUFFER,
            Self::Frame => glow::FRAMEBUFFER,
        }
    }
}

/// Attachment point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attachment {
    /// GL_COLOR_ATTACHMENTn
    Color(u32),
    /// GL_DEPTH_ATTACHMENT
    Depth,
    /// GL_STENCIL_ATTACHMENT
    Stencil,
    /// GL_DEPTH_STENCIL_ATTACHMENT
    DepthStencil,
}

impl Attachment {
    /// Raw GL enum
    pub const fn raw(self) -> u32 {
        match self {
            Self::Color(index) => glow::COLOR_ATTACHMENT0 + index,
            Self::Depth => glow::DEPTH_ATTACHMENT,
            Self::Stencil => glow::STENCIL_ATTACHMENT,
            Self::DepthStencil => glow::DEPTH_STENCIL_ATTACHMENT,
        }
    }
}

/// Result of `glCheckFramebufferStatus`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramebufferStatus {
    /// GL_FRAMEBUFFER_COMPLETE
    Complete,
    /// GL_FRAMEBUFFER_UNDEFINED
    Undefined,
    /// GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT
    IncompleteAttachment,
    /// GL_FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT
    MissingAttachment,
    /// GL_FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER
    IncompleteDrawBuffer,
    /// GL_FRAMEBUFFER_INCOMPLETE_READ_BUFFER
    IncompleteReadBuffer,
    /// GL_FRAMEBUFFER_UNSUPPORTED
    Unsupported,
    /// GL_FRAMEBUFFER_INCOMPLETE_MULTISAMPLE
    IncompleteMultisample,
    /// GL_FRAMEBUFFER_INCOMPLETE_LAYER_TARGETS
    IncompleteLayerTargets,
    /// Any other value, including 0 when the query itself failed
    Unknown(u32),
}

impl FramebufferStatus {
    /// Decode a raw status value
    pub const fn from_raw(raw: u32) -> Self {
        match raw {
            glow::FRAMEBUFFER_COMPLETE => Self::Complete,
            glow::FRAMEBUFFER_UNDEFINED => Self::Undefined,
            glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => Self::IncompleteAttachment,
            glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => Self::MissingAttachment,
            glow::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => Self::IncompleteDrawBuffer,
            glow::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => Self::IncompleteReadBuffer,
            glow::FRAMEBUFFER_UNSUPPORTED => Self::Unsupported,
            glow::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => Self::IncompleteMultisample,
            glow::FRAMEBUFFER_INCOMPLETE_LAYER_TARGETS => Self::IncompleteLayerTargets,
            other => Self::Unknown(other),
        }
    }

    /// Whether the framebuffer can be rendered to
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Object kind marker for framebuffers
pub struct FramebufferObject;

impl ObjectKind for FramebufferObject {
    const LABEL: &'static str = "framebuffer";

    fn delete(gl: &Gl, id: u32) {
        gl.delete_framebuffer(id);
    }
}

/// Framebuffer object
#[derive(Debug)]
pub struct Framebuffer {
    handle: Handle<FramebufferObject>,
}

impl Framebuffer {
    /// Create a framebuffer, generated now only when auto instantiation is on
    pub fn new(gl: &Gl) -> GlResult<Self> {
        let framebuffer = Self {
            handle: Handle::new(gl),
        };
        if gl.auto_instantiate() {
            framebuffer.instantiate()?;
        }
        Ok(framebuffer)
    }

    /// Create and generate a framebuffer immediately
    pub fn create(gl: &Gl) -> GlResult<Self> {
        let framebuffer = Self::new(gl)?;
        framebuffer.instantiate()?;
        Ok(framebuffer)
    }

    /// Wrap an existing framebuffer name, taking ownership
    pub fn from_raw(gl: &Gl, id: u32) -> Self {
        Self {
            handle: Handle::adopt(gl, id),
        }
    }

    /// Bind the default (window) framebuffer for reading and drawing
    pub fn bind_screen(gl: &Gl) {
        Self::bind_screen_to(gl, FramebufferTarget::Frame);
    }

    /// Bind the default framebuffer to `target`
    pub fn bind_screen_to(gl: &Gl, target: FramebufferTarget) {
        gl.bind_framebuffer(target.raw(), 0);
    }

    /// Bind to `target`, generating the framebuffer first if needed
    ///
    /// A framebuffer never binds name 0, which would select the window.
    pub fn bind_to(&self, target: FramebufferTarget) -> GlResult<()> {
        let id = self.handle.instantiate_with(|gl| gl.create_framebuffer())?;
        self.handle.gl().bind_framebuffer(target.raw(), id);
        Ok(())
    }

    /// Copy a region of `from` into this framebuffer
    pub fn blit(&self, from: &Framebuffer, src: Rect, dst: Rect, mask: ClearFlags, filter: Filter) -> GlResult<()> {
        from.bind_to(FramebufferTarget::Read)?;
        self.bind_to(FramebufferTarget::Draw)?;
        self.handle
            .gl()
            .blit_framebuffer(src.to_array(), dst.to_array(), mask.bits(), filter.raw());
        Ok(())
    }

    /// Copy a region of this framebuffer to the window's back buffer
    pub fn blit_to_screen(&self, src: Rect, dst: Rect, mask: ClearFlags, filter: Filter) -> GlResult<()> {
        let gl = self.handle.gl();
        self.bind_to(FramebufferTarget::Read)?;
        Self::bind_screen_to(gl, FramebufferTarget::Draw);
        gl.draw_buffer(glow::BACK);
        gl.blit_framebuffer(src.to_array(), dst.to_array(), mask.bits(), filter.raw());
        Ok(())
    }

    /// Attach one level of a texture, generating the texture if needed
    pub fn attach_texture(&mut self, attachment: Attachment, texture: &Texture, level: i32) -> GlResult<()> {
        texture.instantiate()?;
        self.bind()?;
        self.handle.gl().framebuffer_texture(
            FramebufferTarget::Frame.raw(),
            attachment.raw(),
            texture.target().raw(),
            texture.id(),
            level,
        );
        Ok(())
    }

    /// Attach a renderbuffer, generating it if needed
    pub fn attach_renderbuffer(&mut self, attachment: Attachment, renderbuffer: &RenderBuffer) -> GlResult<()> {
        renderbuffer.instantiate()?;
        self.bind()?;
        self.handle
            .gl()
            .framebuffer_renderbuffer(FramebufferTarget::Frame.raw(), attachment.raw(), renderbuffer.id());
        Ok(())
    }

    /// Completeness status
    pub fn status(&self) -> GlResult<FramebufferStatus> {
        self.bind()?;
        Ok(FramebufferStatus::from_raw(
            self.handle
                .gl()
                .check_framebuffer_status(FramebufferTarget::Frame.raw()),
        ))
    }

    /// Error unless the framebuffer is complete
    pub fn check_complete(&self) -> GlResult<()> {
        match self.status()? {
            FramebufferStatus::Complete => Ok(()),
            status => Err(GlError::IncompleteFramebuffer(status)),
        }
    }

    /// Clear buffers of this framebuffer with the current clear values
    pub fn clear(&self, flags: ClearFlags) -> GlResult<()> {
        self.bind()?;
        self.handle.gl().clear_buffers(flags);
        Ok(())
    }
}

impl Object for Framebuffer {
    fn id(&self) -> u32 {
        self.handle.id()
    }

    fn bind(&self) -> GlResult<()> {
        self.bind_to(FramebufferTarget::Frame)
    }

    fn instantiate(&self) -> GlResult<()> {
        self.handle.instantiate_with(|gl| gl.create_framebuffer())?;
        Ok(())
    }

    fn destroy(&mut self) {
        self.handle.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::IVec2;
    use crate::texture::{InternalFormat, PixelFormat, PixelType, TextureTarget};
    use crate::testing::FakeDriver;

    #[test]
    fn test_attachment_enums() {
        assert_eq!(Attachment::Color(0).raw(), glow::COLOR_ATTACHMENT0);
        assert_eq!(Attachment::Color(3).raw(), glow::COLOR_ATTACHMENT3);
        assert_eq!(Attachment::DepthStencil.raw(), glow::DEPTH_STENCIL_ATTACHMENT);
    }

    #[test]
    fn test_status_decoding() {
        assert_eq!(FramebufferStatus::from_raw(glow::FRAMEBUFFER_COMPLETE), FramebufferStatus::Complete);
        assert_eq!(FramebufferStatus::from_raw(0), FramebufferStatus::Unknown(0));
        assert!(!FramebufferStatus::Unsupported.is_complete());
    }

    #[test]
    fn test_attach_and_check() {
        let (gl, fake) = FakeDriver::context();
        let mut color = Texture::with_size(&gl, TextureTarget::Texture2D, 32, 32).unwrap();
        color.init_null(PixelFormat::Rgba, PixelType::UnsignedByte).unwrap();
        let mut depth = RenderBuffer::new(&gl, IVec2::new(32, 32)).unwrap();
        depth.storage(InternalFormat::Depth24Stencil8, None).unwrap();

        let mut fbo = Framebuffer::new(&gl).unwrap();
        fbo.attach_texture(Attachment::Color(0), &color, 0).unwrap();
        fbo.attach_renderbuffer(Attachment::DepthStencil, &depth).unwrap();
        assert!(fake.called(&format!(
            "framebuffer_texture({:#x}, {:#x}, {:#x}, {}, 0)",
            glow::FRAMEBUFFER,
            glow::COLOR_ATTACHMENT0,
            glow::TEXTURE_2D,
            color.id()
        )));
        assert!(fake.called(&format!(
            "framebuffer_renderbuffer({:#x}, {:#x}, {})",
            glow::FRAMEBUFFER,
            glow::DEPTH_STENCIL_ATTACHMENT,
            depth.id()
        )));
        assert!(fbo.check_complete().is_ok());

        fake.set_framebuffer_status(glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT);
        let err = fbo.check_complete().unwrap_err();
        assert!(matches!(
            err,
            GlError::IncompleteFramebuffer(FramebufferStatus::MissingAttachment)
        ));
    }

    #[test]
    fn test_blit_to_screen_targets_back_buffer() {
        let (gl, fake) = FakeDriver::context();
        let fbo = Framebuffer::create(&gl).unwrap();
        fake.clear_calls();
        fbo.blit_to_screen(Rect::from_size(64, 64), Rect::from_size(128, 128), ClearFlags::COLOR, Filter::Linear)
            .unwrap();
        assert_eq!(
            fake.calls(),
            vec![
                format!("bind_framebuffer({:#x}, {})", glow::READ_FRAMEBUFFER, fbo.id()),
                format!("bind_framebuffer({:#x}, 0)", glow::DRAW_FRAMEBUFFER),
                format!("draw_buffer({:#x})", glow::BACK),
                format!(
                    "blit_framebuffer([0, 0, 64, 64], [0, 0, 128, 128], {:#x}, {:#x})",
                    glow::COLOR_BUFFER_BIT,
                    glow::LINEAR
                ),
            ]
        );
    }

    #[test]
    fn test_blit_between_framebuffers() {
        let (gl, fake) = FakeDriver::context();
        let src = Framebuffer::create(&gl).unwrap();
        let dst = Framebuffer::create(&gl).unwrap();
        dst.blit(&src, Rect::new(0, 0, 8, 8), Rect::new(8, 8, 0, 0), ClearFlags::DEPTH, Filter::Nearest)
            .unwrap();
        assert!(fake.called(&format!("bind_framebuffer({:#x}, {})", glow::READ_FRAMEBUFFER, src.id())));
        assert!(fake.called(&format!("bind_framebuffer({:#x}, {})", glow::DRAW_FRAMEBUFFER, dst.id())));
        assert!(fake.called(&format!(
            "blit_framebuffer([0, 0, 8, 8], [8, 8, 0, 0], {:#x}, {:#x})",
            glow::DEPTH_BUFFER_BIT,
            glow::NEAREST
        )));
    }

    #[test]
    fn test_clear_and_screen_binding() {
        let (gl, fake) = FakeDriver::context();
        let fbo = Framebuffer::create(&gl).unwrap();
        fbo.clear(ClearFlags::COLOR | ClearFlags::DEPTH).unwrap();
        Framebuffer::bind_screen(&gl);
        assert!(fake.called(&format!("clear({:#x})", glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT)));
        assert!(fake.called(&format!("bind_framebuffer({:#x}, 0)", glow::FRAMEBUFFER)));
    }

    #[test]
    fn test_lazy_framebuffer_never_targets_the_window() {
        let (gl, fake) = FakeDriver::context();
        let fbo = Framebuffer::new(&gl).unwrap();
        assert!(!fbo.is_instantiated());

        fbo.clear(ClearFlags::COLOR).unwrap();
        assert_ne!(fbo.id(), 0);
        assert_eq!(
            fake.calls(),
            vec![
                format!("create_framebuffer() -> {}", fbo.id()),
                format!("bind_framebuffer({:#x}, {})", glow::FRAMEBUFFER, fbo.id()),
                format!("clear({:#x})", glow::COLOR_BUFFER_BIT),
            ]
        );
    }

    #[test]
    fn test_attach_generates_lazy_attachments() {
        let (gl, fake) = FakeDriver::context();
        let texture = Texture::new(&gl).unwrap();
        let depth = RenderBuffer::new(&gl, IVec2::new(4, 4)).unwrap();
        let mut fbo = Framebuffer::new(&gl).unwrap();

        fbo.attach_texture(Attachment::Color(0), &texture, 0).unwrap();
        fbo.attach_renderbuffer(Attachment::Depth, &depth).unwrap();
        assert_ne!(texture.id(), 0);
        assert_ne!(depth.id(), 0);
        assert!(fake.called(&format!(
            "framebuffer_renderbuffer({:#x}, {:#x}, {})",
            glow::FRAMEBUFFER,
            glow::DEPTH_ATTACHMENT,
            depth.id()
        )));
    }
}
