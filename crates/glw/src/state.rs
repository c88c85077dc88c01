//! Global context state: clearing and capability toggles

use bitflags::bitflags;

use crate::context::Gl;
use crate::foundation::math::{Vec3, Vec4};

bitflags! {
    /// Buffers affected by `glClear` and `glBlitFramebuffer`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u32 {
        /// GL_COLOR_BUFFER_BIT
        const COLOR = glow::COLOR_BUFFER_BIT;
        /// GL_DEPTH_BUFFER_BIT
        const DEPTH = glow::DEPTH_BUFFER_BIT;
        /// GL_STENCIL_BUFFER_BIT
        const STENCIL = glow::STENCIL_BUFFER_BIT;
    }
}

impl Default for ClearFlags {
    fn default() -> Self {
        Self::COLOR
    }
}

/// RGBA clear color
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color {
    /// Color from components
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque gray
    pub const fn gray(value: f32) -> Self {
        Self::new(value, value, value, 1.0)
    }
}

impl From<[f32; 4]> for Color {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl From<(f32, f32, f32, f32)> for Color {
    fn from((r, g, b, a): (f32, f32, f32, f32)) -> Self {
        Self::new(r, g, b, a)
    }
}

impl From<Vec4> for Color {
    fn from(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl From<(Vec3, f32)> for Color {
    fn from((rgb, a): (Vec3, f32)) -> Self {
        Self::new(rgb.x, rgb.y, rgb.z, a)
    }
}

/// Server-side capabilities toggled with `glEnable` / `glDisable`
///
/// Only capabilities valid on a core profile context are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// GL_BLEND
    Blend,
    /// GL_CULL_FACE
    CullFace,
    /// GL_DEPTH_TEST
    DepthTest,
    /// GL_DEPTH_CLAMP
    DepthClamp,
    /// GL_MULTISAMPLE
    Multisample,
    /// GL_SCISSOR_TEST
    ScissorTest,
    /// GL_STENCIL_TEST
    StencilTest,
    /// GL_POLYGON_OFFSET_FILL
    PolygonOffsetFill,
    /// GL_FRAMEBUFFER_SRGB
    FramebufferSrgb,
    /// GL_PROGRAM_POINT_SIZE
    ProgramPointSize,
    /// GL_PRIMITIVE_RESTART
    PrimitiveRestart,
    /// GL_RASTERIZER_DISCARD
    RasterizerDiscard,
    /// GL_SAMPLE_ALPHA_TO_COVERAGE
    SampleAlphaToCoverage,
    /// GL_TEXTURE_CUBE_MAP_SEAMLESS
    TextureCubeMapSeamless,
}

impl Capability {
    /// Raw GL enum
    pub const fn raw(self) -> u32 {
        match self {
            Self::Blend => glow::BLEND,
            Self::CullFace => glow::CULL_FACE,
            Self::DepthTest => glow::DEPTH_TEST,
            Self::DepthClamp => glow::DEPTH_CLAMP,
            Self::Multisample => glow::MULTISAMPLE,
            Self::ScissorTest => glow::SCISSOR_TEST,
            Self::StencilTest => glow::STENCIL_TEST,
            Self::PolygonOffsetFill => glow::POLYGON_OFFSET_FILL,
            Self::FramebufferSrgb => glow::FRAMEBUFFER_SRGB,
            Self::ProgramPointSize => glow::PROGRAM_POINT_SIZE,
            Self::PrimitiveRestart => glow::PRIMITIVE_RESTART,
            Self::RasterizerDiscard => glow::RASTERIZER_DISCARD,
            Self::SampleAlphaToCoverage => glow::SAMPLE_ALPHA_TO_COVERAGE,
            Self::TextureCubeMapSeamless => glow::TEXTURE_CUBE_MAP_SEAMLESS,
        }
    }
}

/// Chainable clear helper returned by [`Gl::clear`]
///
/// Each call sets the clear value and immediately clears that buffer.
pub struct Clear<'a> {
    gl: &'a Gl,
}

impl Clear<'_> {
    /// Clear the color buffer
    pub fn color(self, color: impl Into<Color>) -> Self {
        self.gl.clear_color(color);
        self
    }

    /// Clear the depth buffer
    pub fn depth(self, value: f32) -> Self {
        self.gl.clear_depth(value);
        self
    }

    /// Clear the stencil buffer
    pub fn stencil(self, value: i32) -> Self {
        self.gl.clear_stencil(value);
        self
    }
}

impl Gl {
    /// Start a clear chain
    pub fn clear(&self) -> Clear<'_> {
        Clear { gl: self }
    }

    /// Set the clear color and clear the color buffer
    pub fn clear_color(&self, color: impl Into<Color>) {
        let Color { r, g, b, a } = color.into();
        self.set_clear_color(r, g, b, a);
        self.clear_mask(ClearFlags::COLOR.bits());
    }

    /// Set the clear depth and clear the depth buffer
    pub fn clear_depth(&self, value: f32) {
        self.set_clear_depth(value);
        self.clear_mask(ClearFlags::DEPTH.bits());
    }

    /// Set the clear stencil value and clear the stencil buffer
    pub fn clear_stencil(&self, value: i32) {
        self.set_clear_stencil(value);
        self.clear_mask(ClearFlags::STENCIL.bits());
    }

    /// Clear the selected buffers with the current clear values
    pub fn clear_buffers(&self, flags: ClearFlags) {
        self.clear_mask(flags.bits());
    }

    /// Enable a capability
    pub fn enable(&self, capability: Capability) -> &Self {
        self.enable_capability(capability.raw());
        self
    }

    /// Enable a capability for one indexed target (e.g. a draw buffer)
    pub fn enable_indexed(&self, capability: Capability, index: u32) -> &Self {
        self.enable_capability_indexed(capability.raw(), index);
        self
    }

    /// Disable a capability
    pub fn disable(&self, capability: Capability) -> &Self {
        self.disable_capability(capability.raw());
        self
    }

    /// Disable a capability for one indexed target
    pub fn disable_indexed(&self, capability: Capability, index: u32) -> &Self {
        self.disable_capability_indexed(capability.raw(), index);
        self
    }

    /// Query whether a capability is enabled
    pub fn is_enabled(&self, capability: Capability) -> bool {
        self.is_capability_enabled(capability.raw())
    }
}
