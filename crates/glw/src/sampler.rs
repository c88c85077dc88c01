//! Sampler objects
//!
//! A sampler holds texture filtering, wrapping and comparison state separately
//! from the texture data. Parameter setters act on the driver object directly
//! and generate it first when it does not exist yet.

use crate::context::Gl;
use crate::error::GlResult;
use crate::object::{Handle, Object, ObjectKind};

/// Texel filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    /// GL_NEAREST
    #[default]
    Nearest,
    /// GL_LINEAR
    Linear,
}

impl Filter {
    const fn offset(self) -> u32 {
        match self {
            Self::Nearest => 0,
            Self::Linear => 1,
        }
    }

    /// Raw GL enum without mipmapping
    pub const fn raw(self) -> u32 {
        glow::NEAREST + self.offset()
    }

    /// Raw GL minification enum, optionally sampling between mipmap levels
    pub const fn raw_min(self, mipmap: Option<Filter>) -> u32 {
        match mipmap {
            None => self.raw(),
            Some(mipmap) => glow::NEAREST_MIPMAP_NEAREST + self.offset() + 2 * mipmap.offset(),
        }
    }
}

/// Depth comparison function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompareFunction {
    /// Comparison disabled
    #[default]
    None,
    /// GL_NEVER
    Never,
    /// GL_ALWAYS
    Always,
    /// GL_LESS
    Less,
    /// GL_LEQUAL
    LessEqual,
    /// GL_EQUAL
    Equal,
    /// GL_NOTEQUAL
    NotEqual,
    /// GL_GEQUAL
    GreaterEqual,
    /// GL_GREATER
    Greater,
}

impl CompareFunction {
    /// Raw GL enum, `None` when comparison is disabled
    pub const fn raw(self) -> Option<u32> {
        match self {
            Self::None => None,
            Self::Never => Some(glow::NEVER),
            Self::Always => Some(glow::ALWAYS),
            Self::Less => Some(glow::LESS),
            Self::LessEqual => Some(glow::LEQUAL),
            Self::Equal => Some(glow::EQUAL),
            Self::NotEqual => Some(glow::NOTEQUAL),
            Self::GreaterEqual => Some(glow::GEQUAL),
            Self::Greater => Some(glow::GREATER),
        }
    }
}

/// Texture coordinate wrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Wrap {
    /// GL_REPEAT
    #[default]
    Repeat,
    /// GL_MIRRORED_REPEAT
    MirroredRepeat,
    /// GL_CLAMP_TO_EDGE
    ClampToEdge,
    /// GL_CLAMP_TO_BORDER
    ClampToBorder,
    /// GL_MIRROR_CLAMP_TO_EDGE
    MirroredClampToEdge,
}

impl Wrap {
    /// Raw GL enum
    pub const fn raw(self) -> u32 {
        match self {
            Self::Repeat => glow::REPEAT,
            Self::MirroredRepeat => glow::MIRRORED_REPEAT,
            Self::ClampToEdge => glow::CLAMP_TO_EDGE,
            Self::ClampToBorder => glow::CLAMP_TO_BORDER,
            Self::MirroredClampToEdge => glow::MIRROR_CLAMP_TO_EDGE,
        }
    }
}

fn enum_param(value: u32) -> i32 {
    // GL enums all fit in i32
    value as i32
}

/// Object kind marker for samplers
pub struct SamplerObject;

impl ObjectKind for SamplerObject {
    const LABEL: &'static str = "sampler";

    fn delete(gl: &Gl, id: u32) {
        gl.delete_sampler(id);
    }
}

/// Sampler object
#[derive(Debug)]
pub struct Sampler {
    handle: Handle<SamplerObject>,
}

impl Sampler {
    /// Create a sampler, generated now only when auto instantiation is on
    pub fn new(gl: &Gl) -> GlResult<Self> {
        let sampler = Self {
            handle: Handle::new(gl),
        };
        if gl.auto_instantiate() {
            sampler.instantiate()?;
        }
        Ok(sampler)
    }

    /// Create and generate a sampler immediately
    pub fn create(gl: &Gl) -> GlResult<Self> {
        let sampler = Self::new(gl)?;
        sampler.instantiate()?;
        Ok(sampler)
    }

    /// Wrap an existing sampler name, taking ownership
    pub fn from_raw(gl: &Gl, id: u32) -> Self {
        Self {
            handle: Handle::adopt(gl, id),
        }
    }

    /// Bind to a texture unit
    pub fn bind_to(&self, unit: u32) -> GlResult<()> {
        let id = self.ensure_id()?;
        self.handle.gl().bind_sampler(unit, id);
        Ok(())
    }

    /// Unbind any sampler from unit 0
    pub fn unbind(gl: &Gl) {
        Self::unbind_from(gl, 0);
    }

    /// Unbind any sampler from a texture unit
    pub fn unbind_from(gl: &Gl, unit: u32) {
        gl.bind_sampler(unit, 0);
    }

    fn ensure_id(&self) -> GlResult<u32> {
        self.handle.instantiate_with(|gl| gl.create_sampler())
    }

    /// Set an integer parameter
    pub fn set_parameter_i32(&self, name: u32, value: i32) -> GlResult<()> {
        let id = self.ensure_id()?;
        self.handle.gl().sampler_parameter_i32(id, name, value);
        Ok(())
    }

    /// Set a float parameter
    pub fn set_parameter_f32(&self, name: u32, value: f32) -> GlResult<()> {
        let id = self.ensure_id()?;
        self.handle.gl().sampler_parameter_f32(id, name, value);
        Ok(())
    }

    /// Set minification and magnification filters
    pub fn set_filtering(&self, filter: Filter, mipmap: Option<Filter>) -> GlResult<()> {
        self.set_min_filtering(filter, mipmap)?;
        self.set_mag_filtering(filter)
    }

    /// Set the minification filter
    pub fn set_min_filtering(&self, filter: Filter, mipmap: Option<Filter>) -> GlResult<()> {
        self.set_parameter_i32(glow::TEXTURE_MIN_FILTER, enum_param(filter.raw_min(mipmap)))
    }

    /// Set the magnification filter
    ///
    /// Magnification always samples the base level.
    pub fn set_mag_filtering(&self, filter: Filter) -> GlResult<()> {
        self.set_parameter_i32(glow::TEXTURE_MAG_FILTER, enum_param(filter.raw()))
    }

    /// Enable depth comparison with `function`, or disable it with `None`
    pub fn set_comparison(&self, function: CompareFunction) -> GlResult<()> {
        match function.raw() {
            None => self.set_parameter_i32(glow::TEXTURE_COMPARE_MODE, enum_param(glow::NONE)),
            Some(func) => {
                self.set_parameter_i32(
                    glow::TEXTURE_COMPARE_MODE,
                    enum_param(glow::COMPARE_REF_TO_TEXTURE),
                )?;
                self.set_parameter_i32(glow::TEXTURE_COMPARE_FUNC, enum_param(func))
            }
        }
    }

    /// Set wrapping on S, T and R
    pub fn set_wrap(&self, wrap: Wrap) -> GlResult<()> {
        self.set_wrap_st(wrap)?;
        self.set_parameter_i32(glow::TEXTURE_WRAP_R, enum_param(wrap.raw()))
    }

    /// Set wrapping on S and T
    pub fn set_wrap_st(&self, wrap: Wrap) -> GlResult<()> {
        self.set_wrap_s(wrap)?;
        self.set_wrap_t(wrap)
    }

    /// Set wrapping on S
    pub fn set_wrap_s(&self, wrap: Wrap) -> GlResult<()> {
        self.set_parameter_i32(glow::TEXTURE_WRAP_S, enum_param(wrap.raw()))
    }

    /// Set wrapping on T
    pub fn set_wrap_t(&self, wrap: Wrap) -> GlResult<()> {
        self.set_parameter_i32(glow::TEXTURE_WRAP_T, enum_param(wrap.raw()))
    }

    /// Lowest mipmap level of detail
    pub fn set_min_lod(&self, lod: f32) -> GlResult<()> {
        self.set_parameter_f32(glow::TEXTURE_MIN_LOD, lod)
    }

    /// Highest mipmap level of detail
    pub fn set_max_lod(&self, lod: f32) -> GlResult<()> {
        self.set_parameter_f32(glow::TEXTURE_MAX_LOD, lod)
    }

    /// Level of detail bias
    pub fn set_lod_bias(&self, bias: f32) -> GlResult<()> {
        self.set_parameter_f32(glow::TEXTURE_LOD_BIAS, bias)
    }
}

impl Object for Sampler {
    fn id(&self) -> u32 {
        self.handle.id()
    }

    /// Bind to texture unit 0
    fn bind(&self) -> GlResult<()> {
        self.bind_to(0)
    }

    fn instantiate(&self) -> GlResult<()> {
        self.ensure_id()?;
        Ok(())
    }

    fn destroy(&mut self) {
        self.handle.release();
    }
}
