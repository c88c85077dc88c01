//! Texture objects
//!
//! A [`Texture`] tracks its target, size and internal format next to the
//! driver name, so framebuffer attachment and uploads do not need to query
//! the driver. Each instantiated texture carries a [`Sampler`] that is bound
//! with it to a texture unit.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use crate::context::Gl;
use crate::error::{GlError, GlResult};
use crate::foundation::math::IVec2;
use crate::object::{Handle, Object, ObjectKind};
use crate::sampler::{Filter, Sampler};

/// Texture binding target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureTarget {
    /// GL_TEXTURE_1D
    Texture1D,
    /// GL_TEXTURE_2D
    #[default]
    Texture2D,
    /// GL_TEXTURE_3D
    Texture3D,
    /// GL_TEXTURE_1D_ARRAY
    Texture1DArray,
    /// GL_TEXTURE_2D_ARRAY
    Texture2DArray,
    /// GL_TEXTURE_RECTANGLE
    Rectangle,
    /// GL_TEXTURE_CUBE_MAP
    CubeMap,
    /// GL_TEXTURE_2D_MULTISAMPLE
    Texture2DMultisample,
}

impl TextureTarget {
    /// Raw GL enum
    pub const fn raw(self) -> u32 {
        match self {
            Self::Texture1D => glow::TEXTURE_1D,
            Self::Texture2D => glow::TEXTURE_2D,
            Self::Texture3D => glow::TEXTURE_3D,
            Self::Texture1DArray => glow::TEXTURE_1D_ARRAY,
            Self::Texture2DArray => glow::TEXTURE_2D_ARRAY,
            Self::Rectangle => glow::TEXTURE_RECTANGLE,
            Self::CubeMap => glow::TEXTURE_CUBE_MAP,
            Self::Texture2DMultisample => glow::TEXTURE_2D_MULTISAMPLE,
        }
    }
}

/// Sized internal storage format, shared by textures and renderbuffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InternalFormat {
    /// GL_R8
    R8,
    /// GL_RG8
    Rg8,
    /// GL_RGB8
    Rgb8,
    /// GL_RGBA8
    #[default]
    Rgba8,
    /// GL_SRGB8
    Srgb8,
    /// GL_SRGB8_ALPHA8
    Srgb8Alpha8,
    /// GL_R16F
    R16F,
    /// GL_RG16F
    Rg16F,
    /// GL_RGB16F
    Rgb16F,
    /// GL_RGBA16F
    Rgba16F,
    /// GL_R32F
    R32F,
    /// GL_RG32F
    Rg32F,
    /// GL_RGB32F
    Rgb32F,
    /// GL_RGBA32F
    Rgba32F,
    /// GL_R32UI
    R32UI,
    /// GL_DEPTH_COMPONENT16
    DepthComponent16,
    /// GL_DEPTH_COMPONENT24
    DepthComponent24,
    /// GL_DEPTH_COMPONENT32F
    DepthComponent32F,
    /// GL_DEPTH24_STENCIL8
    Depth24Stencil8,
    /// GL_DEPTH32F_STENCIL8
    Depth32FStencil8,
    /// GL_STENCIL_INDEX8
    StencilIndex8,
}

impl InternalFormat {
    /// Raw GL enum
    pub const fn raw(self) -> u32 {
        match self {
            Self::R8 => glow::R8,
            Self::Rg8 => glow::RG8,
            Self::Rgb8 => glow::RGB8,
            Self::Rgba8 => glow::RGBA8,
            Self::Srgb8 => glow::SRGB8,
            Self::Srgb8Alpha8 => glow::SRGB8_ALPHA8,
            Self::R16F => glow::R16F,
            Self::Rg16F => glow::RG16F,
            Self::Rgb16F => glow::RGB16F,
            Self::Rgba16F => glow::RGBA16F,
            Self::R32F => glow::R32F,
            Self::Rg32F => glow::RG32F,
            Self::Rgb32F => glow::RGB32F,
            Self::Rgba32F => glow::RGBA32F,
            Self::R32UI => glow::R32UI,
            Self::DepthComponent16 => glow::DEPTH_COMPONENT16,
            Self::DepthComponent24 => glow::DEPTH_COMPONENT24,
            Self::DepthComponent32F => glow::DEPTH_COMPONENT32F,
            Self::Depth24Stencil8 => glow::DEPTH24_STENCIL8,
            Self::Depth32FStencil8 => glow::DEPTH32F_STENCIL8,
            Self::StencilIndex8 => glow::STENCIL_INDEX8,
        }
    }
}

/// Layout of client pixel data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// GL_RED
    Red,
    /// GL_RG
    Rg,
    /// GL_RGB
    Rgb,
    /// GL_BGR
    Bgr,
    /// GL_RGBA
    Rgba,
    /// GL_BGRA
    Bgra,
    /// GL_RED_INTEGER
    RedInteger,
    /// GL_DEPTH_COMPONENT
    DepthComponent,
    /// GL_DEPTH_STENCIL
    DepthStencil,
}

impl PixelFormat {
    /// Raw GL enum
    pub const fn raw(self) -> u32 {
        match self {
            Self::Red => glow::RED,
            Self::Rg => glow::RG,
            Self::Rgb => glow::RGB,
            Self::Bgr => glow::BGR,
            Self::Rgba => glow::RGBA,
            Self::Bgra => glow::BGRA,
            Self::RedInteger => glow::RED_INTEGER,
            Self::DepthComponent => glow::DEPTH_COMPONENT,
            Self::DepthStencil => glow::DEPTH_STENCIL,
        }
    }

    /// Components per pixel
    pub const fn components(self) -> usize {
        match self {
            Self::Red | Self::RedInteger | Self::DepthComponent => 1,
            Self::Rg | Self::DepthStencil => 2,
            Self::Rgb | Self::Bgr => 3,
            Self::Rgba | Self::Bgra => 4,
        }
    }
}

/// Component type of client pixel data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelType {
    /// GL_UNSIGNED_BYTE
    UnsignedByte,
    /// GL_BYTE
    Byte,
    /// GL_UNSIGNED_SHORT
    UnsignedShort,
    /// GL_SHORT
    Short,
    /// GL_UNSIGNED_INT
    UnsignedInt,
    /// GL_INT
    Int,
    /// GL_HALF_FLOAT
    HalfFloat,
    /// GL_FLOAT
    Float,
    /// GL_UNSIGNED_INT_24_8, one packed value per pixel
    UnsignedInt248,
}

impl PixelType {
    /// Raw GL enum
    pub const fn raw(self) -> u32 {
        match self {
            Self::UnsignedByte => glow::UNSIGNED_BYTE,
            Self::Byte => glow::BYTE,
            Self::UnsignedShort => glow::UNSIGNED_SHORT,
            Self::Short => glow::SHORT,
            Self::UnsignedInt => glow::UNSIGNED_INT,
            Self::Int => glow::INT,
            Self::HalfFloat => glow::HALF_FLOAT,
            Self::Float => glow::FLOAT,
            Self::UnsignedInt248 => glow::UNSIGNED_INT_24_8,
        }
    }

    /// Bytes of one pixel stored in `format`
    pub const fn pixel_bytes(self, format: PixelFormat) -> usize {
        match self {
            Self::UnsignedInt248 => 4,
            Self::UnsignedByte | Self::Byte => format.components(),
            Self::UnsignedShort | Self::Short | Self::HalfFloat => 2 * format.components(),
            Self::UnsignedInt | Self::Int | Self::Float => 4 * format.components(),
        }
    }
}

// Default GL_UNPACK_ALIGNMENT
const UNPACK_ALIGNMENT: usize = 4;

/// Bytes the driver reads for a `width` x `height` upload
pub fn upload_size(width: usize, height: usize, format: PixelFormat, ty: PixelType) -> usize {
    if width == 0 || height == 0 {
        return 0;
    }
    let row = width * ty.pixel_bytes(format);
    let stride = row.div_ceil(UNPACK_ALIGNMENT) * UNPACK_ALIGNMENT;
    stride * (height - 1) + row
}

/// Object kind marker for textures
pub struct TextureObject;

impl ObjectKind for TextureObject {
    const LABEL: &'static str = "texture";

    fn delete(gl: &Gl, id: u32) {
        gl.delete_texture(id);
    }
}

/// Texture object with its sampler
#[derive(Debug)]
pub struct Texture {
    handle: Handle<TextureObject>,
    target: TextureTarget,
    size: IVec2,
    format: InternalFormat,
    sampler: RefCell<Option<Rc<Sampler>>>,
}

impl Texture {
    /// Empty 2D texture
    pub fn new(gl: &Gl) -> GlResult<Self> {
        Self::with_size(gl, TextureTarget::Texture2D, 0, 0)
    }

    /// Empty texture of the given target and size, storage is not allocated
    pub fn with_size(gl: &Gl, target: TextureTarget, width: i32, height: i32) -> GlResult<Self> {
        let texture = Self {
            handle: Handle::new(gl),
            target,
            size: IVec2::new(width, height),
            format: InternalFormat::default(),
            sampler: RefCell::new(None),
        };
        if gl.auto_instantiate() {
            texture.instantiate()?;
        }
        Ok(texture)
    }

    /// Wrap an existing texture name, taking ownership
    ///
    /// Size and format are taken as given; the driver is not queried.
    pub fn from_raw(gl: &Gl, target: TextureTarget, id: u32, size: IVec2, format: InternalFormat) -> Self {
        Self {
            handle: Handle::adopt(gl, id),
            target,
            size,
            format,
            sampler: RefCell::new(None),
        }
    }

    /// Load an image file into an RGBA8 texture
    ///
    /// Rows are flipped so the first row in memory is the bottom of the image,
    /// as GL expects.
    pub fn from_image(gl: &Gl, path: impl AsRef<Path>) -> GlResult<Self> {
        let path = path.as_ref();
        let image = image::open(path)?.flipv().into_rgba8();
        let (width, height) = image.dimensions();
        let size = IVec2::new(
            i32::try_from(width).unwrap_or(i32::MAX),
            i32::try_from(height).unwrap_or(i32::MAX),
        );

        let mut texture = Self::new(gl)?;
        texture.set_format(InternalFormat::Rgba8);
        texture.load(PixelFormat::Rgba, PixelType::UnsignedByte, image.as_raw(), Some(size))?;
        log::debug!("loaded texture {} from {} ({width}x{height})", texture.id(), path.display());
        Ok(texture)
    }

    /// Bind to a texture unit, together with the sampler
    pub fn bind_to(&self, unit: u32) -> GlResult<()> {
        self.instantiate()?;
        let gl = self.handle.gl();
        gl.active_texture(unit);
        if let Some(sampler) = self.sampler.borrow().as_ref() {
            sampler.bind_to(unit)?;
        }
        gl.bind_texture(self.target.raw(), self.handle.id());
        Ok(())
    }

    /// Unbind this texture's target on the active unit
    pub fn unbind(&self) {
        self.handle.gl().bind_texture(self.target.raw(), 0);
    }

    /// Unbind this texture's target and any sampler from a texture unit
    pub fn unbind_from(&self, unit: u32) {
        let gl = self.handle.gl();
        gl.active_texture(unit);
        Sampler::unbind_from(gl, unit);
        gl.bind_texture(self.target.raw(), 0);
    }

    /// Set the size used by the next upload
    pub fn set_size(&mut self, size: IVec2) {
        self.size = size;
    }

    /// Texture size in pixels
    pub fn size(&self) -> IVec2 {
        self.size
    }

    /// Set the internal format used by the next upload
    pub fn set_format(&mut self, format: InternalFormat) {
        self.format = format;
    }

    /// Internal format
    pub fn format(&self) -> InternalFormat {
        self.format
    }

    /// Change the binding target
    pub fn set_target(&mut self, target: TextureTarget) {
        self.target = target;
    }

    /// Binding target
    pub fn target(&self) -> TextureTarget {
        self.target
    }

    /// Replace the sampler bound together with this texture
    pub fn set_sampler(&mut self, sampler: Rc<Sampler>) {
        *self.sampler.get_mut() = Some(sampler);
    }

    /// Sampler bound together with this texture
    pub fn sampler(&self) -> Option<Rc<Sampler>> {
        self.sampler.borrow().clone()
    }

    fn image(&mut self, format: PixelFormat, ty: PixelType, pixels: Option<&[u8]>) -> GlResult<()> {
        self.bind()?;
        self.handle.gl().tex_image_2d(
            self.target.raw(),
            0,
            self.format.raw(),
            self.size.x,
            self.size.y,
            format.raw(),
            ty.raw(),
            pixels,
        );
        Ok(())
    }

    /// Allocate storage of the current size without initializing it
    pub fn init_null(&mut self, format: PixelFormat, ty: PixelType) -> GlResult<()> {
        self.image(format, ty, None)
    }

    /// Upload pixel data, optionally resizing first
    ///
    /// Rows are expected with the default 4 byte alignment.
    pub fn load(&mut self, format: PixelFormat, ty: PixelType, data: &[u8], size: Option<IVec2>) -> GlResult<()> {
        if let Some(size) = size {
            self.size = size;
        }
        let width = usize::try_from(self.size.x).unwrap_or(0);
        let height = usize::try_from(self.size.y).unwrap_or(0);
        let expected = upload_size(width, height, format, ty);
        if data.len() < expected {
            return Err(GlError::TextureData {
                expected,
                actual: data.len(),
            });
        }
        self.image(format, ty, Some(data))
    }

    /// Generate the mipmap chain from level 0
    pub fn generate_mipmap(&self) -> GlResult<()> {
        self.bind()?;
        self.handle.gl().generate_mipmap(self.target.raw());
        Ok(())
    }
}

impl Object for Texture {
    fn id(&self) -> u32 {
        self.handle.id()
    }

    /// Bind on the active texture unit, with the sampler on unit 0
    fn bind(&self) -> GlResult<()> {
        self.instantiate()?;
        if let Some(sampler) = self.sampler.borrow().as_ref() {
            sampler.bind()?;
        }
        self.handle.gl().bind_texture(self.target.raw(), self.handle.id());
        Ok(())
    }

    /// Generate the texture with nearest filtering and a matching sampler
    ///
    /// The target is left unbound afterwards.
    fn instantiate(&self) -> GlResult<()> {
        if self.is_instantiated() {
            return Ok(());
        }
        let id = self.handle.instantiate_with(|gl| gl.create_texture())?;
        let gl = self.handle.gl();
        let target = self.target.raw();
        let nearest = glow::NEAREST as i32;
        gl.bind_texture(target, id);
        gl.tex_parameter_i32(target, glow::TEXTURE_MIN_FILTER, nearest);
        gl.tex_parameter_i32(target, glow::TEXTURE_MAG_FILTER, nearest);
        gl.bind_texture(target, 0);

        if self.sampler.borrow().is_none() {
            let sampler = Sampler::create(gl)?;
            sampler.set_filtering(Filter::Nearest, None)?;
            *self.sampler.borrow_mut() = Some(Rc::new(sampler));
        }
        Ok(())
    }

    fn destroy(&mut self) {
        self.handle.release();
    }
}
