//! Buffer objects
//!
//! [`Buffer`] works for every kind of OpenGL buffer object (vertex, element,
//! uniform, ...). Like a `Vec`, it tracks a `size` (elements in use) separately
//! from its `capacity` (elements allocated on the driver side).
//!
//! Typed specializations live in submodules:
//! - [`ArrayBuffer`]: vertex data with attribute layout and draw calls
//! - [`ElementBuffer`]: `u8` / `u16` / `u32` indices
//! - [`UniformBuffer`]: uniform block storage bound to programs

mod array;
mod uniform;

pub use array::{ArrayBuffer, Attrib, AttribType, ElementBuffer, IndexType, Primitive};
pub use uniform::UniformBuffer;

use std::marker::PhantomData;
use std::mem;
use std::ops::{Deref, DerefMut};

use bytemuck::Pod;

use crate::context::Gl;
use crate::error::{GlError, GlResult};
use crate::object::{Handle, Object, ObjectKind};

/// Binding point of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// GL_ARRAY_BUFFER
    Array,
    /// GL_ELEMENT_ARRAY_BUFFER
    ElementArray,
    /// GL_UNIFORM_BUFFER
    Uniform,
    /// GL_TEXTURE_BUFFER
    Texture,
    /// GL_COPY_READ_BUFFER
    CopyRead,
    /// GL_COPY_WRITE_BUFFER
    CopyWrite,
    /// GL_PIXEL_PACK_BUFFER
    PixelPack,
    /// GL_PIXEL_UNPACK_BUFFER
    PixelUnpack,
    /// GL_TRANSFORM_FEEDBACK_BUFFER
    TransformFeedback,
}

impl BufferTarget {
    /// Raw GL enum
    pub const fn raw(self) -> u32 {
        match self {
            Self::Array => glow::ARRAY_BUFFER,
            Self::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
            Self::Uniform => glow::UNIFORM_BUFFER,
            Self::Texture => glow::TEXTURE_BUFFER,
            Self::CopyRead => glow::COPY_READ_BUFFER,
            Self::CopyWrite => glow::COPY_WRITE_BUFFER,
            Self::PixelPack => glow::PIXEL_PACK_BUFFER,
            Self::PixelUnpack => glow::PIXEL_UNPACK_BUFFER,
            Self::TransformFeedback => glow::TRANSFORM_FEEDBACK_BUFFER,
        }
    }
}

/// Expected usage pattern of the buffer storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferUsage {
    /// GL_STREAM_DRAW
    #[default]
    StreamDraw,
    /// GL_STREAM_READ
    StreamRead,
    /// GL_STREAM_COPY
    StreamCopy,
    /// GL_STATIC_DRAW
    StaticDraw,
    /// GL_STATIC_READ
    StaticRead,
    /// GL_STATIC_COPY
    StaticCopy,
    /// GL_DYNAMIC_DRAW
    DynamicDraw,
    /// GL_DYNAMIC_READ
    DynamicRead,
    /// GL_DYNAMIC_COPY
    DynamicCopy,
}

impl BufferUsage {
    /// Raw GL enum
    pub const fn raw(self) -> u32 {
        match self {
            Self::StreamDraw => glow::STREAM_DRAW,
            Self::StreamRead => glow::STREAM_READ,
            Self::StreamCopy => glow::STREAM_COPY,
            Self::StaticDraw => glow::STATIC_DRAW,
            Self::StaticRead => glow::STATIC_READ,
            Self::StaticCopy => glow::STATIC_COPY,
            Self::DynamicDraw => glow::DYNAMIC_DRAW,
            Self::DynamicRead => glow::DYNAMIC_READ,
            Self::DynamicCopy => glow::DYNAMIC_COPY,
        }
    }
}

/// Access mode of a writable mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapAccess {
    /// GL_WRITE_ONLY
    WriteOnly,
    /// GL_READ_WRITE
    ReadWrite,
}

impl MapAccess {
    const fn bits(self) -> u32 {
        match self {
            Self::WriteOnly => glow::MAP_WRITE_BIT,
            Self::ReadWrite => glow::MAP_READ_BIT | glow::MAP_WRITE_BIT,
        }
    }
}

/// Object kind marker for buffers
pub struct BufferObject;

impl ObjectKind for BufferObject {
    const LABEL: &'static str = "buffer";

    fn delete(gl: &Gl, id: u32) {
        gl.delete_buffer(id);
    }
}

/// Typed buffer object
///
/// `T` is the element type stored in the buffer. Sizes and capacities are
/// counted in elements, never in bytes.
#[derive(Debug)]
pub struct Buffer<T: Pod> {
    handle: Handle<BufferObject>,
    target: BufferTarget,
    size: usize,
    capacity: usize,
    usage: BufferUsage,
    _marker: PhantomData<T>,
}

impl<T: Pod> Buffer<T> {
    /// Create a buffer for `target`
    ///
    /// The driver object is generated now only when auto instantiation is on,
    /// otherwise on first allocation.
    pub fn new(gl: &Gl, target: BufferTarget) -> GlResult<Self> {
        let buffer = Self {
            handle: Handle::new(gl),
            target,
            size: 0,
            capacity: 0,
            usage: BufferUsage::default(),
            _marker: PhantomData,
        };
        if gl.auto_instantiate() {
            buffer.instantiate()?;
        }
        Ok(buffer)
    }

    fn bytes(count: usize) -> usize {
        count.saturating_mul(mem::size_of::<T>())
    }

    fn reallocate(&mut self, usage: BufferUsage) -> GlResult<()> {
        self.bind()?;
        self.handle
            .gl()
            .buffer_data_size(self.target.raw(), Self::bytes(self.capacity), usage.raw());
        self.usage = usage;
        Ok(())
    }

    /// Set the size, growing the storage when it exceeds the capacity
    ///
    /// Works like `Vec::reserve`: the capacity never shrinks here.
    pub fn reserve(&mut self, size: usize, usage: BufferUsage) -> GlResult<()> {
        self.size = size;
        if size > self.capacity {
            self.capacity = size;
            self.reallocate(usage)?;
        }
        Ok(())
    }

    /// Add (or remove, with a negative delta) elements to the size
    ///
    /// When the new size outgrows the capacity, the storage is reallocated
    /// with a third of headroom.
    pub fn reserve_relative(&mut self, delta: isize, usage: BufferUsage) -> GlResult<()> {
        self.size = self.size.saturating_add_signed(delta);
        if self.size > self.capacity {
            self.capacity = self.size.saturating_add(self.size / 3);
            self.reallocate(usage)?;
        }
        Ok(())
    }

    /// Set size and capacity to exactly `size`, always reallocating
    pub fn force_reserve(&mut self, size: usize, usage: BufferUsage) -> GlResult<()> {
        self.size = size;
        self.capacity = size;
        self.reallocate(usage)
    }

    /// Shrink the storage to the current size
    ///
    /// The old contents are NOT copied into the new storage.
    pub fn shrink_to_fit(&mut self) -> GlResult<()> {
        if self.capacity == self.size {
            return Ok(());
        }
        self.capacity = self.size;
        self.reallocate(self.usage)
    }

    /// Replace the storage with `data`
    pub fn upload(&mut self, data: &[T], usage: BufferUsage) -> GlResult<()> {
        self.bind()?;
        self.handle
            .gl()
            .buffer_data(self.target.raw(), bytemuck::cast_slice(data), usage.raw());
        self.size = data.len();
        self.capacity = data.len();
        self.usage = usage;
        Ok(())
    }

    /// Overwrite elements starting at `offset`
    pub fn write(&mut self, offset: usize, data: &[T]) -> GlResult<()> {
        if offset.checked_add(data.len()).map_or(true, |end| end > self.capacity) {
            return Err(GlError::OutOfRange {
                offset,
                len: data.len(),
                capacity: self.capacity,
            });
        }
        self.bind()?;
        self.handle
            .gl()
            .buffer_sub_data(self.target.raw(), Self::bytes(offset), bytemuck::cast_slice(data));
        Ok(())
    }

    /// Number of elements in use
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of elements allocated
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether no element is in use
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Binding point
    pub fn target(&self) -> BufferTarget {
        self.target
    }

    /// Usage hint of the last allocation
    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Context of this buffer
    pub fn gl(&self) -> &Gl {
        self.handle.gl()
    }

    fn map_ptr(&self, access: u32) -> GlResult<*mut T> {
        if self.size == 0 {
            return Err(GlError::Map("buffer is empty".to_string()));
        }
        if !self.is_instantiated() {
            return Err(GlError::Map("buffer is not instantiated".to_string()));
        }
        self.bind()?;
        let gl = self.handle.gl();
        let ptr = gl.map_buffer_range(self.target.raw(), 0, Self::bytes(self.size), access);
        if ptr.is_null() {
            return Err(GlError::Map(format!(
                "driver returned no mapping{}",
                gl.last_error().map(|e| format!(" ({e})")).unwrap_or_default()
            )));
        }
        if ptr.align_offset(mem::align_of::<T>()) != 0 {
            gl.unmap_buffer(self.target.raw());
            return Err(GlError::Map("mapping is not aligned for the element type".to_string()));
        }
        Ok(ptr.cast())
    }

    /// Map the used range for reading
    pub fn map_read(&self) -> GlResult<Mapped<'_, T>> {
        let ptr = self.map_ptr(glow::MAP_READ_BIT)?;
        // SAFETY: the driver returned a non-null, aligned pointer to `size`
        // elements that stays valid until the guard unmaps it; `T: Pod`
        // accepts any bit pattern.
        let data = unsafe { std::slice::from_raw_parts(ptr.cast_const(), self.size) };
        Ok(Mapped { buffer: self, data })
    }

    /// Map the used range with the given access
    pub fn map(&mut self, access: MapAccess) -> GlResult<MappedMut<'_, T>> {
        let ptr = self.map_ptr(access.bits())?;
        // SAFETY: as in `map_read`; the exclusive borrow of `self` keeps any
        // other mapping of this buffer from coexisting with the slice.
        let data = unsafe { std::slice::from_raw_parts_mut(ptr, self.size) };
        Ok(MappedMut { buffer: self, data })
    }

    /// Map the used range in write only mode
    pub fn map_write(&mut self) -> GlResult<MappedMut<'_, T>> {
        self.map(MapAccess::WriteOnly)
    }

    /// Map the used range in read write mode
    pub fn map_read_write(&mut self) -> GlResult<MappedMut<'_, T>> {
        self.map(MapAccess::ReadWrite)
    }

    fn unmap(&self) {
        let gl = self.handle.gl();
        gl.bind_buffer(self.target.raw(), self.handle.id());
        gl.unmap_buffer(self.target.raw());
    }
}

impl<T: Pod> Object for Buffer<T> {
    fn id(&self) -> u32 {
        self.handle.id()
    }

    fn bind(&self) -> GlResult<()> {
        self.instantiate()?;
        self.handle.gl().bind_buffer(self.target.raw(), self.handle.id());
        Ok(())
    }

    fn instantiate(&self) -> GlResult<()> {
        self.handle.instantiate_with(|gl| gl.create_buffer())?;
        Ok(())
    }

    fn destroy(&mut self) {
        self.handle.release();
        self.size = 0;
        self.capacity = 0;
    }
}

/// Read-only view of a mapped buffer, unmapped on drop
pub struct Mapped<'a, T: Pod> {
    buffer: &'a Buffer<T>,
    data: &'a [T],
}

impl<T: Pod> Deref for Mapped<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.data
    }
}

impl<T: Pod> Drop for Mapped<'_, T> {
    fn drop(&mut self) {
        self.buffer.unmap();
    }
}

/// Writable view of a mapped buffer, unmapped on drop
pub struct MappedMut<'a, T: Pod> {
    buffer: &'a Buffer<T>,
    data: &'a mut [T],
}

impl<T: Pod> Deref for MappedMut<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.data
    }
}

impl<T: Pod> DerefMut for MappedMut<'_, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.data
    }
}

impl<T: Pod> Drop for MappedMut<'_, T> {
    fn drop(&mut self) {
        self.buffer.unmap();
    }
}
