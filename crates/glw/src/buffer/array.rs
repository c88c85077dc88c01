//! Vertex and element buffers

use std::mem;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use bytemuck::Pod;

use super::{Buffer, BufferTarget};
use crate::context::Gl;
use crate::error::{GlError, GlResult};
use crate::object::Object;
use crate::vertex_array::VertexArray;

fn gl_int(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Primitive assembly mode for draw calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// GL_POINTS
    Points,
    /// GL_LINES
    Lines,
    /// GL_LINE_STRIP
    LineStrip,
    /// GL_LINE_LOOP
    LineLoop,
    /// GL_TRIANGLES
    Triangles,
    /// GL_TRIANGLE_STRIP
    TriangleStrip,
    /// GL_TRIANGLE_FAN
    TriangleFan,
}

impl Primitive {
    /// Raw GL enum
    pub const fn raw(self) -> u32 {
        match self {
            Self::Points => glow::POINTS,
            Self::Lines => glow::LINES,
            Self::LineStrip => glow::LINE_STRIP,
            Self::LineLoop => glow::LINE_LOOP,
            Self::Triangles => glow::TRIANGLES,
            Self::TriangleStrip => glow::TRIANGLE_STRIP,
            Self::TriangleFan => glow::TRIANGLE_FAN,
        }
    }
}

/// Component type of a vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AttribType {
    /// GL_BYTE
    Byte,
    /// GL_UNSIGNED_BYTE
    UnsignedByte,
    /// GL_SHORT
    Short,
    /// GL_UNSIGNED_SHORT
    UnsignedShort,
    /// GL_INT
    Int,
    /// GL_UNSIGNED_INT
    UnsignedInt,
    /// GL_HALF_FLOAT
    HalfFloat,
    /// GL_FLOAT
    #[default]
    Float,
    /// GL_DOUBLE
    Double,
}

impl AttribType {
    /// Raw GL enum
    pub const fn raw(self) -> u32 {
        match self {
            Self::Byte => glow::BYTE,
            Self::UnsignedByte => glow::UNSIGNED_BYTE,
            Self::Short => glow::SHORT,
            Self::UnsignedShort => glow::UNSIGNED_SHORT,
            Self::Int => glow::INT,
            Self::UnsignedInt => glow::UNSIGNED_INT,
            Self::HalfFloat => glow::HALF_FLOAT,
            Self::Float => glow::FLOAT,
            Self::Double => glow::DOUBLE,
        }
    }
}

/// Layout of one vertex attribute inside the vertex struct
///
/// The stride is always the size of the buffer's element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attrib {
    /// Attribute location
    pub index: u32,
    /// Byte offset inside the vertex, usually `mem::offset_of!`
    pub offset: usize,
    /// Number of components (1 to 4)
    pub size: i32,
    /// Component type
    pub kind: AttribType,
    /// Whether integer data is normalized to [0, 1] / [-1, 1]
    pub normalized: bool,
}

impl Attrib {
    /// Three float components at `offset`
    pub const fn new(index: u32, offset: usize) -> Self {
        Self {
            index,
            offset,
            size: 3,
            kind: AttribType::Float,
            normalized: false,
        }
    }

    /// Set the number of components
    #[must_use]
    pub const fn components(mut self, size: i32) -> Self {
        self.size = size;
        self
    }

    /// Set the component type
    #[must_use]
    pub const fn kind(mut self, kind: AttribType) -> Self {
        self.kind = kind;
        self
    }

    /// Set normalization
    #[must_use]
    pub const fn normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }
}

/// Integer types usable as element indices
pub trait IndexType: Pod + sealed::Sealed {
    /// GL type of the index
    const GL_TYPE: u32;
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
}

impl IndexType for u8 {
    const GL_TYPE: u32 = glow::UNSIGNED_BYTE;
}

impl IndexType for u16 {
    const GL_TYPE: u32 = glow::UNSIGNED_SHORT;
}

impl IndexType for u32 {
    const GL_TYPE: u32 = glow::UNSIGNED_INT;
}

/// Element (index) buffer
#[derive(Debug)]
pub struct ElementBuffer<I: IndexType> {
    buffer: Buffer<I>,
}

impl<I: IndexType> ElementBuffer<I> {
    /// Create an element buffer
    pub fn new(gl: &Gl) -> GlResult<Self> {
        Ok(Self {
            buffer: Buffer::new(gl, BufferTarget::ElementArray)?,
        })
    }
}

impl<I: IndexType> Deref for ElementBuffer<I> {
    type Target = Buffer<I>;

    fn deref(&self) -> &Buffer<I> {
        &self.buffer
    }
}

impl<I: IndexType> DerefMut for ElementBuffer<I> {
    fn deref_mut(&mut self) -> &mut Buffer<I> {
        &mut self.buffer
    }
}

/// Vertex buffer with attribute layout and draw calls
#[derive(Debug)]
pub struct ArrayBuffer<T: Pod> {
    buffer: Buffer<T>,
    vao: Option<Rc<VertexArray>>,
}

impl<T: Pod> ArrayBuffer<T> {
    /// Create a vertex buffer
    pub fn new(gl: &Gl) -> GlResult<Self> {
        Ok(Self {
            buffer: Buffer::new(gl, BufferTarget::Array)?,
            vao: None,
        })
    }

    /// Attach the vertex array that records this buffer's layout
    pub fn attach_vertex_array(&mut self, vao: Rc<VertexArray>) {
        self.vao = Some(vao);
    }

    /// Name of the attached vertex array, 0 when none
    pub fn vertex_array(&self) -> u32 {
        self.vao.as_ref().map_or(0, |vao| vao.id())
    }

    fn bind_vao(&self) -> GlResult<()> {
        match &self.vao {
            Some(vao) => vao.bind(),
            None => Ok(()),
        }
    }

    /// Describe and enable vertex attributes
    pub fn set_attribs(&mut self, attribs: &[Attrib]) -> GlResult<()> {
        self.bind_vao()?;
        self.buffer.bind()?;
        let gl = self.buffer.gl();
        let stride = gl_int(mem::size_of::<T>());
        for attrib in attribs {
            gl.vertex_attrib_pointer(
                attrib.index,
                attrib.size,
                attrib.kind.raw(),
                attrib.normalized,
                stride,
                gl_int(attrib.offset),
            );
            match &self.vao {
                Some(vao) => vao.enable(attrib.index)?,
                None => gl.enable_vertex_attrib_array(attrib.index),
            }
        }
        Ok(())
    }

    /// Draw every vertex in use
    pub fn draw(&self, mode: Primitive) -> GlResult<()> {
        self.draw_range(mode, 0, self.buffer.size())
    }

    /// Draw `count` vertices starting at `first`
    pub fn draw_range(&self, mode: Primitive, first: usize, count: usize) -> GlResult<()> {
        self.bind_vao()?;
        self.buffer.bind()?;
        self.buffer.gl().draw_arrays(mode.raw(), gl_int(first), gl_int(count));
        Ok(())
    }

    /// Draw every index of `elements`
    pub fn draw_elements<I: IndexType>(&self, elements: &ElementBuffer<I>, mode: Primitive) -> GlResult<()> {
        self.draw_elements_range(elements, mode, 0, elements.size())
    }

    /// Draw `count` indices of `elements` starting at index `first`
    pub fn draw_elements_range<I: IndexType>(
        &self,
        elements: &ElementBuffer<I>,
        mode: Primitive,
        first: usize,
        count: usize,
    ) -> GlResult<()> {
        let offset = first.checked_mul(mem::size_of::<I>()).ok_or(GlError::OutOfRange {
            offset: first,
            len: count,
            capacity: elements.capacity(),
        })?;
        self.bind_vao()?;
        self.buffer.bind()?;
        elements.bind()?;
        self.buffer
            .gl()
            .draw_elements(mode.raw(), gl_int(count), I::GL_TYPE, gl_int(offset));
        Ok(())
    }
}

impl<T: Pod> Deref for ArrayBuffer<T> {
    type Target = Buffer<T>;

    fn deref(&self) -> &Buffer<T> {
        &self.buffer
    }
}

impl<T: Pod> DerefMut for ArrayBuffer<T> {
    fn deref_mut(&mut self) -> &mut Buffer<T> {
        &mut self.buffer
    }
}
