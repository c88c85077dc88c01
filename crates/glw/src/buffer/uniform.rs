//! Uniform block storage

use std::ops::{Deref, DerefMut};

use bytemuck::Pod;

use super::{Buffer, BufferTarget, BufferUsage};
use crate::context::Gl;
use crate::error::GlResult;
use crate::object::Object;
use crate::program::Program;

/// Buffer backing one uniform block
///
/// `T` is the `#[repr(C)]` mirror of the block layout (std140).
#[derive(Debug)]
pub struct UniformBuffer<T: Pod> {
    buffer: Buffer<T>,
    block_name: String,
    binding_point: u32,
}

impl<T: Pod> UniformBuffer<T> {
    /// Create a uniform buffer for the block `name`
    pub fn new(gl: &Gl, name: impl Into<String>) -> GlResult<Self> {
        Ok(Self {
            buffer: Buffer::new(gl, BufferTarget::Uniform)?,
            block_name: name.into(),
            binding_point: 0,
        })
    }

    /// Set the uniform block name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.block_name = name.into();
    }

    /// Uniform block name
    pub fn name(&self) -> &str {
        &self.block_name
    }

    /// Binding point used by the last `bind_base`
    pub fn binding_point(&self) -> u32 {
        self.binding_point
    }

    /// Bind the buffer to an indexed uniform binding point
    pub fn bind_base(&mut self, point: u32) -> GlResult<()> {
        self.buffer.instantiate()?;
        self.binding_point = point;
        self.buffer
            .gl()
            .bind_buffer_base(BufferTarget::Uniform.raw(), point, self.buffer.id());
        Ok(())
    }

    /// Route the named block of every program to this buffer's binding point
    pub fn bind_programs(&self, programs: &[&Program]) {
        let gl = self.buffer.gl();
        for program in programs {
            match gl.uniform_block_index(program.id(), &self.block_name) {
                Some(block) => gl.uniform_block_binding(program.id(), block, self.binding_point),
                None => log::warn!(
                    "uniform block '{}' not found in program {}",
                    self.block_name,
                    program.id()
                ),
            }
        }
    }

    /// Replace the block contents
    pub fn update(&mut self, value: &T) -> GlResult<()> {
        if self.buffer.capacity() == 1 {
            self.buffer.write(0, std::slice::from_ref(value))
        } else {
            self.buffer.upload(std::slice::from_ref(value), BufferUsage::DynamicDraw)
        }
    }
}

impl<T: Pod> Deref for UniformBuffer<T> {
    type Target = Buffer<T>;

    fn deref(&self) -> &Buffer<T> {
        &self.buffer
    }
}

impl<T: Pod> DerefMut for UniformBuffer<T> {
    fn deref_mut(&mut self) -> &mut Buffer<T> {
        &mut self.buffer
    }
}
