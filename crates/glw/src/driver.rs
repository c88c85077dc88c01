//! Graphics driver seam
//!
//! Every OpenGL entry point the wrapper needs goes through the [`Driver`] trait.
//! Object names are plain `u32` values (0 means "no object") and enums are the
//! raw GL constants, so the trait stays a one-to-one mirror of the C API.
//!
//! [`glow::Context`] is the production implementation. All `unsafe` calls into
//! the driver live in that impl.

use std::num::NonZeroU32;

use glow::HasContext;

/// Uniform payload handed to [`Driver::uniform`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformData<'a> {
    /// `glUniform{1,2,3,4}fv`
    Float {
        /// Vector width (1 to 4)
        components: u8,
        /// Values
        values: &'a [f32],
    },
    /// `glUniform{1,2,3,4}iv`
    Int {
        /// Vector width (1 to 4)
        components: u8,
        /// Values
        values: &'a [i32],
    },
    /// `glUniform{1,2,3,4}uiv`
    Uint {
        /// Vector width (1 to 4)
        components: u8,
        /// Values
        values: &'a [u32],
    },
    /// `glUniformMatrix{2,3,4}fv`, column major
    Matrix {
        /// Matrix dimension (2 to 4)
        dim: u8,
        /// Column-major values
        values: &'a [f32],
    },
}

/// OpenGL entry points used by the wrapper
///
/// Methods follow the C API closely. Creation calls return the new object name
/// or the driver's error message.
pub trait Driver {
    // Buffers
    /// `glGenBuffers`
    fn create_buffer(&self) -> Result<u32, String>;
    /// `glDeleteBuffers`
    fn delete_buffer(&self, id: u32);
    /// `glBindBuffer`
    fn bind_buffer(&self, target: u32, id: u32);
    /// `glBindBufferBase`
    fn bind_buffer_base(&self, target: u32, index: u32, id: u32);
    /// `glBufferData` without initial contents
    fn buffer_data_size(&self, target: u32, size: usize, usage: u32);
    /// `glBufferData`
    fn buffer_data(&self, target: u32, data: &[u8], usage: u32);
    /// `glBufferSubData`
    fn buffer_sub_data(&self, target: u32, offset: usize, data: &[u8]);
    /// `glMapBufferRange`, null on failure
    fn map_buffer_range(&self, target: u32, offset: usize, length: usize, access: u32) -> *mut u8;
    /// `glUnmapBuffer`
    fn unmap_buffer(&self, target: u32);

    // Vertex arrays
    /// `glGenVertexArrays`
    fn create_vertex_array(&self) -> Result<u32, String>;
    /// `glDeleteVertexArrays`
    fn delete_vertex_array(&self, id: u32);
    /// `glBindVertexArray`
    fn bind_vertex_array(&self, id: u32);
    /// `glEnableVertexAttribArray`
    fn enable_vertex_attrib_array(&self, index: u32);
    /// `glDisableVertexAttribArray`
    fn disable_vertex_attrib_array(&self, index: u32);
    /// `glVertexAttribPointer`
    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );
    /// `glDrawArrays`
    fn draw_arrays(&self, mode: u32, first: i32, count: i32);
    /// `glDrawElements` with a byte offset into the bound element buffer
    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32);

    // Shaders and programs
    /// `glCreateShader`
    fn create_shader(&self, kind: u32) -> Result<u32, String>;
    /// `glDeleteShader`
    fn delete_shader(&self, id: u32);
    /// `glShaderSource`
    fn shader_source(&self, id: u32, source: &str);
    /// `glCompileShader`
    fn compile_shader(&self, id: u32);
    /// `GL_COMPILE_STATUS`
    fn shader_compile_status(&self, id: u32) -> bool;
    /// `glGetShaderInfoLog`
    fn shader_info_log(&self, id: u32) -> String;
    /// `glCreateProgram`
    fn create_program(&self) -> Result<u32, String>;
    /// `glDeleteProgram`
    fn delete_program(&self, id: u32);
    /// `glAttachShader`
    fn attach_shader(&self, program: u32, shader: u32);
    /// `glLinkProgram`
    fn link_program(&self, id: u32);
    /// `GL_LINK_STATUS`
    fn program_link_status(&self, id: u32) -> bool;
    /// `glGetProgramInfoLog`
    fn program_info_log(&self, id: u32) -> String;
    /// `glUseProgram`
    fn use_program(&self, id: u32);
    /// `glGetUniformLocation`, `None` for -1
    fn uniform_location(&self, program: u32, name: &str) -> Option<u32>;
    /// `glGetAttribLocation`, `None` for -1
    fn attrib_location(&self, program: u32, name: &str) -> Option<u32>;
    /// `glBindAttribLocation`
    fn bind_attrib_location(&self, program: u32, index: u32, name: &str);
    /// `glGetUniformBlockIndex`, `None` for `GL_INVALID_INDEX`
    fn uniform_block_index(&self, program: u32, name: &str) -> Option<u32>;
    /// `glUniformBlockBinding`
    fn uniform_block_binding(&self, program: u32, block: u32, binding: u32);
    /// `glUniform*` on the program in use
    fn uniform(&self, location: u32, data: UniformData<'_>);

    // Textures and samplers
    /// `glGenTextures`
    fn create_texture(&self) -> Result<u32, String>;
    /// `glDeleteTextures`
    fn delete_texture(&self, id: u32);
    /// `glBindTexture`
    fn bind_texture(&self, target: u32, id: u32);
    /// `glActiveTexture` with a zero-based unit
    fn active_texture(&self, unit: u32);
    /// `glTexParameteri`
    fn tex_parameter_i32(&self, target: u32, name: u32, value: i32);
    /// `glTexImage2D`
    fn tex_image_2d(
        &self,
        target: u32,
        level: i32,
        internal_format: u32,
        width: i32,
        height: i32,
        format: u32,
        pixel_type: u32,
        pixels: Option<&[u8]>,
    );
    /// `glGenerateMipmap`
    fn generate_mipmap(&self, target: u32);
    /// `glGenSamplers`
    fn create_sampler(&self) -> Result<u32, String>;
    /// `glDeleteSamplers`
    fn delete_sampler(&self, id: u32);
    /// `glBindSampler`
    fn bind_sampler(&self, unit: u32, id: u32);
    /// `glSamplerParameteri`
    fn sampler_parameter_i32(&self, id: u32, name: u32, value: i32);
    /// `glSamplerParameterf`
    fn sampler_parameter_f32(&self, id: u32, name: u32, value: f32);

    // Framebuffers and renderbuffers
    /// `glGenFramebuffers`
    fn create_framebuffer(&self) -> Result<u32, String>;
    /// `glDeleteFramebuffers`
    fn delete_framebuffer(&self, id: u32);
    /// `glBindFramebuffer`
    fn bind_framebuffer(&self, target: u32, id: u32);
    /// `glFramebufferTexture` for 1D textures, `glFramebufferTexture2D` otherwise
    fn framebuffer_texture(&self, target: u32, attachment: u32, texture_target: u32, texture: u32, level: i32);
    /// `glFramebufferRenderbuffer`
    fn framebuffer_renderbuffer(&self, target: u32, attachment: u32, renderbuffer: u32);
    /// `glCheckFramebufferStatus`
    fn check_framebuffer_status(&self, target: u32) -> u32;
    /// `glBlitFramebuffer`
    fn blit_framebuffer(&self, src: [i32; 4], dst: [i32; 4], mask: u32, filter: u32);
    /// `glDrawBuffer`
    fn draw_buffer(&self, buffer: u32);
    /// `glGenRenderbuffers`
    fn create_renderbuffer(&self) -> Result<u32, String>;
    /// `glDeleteRenderbuffers`
    fn delete_renderbuffer(&self, id: u32);
    /// `glBindRenderbuffer`
    fn bind_renderbuffer(&self, id: u32);
    /// `glRenderbufferStorage`
    fn renderbuffer_storage(&self, internal_format: u32, width: i32, height: i32);
    /// `glRenderbufferStorageMultisample`
    fn renderbuffer_storage_multisample(&self, samples: i32, internal_format: u32, width: i32, height: i32);

    // Global state
    /// `glClear`
    fn clear_mask(&self, mask: u32);
    /// `glClearColor`
    fn set_clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    /// `glClearDepthf`
    fn set_clear_depth(&self, depth: f32);
    /// `glClearStencil`
    fn set_clear_stencil(&self, value: i32);
    /// `glEnable`
    fn enable_capability(&self, capability: u32);
    /// `glDisable`
    fn disable_capability(&self, capability: u32);
    /// `glEnablei`
    fn enable_capability_indexed(&self, capability: u32, index: u32);
    /// `glDisablei`
    fn disable_capability_indexed(&self, capability: u32, index: u32);
    /// `glIsEnabled`
    fn is_capability_enabled(&self, capability: u32) -> bool;
    /// `glViewport`
    fn set_viewport(&self, x: i32, y: i32, width: i32, height: i32);
    /// `glGetError`
    fn get_error(&self) -> u32;
}

fn name(id: u32) -> Option<NonZeroU32> {
    NonZeroU32::new(id)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
impl Driver for glow::Context {
    fn create_buffer(&self) -> Result<u32, String> {
        unsafe { HasContext::create_buffer(self).map(|b| b.0.get()) }
    }

    fn delete_buffer(&self, id: u32) {
        if let Some(n) = name(id) {
            unsafe { HasContext::delete_buffer(self, glow::NativeBuffer(n)) }
        }
    }

    fn bind_buffer(&self, target: u32, id: u32) {
        unsafe { HasContext::bind_buffer(self, target, name(id).map(glow::NativeBuffer)) }
    }

    fn bind_buffer_base(&self, target: u32, index: u32, id: u32) {
        unsafe { HasContext::bind_buffer_base(self, target, index, name(id).map(glow::NativeBuffer)) }
    }

    fn buffer_data_size(&self, target: u32, size: usize, usage: u32) {
        unsafe { HasContext::buffer_data_size(self, target, size as i32, usage) }
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        unsafe { HasContext::buffer_data_u8_slice(self, target, data, usage) }
    }

    fn buffer_sub_data(&self, target: u32, offset: usize, data: &[u8]) {
        unsafe { HasContext::buffer_sub_data_u8_slice(self, target, offset as i32, data) }
    }

    fn map_buffer_range(&self, target: u32, offset: usize, length: usize, access: u32) -> *mut u8 {
        unsafe { HasContext::map_buffer_range(self, target, offset as i32, length as i32, access) }
    }

    fn unmap_buffer(&self, target: u32) {
        unsafe { HasContext::unmap_buffer(self, target) }
    }

    fn create_vertex_array(&self) -> Result<u32, String> {
        unsafe { HasContext::create_vertex_array(self).map(|v| v.0.get()) }
    }

    fn delete_vertex_array(&self, id: u32) {
        if let Some(n) = name(id) {
            unsafe { HasContext::delete_vertex_array(self, glow::NativeVertexArray(n)) }
        }
    }

    fn bind_vertex_array(&self, id: u32) {
        unsafe { HasContext::bind_vertex_array(self, name(id).map(glow::NativeVertexArray)) }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { HasContext::enable_vertex_attrib_array(self, index) }
    }

    fn disable_vertex_attrib_array(&self, index: u32) {
        unsafe { HasContext::disable_vertex_attrib_array(self, index) }
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        unsafe {
            HasContext::vertex_attrib_pointer_f32(self, index, size, data_type, normalized, stride, offset);
        }
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        unsafe { HasContext::draw_arrays(self, mode, first, count) }
    }

    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32) {
        unsafe { HasContext::draw_elements(self, mode, count, element_type, offset) }
    }

    fn create_shader(&self, kind: u32) -> Result<u32, String> {
        unsafe { HasContext::create_shader(self, kind).map(|s| s.0.get()) }
    }

    fn delete_shader(&self, id: u32) {
        if let Some(n) = name(id) {
            unsafe { HasContext::delete_shader(self, glow::NativeShader(n)) }
        }
    }

    fn shader_source(&self, id: u32, source: &str) {
        if let Some(n) = name(id) {
            unsafe { HasContext::shader_source(self, glow::NativeShader(n), source) }
        }
    }

    fn compile_shader(&self, id: u32) {
        if let Some(n) = name(id) {
            unsafe { HasContext::compile_shader(self, glow::NativeShader(n)) }
        }
    }

    fn shader_compile_status(&self, id: u32) -> bool {
        name(id).is_some_and(|n| unsafe { HasContext::get_shader_compile_status(self, glow::NativeShader(n)) })
    }

    fn shader_info_log(&self, id: u32) -> String {
        name(id)
            .map(|n| unsafe { HasContext::get_shader_info_log(self, glow::NativeShader(n)) })
            .unwrap_or_default()
    }

    fn create_program(&self) -> Result<u32, String> {
        unsafe { HasContext::create_program(self).map(|p| p.0.get()) }
    }

    fn delete_program(&self, id: u32) {
        if let Some(n) = name(id) {
            unsafe { HasContext::delete_program(self, glow::NativeProgram(n)) }
        }
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        if let (Some(p), Some(s)) = (name(program), name(shader)) {
            unsafe { HasContext::attach_shader(self, glow::NativeProgram(p), glow::NativeShader(s)) }
        }
    }

    fn link_program(&self, id: u32) {
        if let Some(n) = name(id) {
            unsafe { HasContext::link_program(self, glow::NativeProgram(n)) }
        }
    }

    fn program_link_status(&self, id: u32) -> bool {
        name(id).is_some_and(|n| unsafe { HasContext::get_program_link_status(self, glow::NativeProgram(n)) })
    }

    fn program_info_log(&self, id: u32) -> String {
        name(id)
            .map(|n| unsafe { HasContext::get_program_info_log(self, glow::NativeProgram(n)) })
            .unwrap_or_default()
    }

    fn use_program(&self, id: u32) {
        unsafe { HasContext::use_program(self, name(id).map(glow::NativeProgram)) }
    }

    fn uniform_location(&self, program: u32, uniform: &str) -> Option<u32> {
        let n = name(program)?;
        unsafe { HasContext::get_uniform_location(self, glow::NativeProgram(n), uniform).map(|l| l.0) }
    }

    fn attrib_location(&self, program: u32, attrib: &str) -> Option<u32> {
        let n = name(program)?;
        unsafe { HasContext::get_attrib_location(self, glow::NativeProgram(n), attrib) }
    }

    fn bind_attrib_location(&self, program: u32, index: u32, attrib: &str) {
        if let Some(n) = name(program) {
            unsafe { HasContext::bind_attrib_location(self, glow::NativeProgram(n), index, attrib) }
        }
    }

    fn uniform_block_index(&self, program: u32, block: &str) -> Option<u32> {
        let n = name(program)?;
        unsafe { HasContext::get_uniform_block_index(self, glow::NativeProgram(n), block) }
    }

    fn uniform_block_binding(&self, program: u32, block: u32, binding: u32) {
        if let Some(n) = name(program) {
            unsafe { HasContext::uniform_block_binding(self, glow::NativeProgram(n), block, binding) }
        }
    }

    fn uniform(&self, location: u32, data: UniformData<'_>) {
        let loc = glow::NativeUniformLocation(location);
        let loc = Some(&loc);
        unsafe {
            match data {
                UniformData::Float { components: 1, values } => self.uniform_1_f32_slice(loc, values),
                UniformData::Float { components: 2, values } => self.uniform_2_f32_slice(loc, values),
                UniformData::Float { components: 3, values } => self.uniform_3_f32_slice(loc, values),
                UniformData::Float { values, .. } => self.uniform_4_f32_slice(loc, values),
                UniformData::Int { components: 1, values } => self.uniform_1_i32_slice(loc, values),
                UniformData::Int { components: 2, values } => self.uniform_2_i32_slice(loc, values),
                UniformData::Int { components: 3, values } => self.uniform_3_i32_slice(loc, values),
                UniformData::Int { values, .. } => self.uniform_4_i32_slice(loc, values),
                UniformData::Uint { components: 1, values } => self.uniform_1_u32_slice(loc, values),
                UniformData::Uint { components: 2, values } => self.uniform_2_u32_slice(loc, values),
                UniformData::Uint { components: 3, values } => self.uniform_3_u32_slice(loc, values),
                UniformData::Uint { values, .. } => self.uniform_4_u32_slice(loc, values),
                UniformData::Matrix { dim: 2, values } => self.uniform_matrix_2_f32_slice(loc, false, values),
                UniformData::Matrix { dim: 3, values } => self.uniform_matrix_3_f32_slice(loc, false, values),
                UniformData::Matrix { values, .. } => self.uniform_matrix_4_f32_slice(loc, false, values),
            }
        }
    }

    fn create_texture(&self) -> Result<u32, String> {
        unsafe { HasContext::create_texture(self).map(|t| t.0.get()) }
    }

    fn delete_texture(&self, id: u32) {
        if let Some(n) = name(id) {
            unsafe { HasContext::delete_texture(self, glow::NativeTexture(n)) }
        }
    }

    fn bind_texture(&self, target: u32, id: u32) {
        unsafe { HasContext::bind_texture(self, target, name(id).map(glow::NativeTexture)) }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { HasContext::active_texture(self, glow::TEXTURE0 + unit) }
    }

    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32) {
        unsafe { HasContext::tex_parameter_i32(self, target, parameter, value) }
    }

    fn tex_image_2d(
        &self,
        target: u32,
        level: i32,
        internal_format: u32,
        width: i32,
        height: i32,
        format: u32,
        pixel_type: u32,
        pixels: Option<&[u8]>,
    ) {
        unsafe {
            HasContext::tex_image_2d(
                self,
                target,
                level,
                internal_format as i32,
                width,
                height,
                0,
                format,
                pixel_type,
                pixels,
            );
        }
    }

    fn generate_mipmap(&self, target: u32) {
        unsafe { HasContext::generate_mipmap(self, target) }
    }

    fn create_sampler(&self) -> Result<u32, String> {
        unsafe { HasContext::create_sampler(self).map(|s| s.0.get()) }
    }

    fn delete_sampler(&self, id: u32) {
        if let Some(n) = name(id) {
            unsafe { HasContext::delete_sampler(self, glow::NativeSampler(n)) }
        }
    }

    fn bind_sampler(&self, unit: u32, id: u32) {
        unsafe { HasContext::bind_sampler(self, unit, name(id).map(glow::NativeSampler)) }
    }

    fn sampler_parameter_i32(&self, id: u32, parameter: u32, value: i32) {
        if let Some(n) = name(id) {
            unsafe { HasContext::sampler_parameter_i32(self, glow::NativeSampler(n), parameter, value) }
        }
    }

    fn sampler_parameter_f32(&self, id: u32, parameter: u32, value: f32) {
        if let Some(n) = name(id) {
            unsafe { HasContext::sampler_parameter_f32(self, glow::NativeSampler(n), parameter, value) }
        }
    }

    fn create_framebuffer(&self) -> Result<u32, String> {
        unsafe { HasContext::create_framebuffer(self).map(|f| f.0.get()) }
    }

    fn delete_framebuffer(&self, id: u32) {
        if let Some(n) = name(id) {
            unsafe { HasContext::delete_framebuffer(self, glow::NativeFramebuffer(n)) }
        }
    }

    fn bind_framebuffer(&self, target: u32, id: u32) {
        unsafe { HasContext::bind_framebuffer(self, target, name(id).map(glow::NativeFramebuffer)) }
    }

    fn framebuffer_texture(&self, target: u32, attachment: u32, texture_target: u32, texture: u32, level: i32) {
        let texture = name(texture).map(glow::NativeTexture);
        unsafe {
            if texture_target == glow::TEXTURE_1D {
                HasContext::framebuffer_texture(self, target, attachment, texture, level);
            } else {
                HasContext::framebuffer_texture_2d(self, target, attachment, texture_target, texture, level);
            }
        }
    }

    fn framebuffer_renderbuffer(&self, target: u32, attachment: u32, renderbuffer: u32) {
        unsafe {
            HasContext::framebuffer_renderbuffer(
                self,
                target,
                attachment,
                glow::RENDERBUFFER,
                name(renderbuffer).map(glow::NativeRenderbuffer),
            );
        }
    }

    fn check_framebuffer_status(&self, target: u32) -> u32 {
        unsafe { HasContext::check_framebuffer_status(self, target) }
    }

    fn blit_framebuffer(&self, src: [i32; 4], dst: [i32; 4], mask: u32, filter: u32) {
        unsafe {
            HasContext::blit_framebuffer(
                self, src[0], src[1], src[2], src[3], dst[0], dst[1], dst[2], dst[3], mask, filter,
            );
        }
    }

    fn draw_buffer(&self, buffer: u32) {
        unsafe { HasContext::draw_buffer(self, buffer) }
    }

    fn create_renderbuffer(&self) -> Result<u32, String> {
        unsafe { HasContext::create_renderbuffer(self).map(|r| r.0.get()) }
    }

    fn delete_renderbuffer(&self, id: u32) {
        if let Some(n) = name(id) {
            unsafe { HasContext::delete_renderbuffer(self, glow::NativeRenderbuffer(n)) }
        }
    }

    fn bind_renderbuffer(&self, id: u32) {
        unsafe { HasContext::bind_renderbuffer(self, glow::RENDERBUFFER, name(id).map(glow::NativeRenderbuffer)) }
    }

    fn renderbuffer_storage(&self, internal_format: u32, width: i32, height: i32) {
        unsafe { HasContext::renderbuffer_storage(self, glow::RENDERBUFFER, internal_format, width, height) }
    }

    fn renderbuffer_storage_multisample(&self, samples: i32, internal_format: u32, width: i32, height: i32) {
        unsafe {
            HasContext::renderbuffer_storage_multisample(
                self,
                glow::RENDERBUFFER,
                samples,
                internal_format,
                width,
                height,
            );
        }
    }

    fn clear_mask(&self, mask: u32) {
        unsafe { HasContext::clear(self, mask) }
    }

    fn set_clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { HasContext::clear_color(self, r, g, b, a) }
    }

    fn set_clear_depth(&self, depth: f32) {
        unsafe { HasContext::clear_depth_f32(self, depth) }
    }

    fn set_clear_stencil(&self, value: i32) {
        unsafe { HasContext::clear_stencil(self, value) }
    }

    fn enable_capability(&self, capability: u32) {
        unsafe { HasContext::enable(self, capability) }
    }

    fn disable_capability(&self, capability: u32) {
        unsafe { HasContext::disable(self, capability) }
    }

    fn enable_capability_indexed(&self, capability: u32, index: u32) {
        unsafe { HasContext::enable_draw_buffer(self, capability, index) }
    }

    fn disable_capability_indexed(&self, capability: u32, index: u32) {
        unsafe { HasContext::disable_draw_buffer(self, capability, index) }
    }

    fn is_capability_enabled(&self, capability: u32) -> bool {
        unsafe { HasContext::is_enabled(self, capability) }
    }

    fn set_viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { HasContext::viewport(self, x, y, width, height) }
    }

    fn get_error(&self) -> u32 {
        unsafe { HasContext::get_error(self) }
    }
}
