//! Recording driver for unit tests
//!
//! Simulates just enough of a context to exercise handle lifetimes: object
//! names, buffer storage, shader compile/link results and a call log.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use crate::context::Gl;
use crate::driver::{Driver, UniformData};

#[derive(Default)]
struct State {
    next_id: u32,
    live: HashMap<u32, &'static str>,
    calls: Vec<String>,
    bound_buffers: HashMap<u32, u32>,
    storage: HashMap<u32, Vec<u64>>,
    storage_len: HashMap<u32, usize>,
    sources: HashMap<u32, String>,
    attached: HashMap<u32, Vec<u32>>,
    names: Vec<String>,
    enabled: HashSet<u32>,
    errors: VecDeque<u32>,
    framebuffer_status: Option<u32>,
    link_failure: Option<String>,
}

/// In-memory stand-in for a GL context
#[derive(Default)]
pub(crate) struct FakeDriver {
    state: RefCell<State>,
}

impl FakeDriver {
    /// A fresh context plus a handle for inspecting it
    pub(crate) fn context() -> (Gl, Rc<Self>) {
        let fake = Rc::new(Self::default());
        (Gl::from_shared(fake.clone()), fake)
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    pub(crate) fn called(&self, call: &str) -> bool {
        self.state.borrow().calls.iter().any(|c| c == call)
    }

    pub(crate) fn count(&self, prefix: &str) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    pub(crate) fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub(crate) fn is_live(&self, id: u32) -> bool {
        self.state.borrow().live.contains_key(&id)
    }

    pub(crate) fn live_count(&self, kind: &str) -> usize {
        self.state.borrow().live.values().filter(|k| **k == kind).count()
    }

    pub(crate) fn buffer_bytes(&self, id: u32) -> Vec<u8> {
        let state = self.state.borrow();
        let len = state.storage_len.get(&id).copied().unwrap_or(0);
        state
            .storage
            .get(&id)
            .map(|words| bytemuck::cast_slice::<u64, u8>(words)[..len].to_vec())
            .unwrap_or_default()
    }

    pub(crate) fn push_error(&self, code: u32) {
        self.state.borrow_mut().errors.push_back(code);
    }

    pub(crate) fn set_framebuffer_status(&self, status: u32) {
        self.state.borrow_mut().framebuffer_status = Some(status);
    }

    /// Make every later link fail with `log`
    pub(crate) fn fail_links(&self, log: &str) {
        self.state.borrow_mut().link_failure = Some(log.to_string());
    }

    fn record(&self, call: String) {
        self.state.borrow_mut().calls.push(call);
    }

    fn create(&self, kind: &'static str) -> u32 {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = state.next_id;
        state.live.insert(id, kind);
        state.calls.push(format!("create_{kind}() -> {id}"));
        id
    }

    fn delete(&self, kind: &'static str, id: u32) {
        let mut state = self.state.borrow_mut();
        state.live.remove(&id);
        state.calls.push(format!("delete_{kind}({id})"));
    }

    fn name_index(&self, name: &str) -> Option<u32> {
        if name.starts_with("unused_") {
            return None;
        }
        let mut state = self.state.borrow_mut();
        let index = match state.names.iter().position(|n| n == name) {
            Some(i) => i,
            None => {
                state.names.push(name.to_string());
                state.names.len() - 1
            }
        };
        u32::try_from(index).ok()
    }

    /// Larger allocations fail with GL_OUT_OF_MEMORY
    const STORAGE_LIMIT: usize = 1 << 24;

    fn allocate(&self, target: u32, bytes: usize, data: Option<&[u8]>) {
        let mut state = self.state.borrow_mut();
        let Some(&id) = state.bound_buffers.get(&target) else {
            return;
        };
        if bytes > Self::STORAGE_LIMIT {
            state.errors.push_back(glow::OUT_OF_MEMORY);
            return;
        }
        let mut words = vec![0u64; bytes.div_ceil(8)];
        if let Some(data) = data {
            bytemuck::cast_slice_mut::<u64, u8>(&mut words)[..data.len()].copy_from_slice(data);
        }
        state.storage.insert(id, words);
        state.storage_len.insert(id, bytes);
    }
}

impl Driver for FakeDriver {
    fn create_buffer(&self) -> Result<u32, String> {
        Ok(self.create("buffer"))
    }

    fn delete_buffer(&self, id: u32) {
        self.delete("buffer", id);
    }

    fn bind_buffer(&self, target: u32, id: u32) {
        self.state.borrow_mut().bound_buffers.insert(target, id);
        self.record(format!("bind_buffer({target:#x}, {id})"));
    }

    fn bind_buffer_base(&self, target: u32, index: u32, id: u32) {
        self.record(format!("bind_buffer_base({target:#x}, {index}, {id})"));
    }

    fn buffer_data_size(&self, target: u32, size: usize, usage: u32) {
        self.allocate(target, size, None);
        self.record(format!("buffer_data_size({target:#x}, {size}, {usage:#x})"));
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        self.allocate(target, data.len(), Some(data));
        self.record(format!("buffer_data({target:#x}, {}, {usage:#x})", data.len()));
    }

    fn buffer_sub_data(&self, target: u32, offset: usize, data: &[u8]) {
        {
            let mut state = self.state.borrow_mut();
            if let Some(&id) = state.bound_buffers.get(&target) {
                if let Some(words) = state.storage.get_mut(&id) {
                    let bytes = bytemuck::cast_slice_mut::<u64, u8>(words);
                    bytes[offset..offset + data.len()].copy_from_slice(data);
                }
            }
        }
        self.record(format!("buffer_sub_data({target:#x}, {offset}, {})", data.len()));
    }

    fn map_buffer_range(&self, target: u32, offset: usize, length: usize, access: u32) -> *mut u8 {
        self.record(format!("map_buffer_range({target:#x}, {offset}, {length}, {access:#x})"));
        let mut state = self.state.borrow_mut();
        let Some(&id) = state.bound_buffers.get(&target) else {
            return std::ptr::null_mut();
        };
        let available = state.storage_len.get(&id).copied().unwrap_or(0);
        if length == 0 || offset + length > available {
            return std::ptr::null_mut();
        }
        match state.storage.get_mut(&id) {
            Some(words) => bytemuck::cast_slice_mut::<u64, u8>(words)[offset..].as_mut_ptr(),
            None => std::ptr::null_mut(),
        }
    }

    fn unmap_buffer(&self, target: u32) {
        self.record(format!("unmap_buffer({target:#x})"));
    }

    fn create_vertex_array(&self) -> Result<u32, String> {
        Ok(self.create("vertex_array"))
    }

    fn delete_vertex_array(&self, id: u32) {
        self.delete("vertex_array", id);
    }

    fn bind_vertex_array(&self, id: u32) {
        self.record(format!("bind_vertex_array({id})"));
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(format!("enable_vertex_attrib_array({index})"));
    }

    fn disable_vertex_attrib_array(&self, index: u32) {
        self.record(format!("disable_vertex_attrib_array({index})"));
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
        self.record(format!(
            "vertex_attrib_pointer({index}, {size}, {data_type:#x}, {normalized}, {stride}, {offset})"
        ));
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        self.record(format!("draw_arrays({mode:#x}, {first}, {count})"));
    }

    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32) {
        self.record(format!("draw_elements({mode:#x}, {count}, {element_type:#x}, {offset})"));
    }

    fn create_shader(&self, kind: u32) -> Result<u32, String> {
        let id = self.create("shader");
        self.record(format!("shader_kind({id}, {kind:#x})"));
        Ok(id)
    }

    fn delete_shader(&self, id: u32) {
        self.delete("shader", id);
    }

    fn shader_source(&self, id: u32, source: &str) {
        self.state.borrow_mut().sources.insert(id, source.to_string());
        self.record(format!("shader_source({id})"));
    }

    fn compile_shader(&self, id: u32) {
        self.record(format!("compile_shader({id})"));
    }

    fn shader_compile_status(&self, id: u32) -> bool {
        self.state
            .borrow()
            .sources
            .get(&id)
            .is_some_and(|s| !s.contains("#error"))
    }

    fn shader_info_log(&self, id: u32) -> String {
        format!("ERROR: 0:1: shader {id} forced failure")
    }

    fn create_program(&self) -> Result<u32, String> {
        Ok(self.create("program"))
    }

    fn delete_program(&self, id: u32) {
        self.delete("program", id);
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.state.borrow_mut().attached.entry(program).or_default().push(shader);
        self.record(format!("attach_shader({program}, {shader})"));
    }

    fn link_program(&self, id: u32) {
        self.record(format!("link_program({id})"));
    }

    fn program_link_status(&self, id: u32) -> bool {
        let state = self.state.borrow();
        state.link_failure.is_none() && state.attached.get(&id).is_some_and(|s| !s.is_empty())
    }

    fn program_info_log(&self, _id: u32) -> String {
        self.state
            .borrow()
            .link_failure
            .clone()
            .unwrap_or_else(|| "error: no shaders attached".to_string())
    }

    fn use_program(&self, id: u32) {
        self.record(format!("use_program({id})"));
    }

    fn uniform_location(&self, _program: u32, name: &str) -> Option<u32> {
        self.name_index(name)
    }

    fn attrib_location(&self, _program: u32, name: &str) -> Option<u32> {
        self.name_index(name)
    }

    fn bind_attrib_location(&self, program: u32, index: u32, name: &str) {
        self.record(format!("bind_attrib_location({program}, {index}, {name})"));
    }

    fn uniform_block_index(&self, _program: u32, name: &str) -> Option<u32> {
        self.name_index(name)
    }

    fn uniform_block_binding(&self, program: u32, block: u32, binding: u32) {
        self.record(format!("uniform_block_binding({program}, {block}, {binding})"));
    }

    fn uniform(&self, location: u32, data: UniformData<'_>) {
        let call = match data {
            UniformData::Float { components, values } => format!("uniform_{components}f({location}, {values:?})"),
            UniformData::Int { components, values } => format!("uniform_{components}i({location}, {values:?})"),
            UniformData::Uint { components, values } => format!("uniform_{components}ui({location}, {values:?})"),
            UniformData::Matrix { dim, values } => format!("uniform_matrix_{dim}f({location}, {values:?})"),
        };
        self.record(call);
    }

    fn create_texture(&self) -> Result<u32, String> {
        Ok(self.create("texture"))
    }

    fn delete_texture(&self, id: u32) {
        self.delete("texture", id);
    }

    fn bind_texture(&self, target: u32, id: u32) {
        self.record(format!("bind_texture({target:#x}, {id})"));
    }

    fn active_texture(&self, unit: u32) {
        self.record(format!("active_texture({unit})"));
    }

    fn tex_parameter_i32(&self, target: u32, name: u32, value: i32) {
        self.record(format!("tex_parameter({target:#x}, {name:#x}, {value:#x})"));
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
        self.record(format!(
            "tex_image_2d({target:#x}, {level}, {internal_format:#x}, {width}, {height}, {format:#x}, {pixel_type:#x}, {})",
            pixels.map_or(0, <[u8]>::len)
        ));
    }

    fn generate_mipmap(&self, target: u32) {
        self.record(format!("generate_mipmap({target:#x})"));
    }

    fn create_sampler(&self) -> Result<u32, String> {
        Ok(self.create("sampler"))
    }

    fn delete_sampler(&self, id: u32) {
        self.delete("sampler", id);
    }

    fn bind_sampler(&self, unit: u32, id: u32) {
        self.record(format!("bind_sampler({unit}, {id})"));
    }

    fn sampler_parameter_i32(&self, id: u32, name: u32, value: i32) {
        self.record(format!("sampler_parameter({id}, {name:#x}, {value:#x})"));
    }

    fn sampler_parameter_f32(&self, id: u32, name: u32, value: f32) {
        self.record(format!("sampler_parameter_f({id}, {name:#x}, {value})"));
    }

    fn create_framebuffer(&self) -> Result<u32, String> {
        Ok(self.create("framebuffer"))
    }

    fn delete_framebuffer(&self, id: u32) {
        self.delete("framebuffer", id);
    }

    fn bind_framebuffer(&self, target: u32, id: u32) {
        self.record(format!("bind_framebuffer({target:#x}, {id})"));
    }

    fn framebuffer_texture(&self, target: u32, attachment: u32, texture_target: u32, texture: u32, level: i32) {
        self.record(format!(
            "framebuffer_texture({target:#x}, {attachment:#x}, {texture_target:#x}, {texture}, {level})"
        ));
    }

    fn framebuffer_renderbuffer(&self, target: u32, attachment: u32, renderbuffer: u32) {
        self.record(format!("framebuffer_renderbuffer({target:#x}, {attachment:#x}, {renderbuffer})"));
    }

    fn check_framebuffer_status(&self, _target: u32) -> u32 {
        self.state
            .borrow()
            .framebuffer_status
            .unwrap_or(glow::FRAMEBUFFER_COMPLETE)
    }

    fn blit_framebuffer(&self, src: [i32; 4], dst: [i32; 4], mask: u32, filter: u32) {
        self.record(format!("blit_framebuffer({src:?}, {dst:?}, {mask:#x}, {filter:#x})"));
    }

    fn draw_buffer(&self, buffer: u32) {
        self.record(format!("draw_buffer({buffer:#x})"));
    }

    fn create_renderbuffer(&self) -> Result<u32, String> {
        Ok(self.create("renderbuffer"))
    }

    fn delete_renderbuffer(&self, id: u32) {
        self.delete("renderbuffer", id);
    }

    fn bind_renderbuffer(&self, id: u32) {
        self.record(format!("bind_renderbuffer({id})"));
    }

    fn renderbuffer_storage(&self, internal_format: u32, width: i32, height: i32) {
        self.record(format!("renderbuffer_storage({internal_format:#x}, {width}, {height})"));
    }

    fn renderbuffer_storage_multisample(&self, samples: i32, internal_format: u32, width: i32, height: i32) {
        self.record(format!(
            "renderbuffer_storage_multisample({samples}, {internal_format:#x}, {width}, {height})"
        ));
    }

    fn clear_mask(&self, mask: u32) {
        self.record(format!("clear({mask:#x})"));
    }

    fn set_clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.record(format!("clear_color({r}, {g}, {b}, {a})"));
    }

    fn set_clear_depth(&self, depth: f32) {
        self.record(format!("clear_depth({depth})"));
    }

    fn set_clear_stencil(&self, value: i32) {
        self.record(format!("clear_stencil({value})"));
    }

    fn enable_capability(&self, capability: u32) {
        self.state.borrow_mut().enabled.insert(capability);
        self.record(format!("enable({capability:#x})"));
    }

    fn disable_capability(&self, capability: u32) {
        self.state.borrow_mut().enabled.remove(&capability);
        self.record(format!("disable({capability:#x})"));
    }

    fn enable_capability_indexed(&self, capability: u32, index: u32) {
        self.record(format!("enable_indexed({capability:#x}, {index})"));
    }

    fn disable_capability_indexed(&self, capability: u32, index: u32) {
        self.record(format!("disable_indexed({capability:#x}, {index})"));
    }

    fn is_capability_enabled(&self, capability: u32) -> bool {
        self.state.borrow().enabled.contains(&capability)
    }

    fn set_viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(format!("viewport({x}, {y}, {width}, {height})"));
    }

    fn get_error(&self) -> u32 {
        self.state.borrow_mut().errors.pop_front().unwrap_or(glow::NO_ERROR)
    }
}
