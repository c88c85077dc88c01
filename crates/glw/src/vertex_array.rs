//! Vertex Array Object wrapper

use std::cell::RefCell;
use std::collections::BTreeSet;

use crate::context::Gl;
use crate::error::GlResult;
use crate::object::{Handle, Object, ObjectKind};

/// Object kind marker for vertex arrays
pub struct VertexArrayObject;

impl ObjectKind for VertexArrayObject {
    const LABEL: &'static str = "vertex array";

    fn delete(gl: &Gl, id: u32) {
        gl.delete_vertex_array(id);
    }
}

/// Vertex Array Object
///
/// Attribute enable state is tracked on the wrapper so queries do not need a
/// round trip to the driver. It is shared through `Rc` by array buffers, hence
/// the interior mutability.
#[derive(Debug)]
pub struct VertexArray {
    handle: Handle<VertexArrayObject>,
    enabled: RefCell<BTreeSet<u32>>,
}

impl VertexArray {
    /// Create a vertex array, generated now only when auto instantiation is on
    pub fn new(gl: &Gl) -> GlResult<Self> {
        let vao = Self {
            handle: Handle::new(gl),
            enabled: RefCell::new(BTreeSet::new()),
        };
        if gl.auto_instantiate() {
            vao.instantiate()?;
        }
        Ok(vao)
    }

    /// Create and generate a vertex array immediately
    pub fn create(gl: &Gl) -> GlResult<Self> {
        let vao = Self::new(gl)?;
        vao.instantiate()?;
        Ok(vao)
    }

    /// Wrap an existing vertex array name, taking ownership
    pub fn from_raw(gl: &Gl, id: u32) -> Self {
        Self {
            handle: Handle::adopt(gl, id),
            enabled: RefCell::new(BTreeSet::new()),
        }
    }

    /// Enable a vertex attribute
    pub fn enable(&self, index: u32) -> GlResult<()> {
        self.bind()?;
        self.handle.gl().enable_vertex_attrib_array(index);
        self.enabled.borrow_mut().insert(index);
        Ok(())
    }

    /// Disable a vertex attribute
    pub fn disable(&self, index: u32) -> GlResult<()> {
        self.bind()?;
        self.handle.gl().disable_vertex_attrib_array(index);
        self.enabled.borrow_mut().remove(&index);
        Ok(())
    }

    /// Whether a vertex attribute was enabled through this wrapper
    pub fn is_enabled(&self, index: u32) -> bool {
        self.enabled.borrow().contains(&index)
    }

    /// Unbind any vertex array
    pub fn unbind(gl: &Gl) {
        gl.bind_vertex_array(0);
    }
}

impl Object for VertexArray {
    fn id(&self) -> u32 {
        self.handle.id()
    }

    fn bind(&self) -> GlResult<()> {
        self.instantiate()?;
        self.handle.gl().bind_vertex_array(self.handle.id());
        Ok(())
    }

    fn instantiate(&self) -> GlResult<()> {
        self.handle.instantiate_with(|gl| gl.create_vertex_array())?;
        Ok(())
    }

    fn destroy(&mut self) {
        self.handle.release();
        self.enabled.borrow_mut().clear();
    }
}
