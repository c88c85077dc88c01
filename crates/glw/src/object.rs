//! Base of every OpenGL object
//!
//! An OpenGL object is an integer name handed out by the driver. [`Handle`]
//! owns one such name and implements the lifetime rules shared by every
//! wrapper type:
//!
//! - **Generate on first use**: the name stays 0 until something needs it, or
//!   immediately when the context has auto instantiation enabled. Generation
//!   only needs a shared borrow, so objects shared through `Rc` still get a
//!   real name the first time they are bound or configured.
//! - **Delete on drop**: an owning handle deletes its object when dropped.
//! - **Copy as reference**: [`Handle::reference`] yields a non-owning alias of
//!   the same name; dropping it never deletes anything.
//!
//! A non-zero id always means the driver-side object exists.

use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;
use std::mem;

use crate::context::Gl;
use crate::error::{GlError, GlResult};

/// Common interface of all wrapped OpenGL objects
pub trait Object {
    /// The driver name, 0 when not instantiated
    fn id(&self) -> u32;

    /// Bind the object to its target, generating it first if needed
    fn bind(&self) -> GlResult<()>;

    /// Generate the driver object if it does not exist yet
    fn instantiate(&self) -> GlResult<()>;

    /// Delete the driver object now, leaving the wrapper empty
    fn destroy(&mut self);

    /// Whether a driver object is currently held
    fn is_instantiated(&self) -> bool {
        self.id() != 0
    }
}

/// Type-level description of one driver object family
pub trait ObjectKind {
    /// Human readable name used in logs and errors
    const LABEL: &'static str;

    /// Delete a driver object of this kind
    fn delete(gl: &Gl, id: u32);
}

/// Owned or borrowed driver name with RAII deletion
pub struct Handle<K: ObjectKind> {
    gl: Gl,
    id: Cell<u32>,
    owned: Cell<bool>,
    _kind: PhantomData<K>,
}

impl<K: ObjectKind> Handle<K> {
    /// An empty handle, nothing is generated yet
    pub fn new(gl: &Gl) -> Self {
        Self {
            gl: gl.clone(),
            id: Cell::new(0),
            owned: Cell::new(true),
            _kind: PhantomData,
        }
    }

    /// Take ownership of an existing driver name
    pub fn adopt(gl: &Gl, id: u32) -> Self {
        Self {
            gl: gl.clone(),
            id: Cell::new(id),
            owned: Cell::new(true),
            _kind: PhantomData,
        }
    }

    /// Non-owning alias of the same driver name
    pub fn reference(&self) -> Self {
        Self {
            gl: self.gl.clone(),
            id: Cell::new(self.id.get()),
            owned: Cell::new(false),
            _kind: PhantomData,
        }
    }

    /// The driver name
    #[inline]
    pub fn id(&self) -> u32 {
        self.id.get()
    }

    /// Context this handle belongs to
    #[inline]
    pub fn gl(&self) -> &Gl {
        &self.gl
    }

    /// Whether this handle is a non-owning alias
    pub fn is_reference(&self) -> bool {
        !self.owned.get()
    }

    /// Generate the driver object with `create` when the id is still 0
    ///
    /// A name generated through a reference is owned by that reference.
    pub fn instantiate_with<F>(&self, create: F) -> GlResult<u32>
    where
        F: FnOnce(&Gl) -> Result<u32, String>,
    {
        if self.id.get() == 0 {
            let id = create(&self.gl).map_err(|message| GlError::Creation {
                object: K::LABEL,
                message,
            })?;
            log::trace!("created {} {}", K::LABEL, id);
            self.id.set(id);
            self.owned.set(true);
        }
        Ok(self.id.get())
    }

    /// Delete the driver object if owned, then reset to an empty owning handle
    pub fn release(&mut self) {
        let id = self.id.get();
        if self.owned.get() && id != 0 && self.gl.is_alive() {
            log::trace!("deleting {} {}", K::LABEL, id);
            K::delete(&self.gl, id);
        }
        self.id.set(0);
        self.owned.set(true);
    }

    /// Exchange driver names with another handle
    pub fn swap(&mut self, other: &mut Self) {
        self.id.swap(&other.id);
        self.owned.swap(&other.owned);
        mem::swap(&mut self.gl, &mut other.gl);
    }
}

impl<K: ObjectKind> Drop for Handle<K> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<K: ObjectKind> fmt::Debug for Handle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("kind", &K::LABEL)
            .field("id", &self.id.get())
            .field("owned", &self.owned.get())
            .finish()
    }
}
