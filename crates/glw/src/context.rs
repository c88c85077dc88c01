//! Shared OpenGL context handle
//!
//! [`Gl`] is what every wrapped object keeps to reach the driver. Cloning it is
//! cheap. Contexts are bound to one thread, so it is deliberately `!Send`.

use std::cell::Cell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use crate::driver::Driver;
use crate::error::ErrorCode;

struct Inner {
    driver: Rc<dyn Driver>,
    auto_instantiate: Cell<bool>,
    alive: Cell<bool>,
}

/// Reference-counted handle to a current OpenGL context
#[derive(Clone)]
pub struct Gl {
    inner: Rc<Inner>,
}

impl Gl {
    /// Wrap a driver
    pub fn new<D: Driver + 'static>(driver: D) -> Self {
        Self::from_shared(Rc::new(driver))
    }

    /// Wrap a driver that is also held elsewhere
    pub fn from_shared(driver: Rc<dyn Driver>) -> Self {
        Self {
            inner: Rc::new(Inner {
                driver,
                auto_instantiate: Cell::new(false),
                alive: Cell::new(true),
            }),
        }
    }

    /// Enable auto instantiation
    ///
    /// When enabled, every object constructed on this context generates its
    /// driver object immediately instead of on first use.
    pub fn set_auto_instantiate(&self, enabled: bool) {
        self.inner.auto_instantiate.set(enabled);
    }

    /// Check if auto instantiation is enabled
    pub fn auto_instantiate(&self) -> bool {
        self.inner.auto_instantiate.get()
    }

    /// Whether the underlying context still exists
    pub fn is_alive(&self) -> bool {
        self.inner.alive.get()
    }

    /// Mark the context as destroyed
    ///
    /// Objects released afterwards only forget their ids.
    pub fn mark_lost(&self) {
        self.inner.alive.set(false);
    }

    /// Pop the oldest pending driver error
    pub fn last_error(&self) -> Option<ErrorCode> {
        ErrorCode::from_raw(self.inner.driver.get_error())
    }

    /// Drain every pending driver error
    pub fn clear_errors(&self) {
        // glGetError returns one flag per call until the queue is empty
        for _ in 0..16 {
            if self.last_error().is_none() {
                break;
            }
        }
    }

    /// Set the viewport rectangle
    pub fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.inner.driver.set_viewport(x, y, width, height);
    }

    /// Whether two handles refer to the same context
    pub fn same_context(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Deref for Gl {
    type Target = dyn Driver;

    fn deref(&self) -> &Self::Target {
        &*self.inner.driver
    }
}

impl fmt::Debug for Gl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gl")
            .field("auto_instantiate", &self.auto_instantiate())
            .field("alive", &self.is_alive())
            .finish_non_exhaustive()
    }
}
