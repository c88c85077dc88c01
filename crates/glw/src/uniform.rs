//! Named uniform values
//!
//! [`UniformValue`] maps Rust values onto `glUniform*` calls. A [`Uniform`]
//! pairs a value with the name it is uploaded to, either borrowing the value
//! ([`UniformRef`]) or owning it ([`UniformStatic`]).

use nalgebra::{Matrix2, Matrix3, Matrix4, Vector2, Vector3, Vector4};

use crate::context::Gl;
use crate::driver::UniformData;
use crate::program::Program;

/// A value that can be uploaded to a uniform location
pub trait UniformValue {
    /// Upload to `location` of the current program
    fn upload(&self, gl: &Gl, location: u32);
}

macro_rules! scalar_uniform {
    ($ty:ty, $variant:ident) => {
        impl UniformValue for $ty {
            fn upload(&self, gl: &Gl, location: u32) {
                gl.uniform(
                    location,
                    UniformData::$variant {
                        components: 1,
                        values: std::slice::from_ref(self),
                    },
                );
            }
        }
    };
}

macro_rules! vector_uniform {
    ($vector:ident, $n:expr, $ty:ty, $variant:ident) => {
        impl UniformValue for $vector<$ty> {
            fn upload(&self, gl: &Gl, location: u32) {
                gl.uniform(
                    location,
                    UniformData::$variant {
                        components: $n,
                        values: self.as_slice(),
                    },
                );
            }
        }
    };
}

macro_rules! matrix_uniform {
    ($matrix:ident, $n:expr) => {
        impl UniformValue for $matrix<f32> {
            fn upload(&self, gl: &Gl, location: u32) {
                gl.uniform(
                    location,
                    UniformData::Matrix {
                        dim: $n,
                        values: self.as_slice(),
                    },
                );
            }
        }
    };
}

scalar_uniform!(f32, Float);
scalar_uniform!(i32, Int);
scalar_uniform!(u32, Uint);

vector_uniform!(Vector2, 2, f32, Float);
vector_uniform!(Vector3, 3, f32, Float);
vector_uniform!(Vector4, 4, f32, Float);
vector_uniform!(Vector2, 2, i32, Int);
vector_uniform!(Vector3, 3, i32, Int);
vector_uniform!(Vector4, 4, i32, Int);
vector_uniform!(Vector2, 2, u32, Uint);
vector_uniform!(Vector3, 3, u32, Uint);
vector_uniform!(Vector4, 4, u32, Uint);

// nalgebra stores matrices column major, as GL expects
matrix_uniform!(Matrix2, 2);
matrix_uniform!(Matrix3, 3);
matrix_uniform!(Matrix4, 4);

/// A value bound to a uniform name
pub trait Uniform {
    /// Type of the uploaded value
    type Value: UniformValue + ?Sized;

    /// Uniform name in the shader
    fn name(&self) -> &str;

    /// Current value
    fn value(&self) -> &Self::Value;

    /// Upload to `program`, which must be current
    fn apply(&self, program: &Program) {
        program.set_uniform(self.name(), self.value());
    }
}

/// Uniform borrowing its value
#[derive(Debug, Clone, Copy)]
pub struct UniformRef<'a, T: UniformValue + ?Sized> {
    name: &'a str,
    value: &'a T,
}

impl<'a, T: UniformValue + ?Sized> UniformRef<'a, T> {
    /// Pair a name with a borrowed value
    pub fn new(name: &'a str, value: &'a T) -> Self {
        Self { name, value }
    }
}

impl<T: UniformValue + ?Sized> Uniform for UniformRef<'_, T> {
    type Value = T;

    fn name(&self) -> &str {
        self.name
    }

    fn value(&self) -> &T {
        self.value
    }
}

/// Uniform owning its value
#[derive(Debug, Clone, PartialEq)]
pub struct UniformStatic<T: UniformValue> {
    name: String,
    value: T,
}

impl<T: UniformValue> UniformStatic<T> {
    /// Pair a name with an owned value
    pub fn new(name: impl Into<String>, value: T) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Replace the value
    pub fn set(&mut self, value: T) {
        self.value = value;
    }

    /// Current value
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Mutable access to the value
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T: UniformValue> Uniform for UniformStatic<T> {
    type Value = T;

    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> &T {
        &self.value
    }
}
