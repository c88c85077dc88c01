//! Math utilities and types
//!
//! Thin aliases over `nalgebra` matching the GLSL vector and matrix types.

pub use nalgebra::{Matrix2, Matrix3, Matrix4, Vector2, Vector3, Vector4};

/// `vec2`
pub type Vec2 = Vector2<f32>;

/// `vec3`
pub type Vec3 = Vector3<f32>;

/// `vec4`
pub type Vec4 = Vector4<f32>;

/// `ivec2`, used for texture and renderbuffer sizes
pub type IVec2 = Vector2<i32>;

/// `mat2`
pub type Mat2 = Matrix2<f32>;

/// `mat3`
pub type Mat3 = Matrix3<f32>;

/// `mat4`
pub type Mat4 = Matrix4<f32>;

/// Pixel rectangle given by two corners, as used by framebuffer blits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge
    pub x0: i32,
    /// Bottom edge
    pub y0: i32,
    /// Right edge (exclusive)
    pub x1: i32,
    /// Top edge (exclusive)
    pub y1: i32,
}

impl Rect {
    /// Rectangle from two corners
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Rectangle anchored at the origin
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Corners in driver order
    pub const fn to_array(self) -> [i32; 4] {
        [self.x0, self.y0, self.x1, self.y1]
    }

    /// Width (may be negative for flipped blits)
    pub const fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    /// Height (may be negative for flipped blits)
    pub const fn height(&self) -> i32 {
        self.y1 - self.y0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_size() {
        let rect = Rect::from_size(640, 480);
        assert_eq!(rect.to_array(), [0, 0, 640, 480]);
        assert_eq!(rect.width(), 640);
        assert_eq!(rect.height(), 480);
    }

    #[test]
    fn test_flipped_rect_has_negative_height() {
        let rect = Rect::new(0, 480, 640, 0);
        assert_eq!(rect.height(), -480);
    }
}
