//! Foundation module - Core utilities and types
//!
//! - Math types shared by uniforms, textures and framebuffers
//! - Logging utilities

pub mod math;
pub mod logging;
