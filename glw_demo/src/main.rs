//! Rotating triangle demo
//!
//! Draws a triangle whose vertices sit on the unit circle, coloured by hue,
//! and spins it a tenth of a degree per frame. An optional `.toml` or `.ron`
//! window configuration path can be passed as the first argument.

use std::f32::consts::TAU;
use std::mem;
use std::rc::Rc;

use bytemuck::{Pod, Zeroable};
use glw::prelude::*;
use glw::{ConfigError, WindowError};
use thiserror::Error;

const VERTEX_SHADER: &str = r"
#version 330 core
layout (location = 0) in vec2 pos;
layout (location = 1) in vec4 color;

uniform mat4 modelmat;

out vec4 inColor;
void main()
{
    gl_Position = modelmat * vec4(pos, 0., 1.);
    inColor = color;
}
";

const FRAGMENT_SHADER: &str = r"
#version 330 core
in vec4 inColor;
out vec4 outColor;
void main()
{
    outColor = inColor;
}
";

/// Demo failures
#[derive(Error, Debug)]
enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error(transparent)]
    Gl(#[from] GlError),
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct Vertex {
    pos: [f32; 2],
    color: [f32; 4],
}

/// HSV to RGB, hue in degrees
fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> Vec3 {
    if saturation == 0.0 {
        return Vec3::repeat(value);
    }
    let sector = hue.rem_euclid(360.0) / 60.0;
    let index = sector.floor();
    let fraction = sector - index;
    let p = value * (1.0 - saturation);
    let q = value * (1.0 - saturation * fraction);
    let t = value * (1.0 - saturation * (1.0 - fraction));
    match index as u32 {
        0 => Vec3::new(value, t, p),
        1 => Vec3::new(q, value, p),
        2 => Vec3::new(p, value, t),
        3 => Vec3::new(p, q, value),
        4 => Vec3::new(t, p, value),
        _ => Vec3::new(value, p, q),
    }
}

fn triangle_vertices() -> [Vertex; 3] {
    std::array::from_fn(|i| {
        let percent = i as f32 / 3.0;
        let angle = percent * TAU;
        let rgb = hsv_to_rgb(percent * 360.0, 1.0, 1.0);
        Vertex {
            pos: [angle.cos(), angle.sin()],
            color: [rgb.x, rgb.y, rgb.z, 1.0],
        }
    })
}

fn gen_vbo(gl: &Gl) -> GlResult<ArrayBuffer<Vertex>> {
    let mut vbo = ArrayBuffer::new(gl)?;
    vbo.reserve(3, BufferUsage::StreamDraw)?;
    vbo.map_write()?.copy_from_slice(&triangle_vertices());

    vbo.attach_vertex_array(Rc::new(VertexArray::create(gl)?));
    vbo.set_attribs(&[
        Attrib::new(0, mem::offset_of!(Vertex, pos)).components(2),
        Attrib::new(1, mem::offset_of!(Vertex, color)).components(4),
    ])?;
    Ok(vbo)
}

fn gen_program(gl: &Gl) -> GlResult<Program> {
    let mut program = Program::new(gl)?;
    program.attach(&Shader::from_source(gl, ShaderKind::Vertex, VERTEX_SHADER)?)?;
    program.attach(&Shader::from_source(gl, ShaderKind::Fragment, FRAGMENT_SHADER)?)?;
    program.link()?;
    Ok(program)
}

fn load_config() -> Result<WindowConfig, ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading window configuration from {path}");
            WindowConfig::load_from_file(path)
        }
        None => Ok(WindowConfig {
            title: "glw: Rust OpenGL wrapper".to_string(),
            width: 512,
            height: 512,
            resizable: false,
            ..WindowConfig::default()
        }),
    }
}

fn run() -> Result<(), DemoError> {
    let config = load_config()?;
    let mut window = Window::new(&config)?;
    let gl = window.gl().clone();

    let buffer = gen_vbo(&gl)?;
    let program = gen_program(&gl)?;
    let mut modelmat = Mat4::identity();
    let step = Mat4::new_rotation(Vec3::z() * 0.1f32.to_radians());

    log::info!("Entering render loop");
    while !window.is_closed() {
        modelmat *= step;
        window.update_events();
        gl.clear().color(Color::from((Vec3::repeat(0.1), 1.0)));
        program.use_program()?;
        program.apply(&UniformRef::new("modelmat", &modelmat));
        buffer.draw(Primitive::Triangles)?;
        window.swap_buffers();
    }
    log::info!("Window closed, shutting down");
    Ok(())
}

fn main() {
    glw::logging::init("info");
    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
