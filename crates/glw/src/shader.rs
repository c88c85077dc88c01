//! Shader objects
//!
//! A [`Shader`] owns one compiled stage. Compilation happens as soon as a
//! source is set; a failing compile deletes the shader object and returns the
//! driver's info log inside [`GlError::Compile`].

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::context::Gl;
use crate::error::{GlError, GlResult};
use crate::object::{Handle, Object, ObjectKind};

/// Pipeline stage of a shader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    /// GL_VERTEX_SHADER
    Vertex,
    /// GL_FRAGMENT_SHADER
    Fragment,
    /// GL_GEOMETRY_SHADER
    Geometry,
    /// GL_COMPUTE_SHADER
    Compute,
}

impl ShaderKind {
    /// Raw GL enum
    pub const fn raw(self) -> u32 {
        match self {
            Self::Vertex => glow::VERTEX_SHADER,
            Self::Fragment => glow::FRAGMENT_SHADER,
            Self::Geometry => glow::GEOMETRY_SHADER,
            Self::Compute => glow::COMPUTE_SHADER,
        }
    }

    /// File extension used when loading a [`Collection`]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Vertex => "vert",
            Self::Fragment => "frag",
            Self::Geometry => "geom",
            Self::Compute => "comp",
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Vertex => "Vertex",
            Self::Fragment => "Fragment",
            Self::Geometry => "Geometry",
            Self::Compute => "Compute",
        };
        f.write_str(name)
    }
}

/// Object kind marker for shaders
pub struct ShaderObject;

impl ObjectKind for ShaderObject {
    const LABEL: &'static str = "shader";

    fn delete(gl: &Gl, id: u32) {
        gl.delete_shader(id);
    }
}

/// One compiled shader stage
#[derive(Debug)]
pub struct Shader {
    handle: Handle<ShaderObject>,
    kind: ShaderKind,
    name: String,
}

impl Shader {
    /// Empty shader of the given stage
    pub fn new(gl: &Gl, kind: ShaderKind) -> GlResult<Self> {
        let shader = Self {
            handle: Handle::new(gl),
            kind,
            name: String::new(),
        };
        if gl.auto_instantiate() {
            shader.instantiate()?;
        }
        Ok(shader)
    }

    /// Compile a shader from source text
    pub fn from_source(gl: &Gl, kind: ShaderKind, source: &str) -> GlResult<Self> {
        let mut shader = Self::new(gl, kind)?;
        shader.set_source(source)?;
        Ok(shader)
    }

    /// Compile a shader from a source file
    pub fn from_file(gl: &Gl, kind: ShaderKind, path: impl AsRef<Path>) -> GlResult<Self> {
        let mut shader = Self::new(gl, kind)?;
        shader.set_file(path)?;
        Ok(shader)
    }

    /// Set the source and compile
    pub fn set_source(&mut self, source: &str) -> GlResult<()> {
        self.instantiate()?;
        let gl = self.handle.gl();
        let id = self.handle.id();
        gl.shader_source(id, source);
        gl.compile_shader(id);
        if gl.shader_compile_status(id) {
            log::trace!("compiled {} shader {}", self.kind, self.label());
            return Ok(());
        }

        let log = gl.shader_info_log(id);
        self.handle.release();
        Err(GlError::Compile {
            kind: self.kind,
            name: self.label().to_string(),
            log,
        })
    }

    /// Read a source file and compile it
    ///
    /// The path becomes the shader name used in error messages.
    pub fn set_file(&mut self, path: impl AsRef<Path>) -> GlResult<()> {
        let path = path.as_ref();
        self.name = path.display().to_string();
        match std::fs::read_to_string(path) {
            Ok(source) => self.set_source(&source),
            Err(source) => {
                self.handle.release();
                Err(GlError::ShaderFile {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    /// Pipeline stage
    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    /// Source file path, empty for inline sources
    pub fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> &str {
        if self.name.is_empty() {
            "<inline>"
        } else {
            &self.name
        }
    }

    /// Whether a compiled shader object exists
    pub fn exists(&self) -> bool {
        self.is_instantiated()
    }
}

impl Object for Shader {
    fn id(&self) -> u32 {
        self.handle.id()
    }

    /// Shaders have no binding point
    fn bind(&self) -> GlResult<()> {
        Ok(())
    }

    fn instantiate(&self) -> GlResult<()> {
        let kind = self.kind.raw();
        self.handle.instantiate_with(|gl| gl.create_shader(kind))?;
        Ok(())
    }

    fn destroy(&mut self) {
        self.handle.release();
    }
}

/// Set of shader files sharing one base path
///
/// `Collection::new("shaders/basic", ..)` loads `shaders/basic.vert`,
/// `shaders/basic.frag` and so on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    /// Stages to load
    pub kinds: Vec<ShaderKind>,
    /// Path without extension
    pub base_path: PathBuf,
}

impl Collection {
    /// Collection of arbitrary stages
    pub fn new(base_path: impl Into<PathBuf>, kinds: &[ShaderKind]) -> Self {
        Self {
            kinds: kinds.to_vec(),
            base_path: base_path.into(),
        }
    }

    /// Vertex and fragment stages
    pub fn vertex_fragment(base_path: impl Into<PathBuf>) -> Self {
        Self::new(base_path, &[ShaderKind::Vertex, ShaderKind::Fragment])
    }

    /// File path of one stage
    pub fn path(&self, kind: ShaderKind) -> PathBuf {
        let mut path = OsString::from(self.base_path.as_os_str());
        path.push(".");
        path.push(kind.extension());
        PathBuf::from(path)
    }

    /// Compile every stage, stopping at the first failure
    pub fn shaders(&self, gl: &Gl) -> GlResult<Vec<Shader>> {
        self.kinds
            .iter()
            .map(|&kind| Shader::from_file(gl, kind, self.path(kind)))
            .collect()
    }
}

/// Attribute name bound to a fixed location before linking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttribLocation {
    /// Attribute name in the vertex shader
    pub name: String,
    /// Location
    pub index: u32,
}

impl AttribLocation {
    /// Name / location pair
    pub fn new(name: impl Into<String>, index: u32) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeDriver;

    #[test]
    fn test_compile_success() {
        let (gl, fake) = FakeDriver::context();
        let shader = Shader::from_source(&gl, ShaderKind::Fragment, "void main() {}").unwrap();
        assert!(shader.exists());
        assert_eq!(shader.kind(), ShaderKind::Fragment);
        assert!(fake.called(&format!("shader_kind({}, {:#x})", shader.id(), glow::FRAGMENT_SHADER)));
        assert!(fake.called(&format!("compile_shader({})", shader.id())));
    }

    #[test]
    fn test_compile_failure_carries_log_and_deletes() {
        let (gl, fake) = FakeDriver::context();
        let err = Shader::from_source(&gl, ShaderKind::Vertex, "#error broken").unwrap_err();
        match err {
            GlError::Compile { kind, name, log } => {
                assert_eq!(kind, ShaderKind::Vertex);
                assert_eq!(name, "<inline>");
                assert!(log.contains("forced failure"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(fake.live_count("shader"), 0);
    }

    #[test]
    fn test_missing_file() {
        let (gl, fake) = FakeDriver::context();
        gl.set_auto_instantiate(true);
        let err = Shader::from_file(&gl, ShaderKind::Vertex, "/nonexistent/glw/basic.vert").unwrap_err();
        assert!(matches!(err, GlError::ShaderFile { .. }));
        assert!(err.to_string().contains("basic.vert"));
        assert_eq!(fake.live_count("shader"), 0);
    }

    #[test]
    fn test_file_and_collection() {
        let dir = std::env::temp_dir().join(format!("glw_shader_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let base = dir.join("basic");
        std::fs::write(dir.join("basic.vert"), "void main() {}").unwrap();
        std::fs::write(dir.join("basic.frag"), "void main() {}").unwrap();

        let (gl, _) = FakeDriver::context();
        let collection = Collection::vertex_fragment(&base);
        assert_eq!(collection.path(ShaderKind::Fragment), dir.join("basic.frag"));

        let shaders = collection.shaders(&gl).unwrap();
        assert_eq!(shaders.len(), 2);
        assert_eq!(shaders[0].kind(), ShaderKind::Vertex);
        assert!(shaders[1].name().ends_with("basic.frag"));

        let missing = Collection::new(&base, &[ShaderKind::Geometry]).shaders(&gl);
        assert!(matches!(missing, Err(GlError::ShaderFile { .. })));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ShaderKind::Geometry.to_string(), "Geometry");
        assert_eq!(ShaderKind::Compute.extension(), "comp");
    }
}
