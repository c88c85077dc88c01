//! Shader programs
//!
//! A [`Program`] links shader stages together. Copying one with
//! [`Program::reference`] yields a non-owning alias that can be bound and fed
//! uniforms but cannot receive new shaders.

use std::path::Path;

use crate::context::Gl;
use crate::error::{GlError, GlResult};
use crate::object::{Handle, Object, ObjectKind};
use crate::shader::{AttribLocation, Collection, Shader};
use crate::uniform::{Uniform, UniformValue};

/// Object kind marker for programs
pub struct ProgramObject;

impl ObjectKind for ProgramObject {
    const LABEL: &'static str = "program";

    fn delete(gl: &Gl, id: u32) {
        gl.delete_program(id);
    }
}

/// Linked shader program
#[derive(Debug)]
pub struct Program {
    handle: Handle<ProgramObject>,
}

impl Program {
    /// Empty program, generated on the first attached shader
    pub fn new(gl: &Gl) -> GlResult<Self> {
        let program = Self {
            handle: Handle::new(gl),
        };
        if gl.auto_instantiate() {
            program.instantiate()?;
        }
        Ok(program)
    }

    /// Wrap an existing program name, taking ownership
    pub fn from_raw(gl: &Gl, id: u32) -> Self {
        Self {
            handle: Handle::adopt(gl, id),
        }
    }

    /// Load `<base>.vert` and `<base>.frag`, then link
    pub fn from_files(gl: &Gl, base_path: impl AsRef<Path>) -> GlResult<Self> {
        let mut program = Self::new(gl)?;
        program.load(base_path)?;
        Ok(program)
    }

    /// Non-owning alias of this program
    ///
    /// The program object is generated first so the alias never names 0.
    pub fn reference(&self) -> GlResult<Self> {
        self.instantiate()?;
        Ok(Self {
            handle: self.handle.reference(),
        })
    }

    /// Whether this is a non-owning alias
    pub fn is_reference(&self) -> bool {
        self.handle.is_reference()
    }

    /// Attach a compiled shader
    pub fn attach(&mut self, shader: &Shader) -> GlResult<()> {
        if self.is_reference() {
            return Err(GlError::ProgramReference);
        }
        self.instantiate()?;
        self.handle.gl().attach_shader(self.handle.id(), shader.id());
        Ok(())
    }

    /// Attach several shaders
    pub fn attach_all(&mut self, shaders: &[Shader]) -> GlResult<()> {
        shaders.iter().try_for_each(|shader| self.attach(shader))
    }

    /// Compile every stage of a collection and attach it
    ///
    /// The shader objects are released afterwards; the driver keeps them alive
    /// while they are attached.
    pub fn attach_collection(&mut self, collection: &Collection) -> GlResult<()> {
        let shaders = collection.shaders(self.handle.gl())?;
        self.attach_all(&shaders)
    }

    /// Bind an attribute name to a location; takes effect on the next link
    pub fn bind_attrib(&mut self, attrib: &AttribLocation) -> GlResult<()> {
        self.set_attrib_location(&attrib.name, attrib.index)
    }

    /// Bind `name` to location `index`; takes effect on the next link
    pub fn set_attrib_location(&mut self, name: &str, index: u32) -> GlResult<()> {
        self.instantiate()?;
        self.handle.gl().bind_attrib_location(self.handle.id(), index, name);
        Ok(())
    }

    /// Link the attached shaders
    pub fn link(&mut self) -> GlResult<()> {
        self.instantiate()?;
        let gl = self.handle.gl();
        let id = self.handle.id();
        gl.clear_errors();
        gl.link_program(id);
        if gl.program_link_status(id) {
            log::debug!("linked program {id}");
            return Ok(());
        }
        Err(GlError::Link {
            log: gl.program_info_log(id),
            code: gl.last_error(),
        })
    }

    /// Load `<base>.vert` and `<base>.frag`, attach them and link
    ///
    /// Failures are logged before being returned.
    pub fn load(&mut self, base_path: impl AsRef<Path>) -> GlResult<()> {
        let collection = Collection::vertex_fragment(base_path.as_ref());
        let result = self.attach_collection(&collection).and_then(|()| self.link());
        if let Err(e) = &result {
            log::error!("failed to load program {}: {e}", base_path.as_ref().display());
        }
        result
    }

    /// Location of a uniform, `None` when it is not active
    pub fn uniform_location(&self, name: &str) -> Option<u32> {
        self.handle.gl().uniform_location(self.handle.id(), name)
    }

    /// Location of a vertex attribute, `None` when it is not active
    pub fn attrib_location(&self, name: &str) -> Option<u32> {
        self.handle.gl().attrib_location(self.handle.id(), name)
    }

    /// Whether the program object exists
    pub fn exists(&self) -> bool {
        self.is_instantiated()
    }

    /// Make this the current program
    pub fn use_program(&self) -> GlResult<()> {
        self.instantiate()?;
        self.handle.gl().use_program(self.handle.id());
        Ok(())
    }

    /// Exchange program objects with another wrapper
    pub fn swap(&mut self, other: &mut Self) {
        self.handle.swap(&mut other.handle);
    }

    /// Upload a named uniform
    pub fn apply<U: Uniform + ?Sized>(&self, uniform: &U) {
        uniform.apply(self);
    }

    /// Upload `value` to the uniform `name`
    ///
    /// The program must be current. Inactive uniforms are skipped.
    pub fn set_uniform<V: UniformValue + ?Sized>(&self, name: &str, value: &V) {
        if let Some(location) = self.uniform_location(name) {
            value.upload(self.handle.gl(), location);
        }
    }
}

impl Object for Program {
    fn id(&self) -> u32 {
        self.handle.id()
    }

    fn bind(&self) -> GlResult<()> {
        self.use_program()
    }

    fn instantiate(&self) -> GlResult<()> {
        self.handle.instantiate_with(|gl| gl.create_program())?;
        Ok(())
    }

    fn destroy(&mut self) {
        self.handle.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::shader::ShaderKind;
    use crate::testing::FakeDriver;

    fn shader(gl: &Gl, kind: ShaderKind) -> Shader {
        Shader::from_source(gl, kind, "void main() {}").unwrap()
    }

    #[test]
    fn test_attach_creates_program() {
        let (gl, fake) = FakeDriver::context();
        let mut program = Program::new(&gl).unwrap();
        assert!(!program.exists());

        let vs = shader(&gl, ShaderKind::Vertex);
        program.attach(&vs).unwrap();
        assert!(program.exists());
        assert!(fake.called(&format!("attach_shader({}, {})", program.id(), vs.id())));
        program.link().unwrap();
    }

    #[test]
    fn test_link_failure_reports_log() {
        let (gl, fake) = FakeDriver::context();
        let mut program = Program::new(&gl).unwrap();
        fake.push_error(glow::INVALID_OPERATION);
        fake.push_error(glow::INVALID_VALUE);

        let err = program.link().unwrap_err();
        match &err {
            GlError::Link { log, code } => {
                assert_eq!(log, "error: no shaders attached");
                // Stale errors are drained before linking
                assert_eq!(*code, None);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("no shaders attached"));
        assert!(program.exists());
    }

    #[test]
    fn test_reference_cannot_attach_and_does_not_delete() {
        let (gl, fake) = FakeDriver::context();
        let mut program = Program::new(&gl).unwrap();
        program.attach(&shader(&gl, ShaderKind::Vertex)).unwrap();

        let mut alias = program.reference().unwrap();
        assert!(alias.is_reference());
        assert_eq!(alias.id(), program.id());
        let err = alias.attach(&shader(&gl, ShaderKind::Fragment)).unwrap_err();
        assert!(matches!(err, GlError::ProgramReference));

        drop(alias);
        assert!(fake.is_live(program.id()));
    }

    #[test]
    fn test_uniforms_and_attribs() {
        let (gl, fake) = FakeDriver::context();
        let mut program = Program::new(&gl).unwrap();
        program.attach(&shader(&gl, ShaderKind::Vertex)).unwrap();
        program.bind_attrib(&AttribLocation::new("position", 0)).unwrap();
        program.link().unwrap();
        assert!(fake.called(&format!("bind_attrib_location({}, 0, position)", program.id())));

        program.use_program().unwrap();
        program.set_uniform("tint", &Vec3::new(1.0, 0.5, 0.0));
        let location = program.uniform_location("tint").unwrap();
        assert!(fake.called(&format!("uniform_3f({location}, [1.0, 0.5, 0.0])")));

        fake.clear_calls();
        program.set_uniform("unused_scale", &2.0f32);
        assert!(fake.calls().is_empty());
        assert_eq!(program.attrib_location("unused_normal"), None);
    }

    #[test]
    fn test_swap_and_drop() {
        let (gl, fake) = FakeDriver::context();
        let mut a = Program::new(&gl).unwrap();
        a.attach(&shader(&gl, ShaderKind::Vertex)).unwrap();
        let id = a.id();
        let mut b = Program::new(&gl).unwrap();
        a.swap(&mut b);
        assert_eq!(b.id(), id);
        assert!(!a.exists());
        drop(b);
        assert!(!fake.is_live(id));
    }

    #[test]
    fn test_load_missing_files() {
        let (gl, fake) = FakeDriver::context();
        let mut program = Program::new(&gl).unwrap();
        let err = program.load("/nonexistent/glw/program").unwrap_err();
        assert!(matches!(err, GlError::ShaderFile { .. }));
        assert_eq!(fake.count("link_program"), 0);
    }

    fn write_sources(name: &str, vertex: &str, fragment: &str) -> (std::path::PathBuf, std::path::PathBuf) {
        let dir = std::env::temp_dir().join(format!("glw_program_{name}_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let base = dir.join("basic");
        std::fs::write(dir.join("basic.vert"), vertex).unwrap();
        std::fs::write(dir.join("basic.frag"), fragment).unwrap();
        (dir, base)
    }

    #[test]
    fn test_from_files_attaches_and_links() {
        let (dir, base) = write_sources("load", "void main() { gl_Position = vec4(0.0); }", "void main() {}");
        let (gl, fake) = FakeDriver::context();

        let program = Program::from_files(&gl, &base).unwrap();
        assert!(program.exists());
        assert_eq!(fake.count(&format!("attach_shader({}, ", program.id())), 2);
        assert!(fake.called(&format!("link_program({})", program.id())));
        // Shader objects are released once attached
        assert_eq!(fake.live_count("shader"), 0);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_reports_link_failure() {
        let (dir, base) = write_sources("link_failure", "void main() {}", "void main() {}");
        let (gl, fake) = FakeDriver::context();
        fake.fail_links("error: varying 'uv' not written by the vertex shader");

        let mut program = Program::new(&gl).unwrap();
        let err = program.load(&base).unwrap_err();
        match &err {
            GlError::Link { log, .. } => assert!(log.contains("varying 'uv'")),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(fake.count("attach_shader"), 2);
        assert_eq!(fake.count("link_program"), 1);
        // The program object survives for inspection
        assert!(program.exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_reference_of_lazy_program() {
        let (gl, fake) = FakeDriver::context();
        let program = Program::new(&gl).unwrap();
        assert!(!program.exists());

        let alias = program.reference().unwrap();
        assert_ne!(alias.id(), 0);
        assert_eq!(alias.id(), program.id());
        alias.use_program().unwrap();
        assert!(!fake.called("use_program(0)"));

        drop(alias);
        assert!(fake.is_live(program.id()));
    }
}
