//! OpenGL Shaders
//!
//! This module defines the [`Shader`] and [`ShaderProgram`] structs for managing OpenGL shaders.
//! Both own their driver object and delete it when dropped.
//! This module also provides the [`Uniform`] trait for setting uniform variables in shader
//! programs.

use std::path::Path;
use std::sync::Arc;

use glam::{Vec2, Vec4};

use super::{GraphicsDriver, ShaderStage};
use crate::error::ShaderError;
use crate::source::ShaderSource;

/// Represents an individual compiled shader stage.
pub struct Shader<D: GraphicsDriver = glow::Context> {
    gl: Arc<D>,
    id: D::Shader,
    stage: ShaderStage,
}

impl<D: GraphicsDriver> Shader<D> {
    /// Compiles a new shader from the given source code.
    ///
    /// On failure the driver's info log is returned and the shader object is released.
    pub fn new(gl: &Arc<D>, stage: ShaderStage, source: &str) -> Result<Self, ShaderError> {
        let id = gl.create_shader(stage).map_err(ShaderError::Create)?;
        let shader = Self {
            gl: Arc::clone(gl),
            id,
            stage,
        };

        gl.shader_source(id, source);
        gl.compile_shader(id);

        if !gl.shader_compile_status(id) {
            let log = gl.shader_info_log(id);
            return Err(ShaderError::Compile { stage, log });
        }

        log::debug!("compiled {stage} shader {id:?}");
        Ok(shader)
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl<D: GraphicsDriver> Drop for Shader<D> {
    fn drop(&mut self) {
        self.gl.delete_shader(self.id);
    }
}

/// Collects shader stages and links them into a [`ShaderProgram`].
pub struct ShaderProgramBuilder<D: GraphicsDriver = glow::Context> {
    gl: Arc<D>,
    shaders: Vec<Shader<D>>,
}

impl<D: GraphicsDriver> ShaderProgramBuilder<D> {
    pub fn new(gl: &Arc<D>) -> Self {
        Self {
            gl: Arc::clone(gl),
            shaders: Vec::new(),
        }
    }

    /// Compiles `source` as `stage`. A stage attached twice replaces the earlier one.
    pub fn attach(mut self, stage: ShaderStage, source: &str) -> Result<Self, ShaderError> {
        let shader = Shader::new(&self.gl, stage, source)?;
        self.shaders.retain(|s| s.stage != stage);
        self.shaders.push(shader);
        Ok(self)
    }

    /// Links every attached stage. The intermediate shaders are released either way.
    pub fn build(self) -> Result<ShaderProgram<D>, ShaderError> {
        let shaders: Vec<&Shader<D>> = self.shaders.iter().collect();
        ShaderProgram::new(&self.gl, &shaders)
    }
}

/// Represents a uniform variable in a shader program.
pub trait Uniform {
    /// Writes the value to the given location of the currently bound program.
    fn set_uniform<D: GraphicsDriver>(&self, gl: &D, location: &D::UniformLocation);
}

impl Uniform for bool {
    fn set_uniform<D: GraphicsDriver>(&self, gl: &D, location: &D::UniformLocation) {
        gl.uniform_1_i32(location, *self as i32);
    }
}

impl Uniform for i32 {
    fn set_uniform<D: GraphicsDriver>(&self, gl: &D, location: &D::UniformLocation) {
        gl.uniform_1_i32(location, *self);
    }
}

impl Uniform for f32 {
    fn set_uniform<D: GraphicsDriver>(&self, gl: &D, location: &D::UniformLocation) {
        gl.uniform_1_f32(location, *self);
    }
}

impl Uniform for Vec2 {
    fn set_uniform<D: GraphicsDriver>(&self, gl: &D, location: &D::UniformLocation) {
        gl.uniform_2_f32(location, self.x, self.y);
    }
}

impl Uniform for Vec4 {
    fn set_uniform<D: GraphicsDriver>(&self, gl: &D, location: &D::UniformLocation) {
        gl.uniform_4_f32(location, self.x, self.y, self.z, self.w);
    }
}

impl<T: Uniform> Uniform for &T {
    fn set_uniform<D: GraphicsDriver>(&self, gl: &D, location: &D::UniformLocation) {
        (*self).set_uniform(gl, location);
    }
}

/// Represents an OpenGL shader program composed of multiple shaders.
pub struct ShaderProgram<D: GraphicsDriver = glow::Context> {
    gl: Arc<D>,
    id: D::Program,
}

impl<D: GraphicsDriver> ShaderProgram<D> {
    /// Links a new shader program from the given shaders.
    pub fn new(gl: &Arc<D>, shaders: &[&Shader<D>]) -> Result<Self, ShaderError> {
        let id = gl.create_program().map_err(ShaderError::Create)?;
        let program = Self {
            gl: Arc::clone(gl),
            id,
        };

        for shader in shaders {
            gl.attach_shader(id, shader.id);
        }

        gl.link_program(id);
        let linked = gl.program_link_status(id);

        for shader in shaders {
            gl.detach_shader(id, shader.id);
        }

        if !linked {
            let log = gl.program_info_log(id);
            return Err(ShaderError::Link { log });
        }

        log::debug!("linked program {id:?} from {} shaders", shaders.len());
        Ok(program)
    }

    /// Builds a vertex + fragment program from two source files.
    ///
    /// When `glsl_version` is set, sources lacking a `#version` line get one prepended.
    pub fn from_files(
        gl: &Arc<D>,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
        glsl_version: Option<&str>,
    ) -> Result<Self, ShaderError> {
        let load = |path: &Path| -> Result<ShaderSource, ShaderError> {
            let source = ShaderSource::load(path)?;
            Ok(match glsl_version {
                Some(version) => source.with_version_header(version),
                None => source,
            })
        };

        let vertex_source = load(vertex_path.as_ref())?;
        let vertex = Shader::new(gl, ShaderStage::Vertex, vertex_source.as_str())?;

        let fragment_source = load(fragment_path.as_ref())?;
        let fragment = Shader::new(gl, ShaderStage::Fragment, fragment_source.as_str())?;

        Self::new(gl, &[&vertex, &fragment])
    }

    /// The driver handle of this program.
    pub fn handle(&self) -> D::Program {
        self.id
    }

    /// Binds the shader program for use.
    pub fn use_program(&self) {
        self.gl.use_program(Some(self.id));
    }

    /// Whether the linked program declares an active uniform called `name`.
    pub fn has_uniform(&self, name: &str) -> bool {
        self.gl.uniform_location(self.id, name).is_some()
    }

    /// Sets a uniform variable in the shader program. Unknown names are ignored.
    pub fn set_uniform<T: Uniform>(&self, name: &str, value: T) {
        if let Some(location) = self.gl.uniform_location(self.id, name) {
            value.set_uniform(&*self.gl, &location);
        }
    }
}

impl<D: GraphicsDriver> Drop for ShaderProgram<D> {
    fn drop(&mut self) {
        self.gl.delete_program(self.id);
    }
}
