//! Compiled and linked shader program.

use std::collections::HashMap;

use crate::backend::GraphicsBackend;
use crate::error::{BackgroundResult, ShaderStage};

/// A fully linked program plus the handles of its declared uniforms.
///
/// Construction either yields a usable program or fails; there is no
/// partially initialized state.
pub struct ShaderProgram<B: GraphicsBackend> {
    program: Option<B::Program>,
    uniforms: HashMap<&'static str, B::Location>,
}

impl<B: GraphicsBackend> ShaderProgram<B> {
    /// Compile both stages, link, and look up `declared` uniform names.
    ///
    /// Names the linker optimized away are simply absent from the handle
    /// map.
    pub fn compile(
        gl: &mut B,
        vertex_source: &str,
        fragment_source: &str,
        declared: &[&'static str],
    ) -> BackgroundResult<Self> {
        let vertex = gl.compile_shader(ShaderStage::Vertex, vertex_source)?;
        let fragment = match gl.compile_shader(ShaderStage::Fragment, fragment_source) {
            Ok(shader) => shader,
            Err(err) => {
                gl.delete_shader(vertex);
                return Err(err);
            }
        };

        let linked = gl.link_program(&vertex, &fragment);
        // Shader objects are not needed once linking has been attempted.
        gl.delete_shader(vertex);
        gl.delete_shader(fragment);
        let program = linked?;

        let mut uniforms = HashMap::with_capacity(declared.len());
        for &name in declared {
            match gl.uniform_location(&program, name) {
                Some(location) => {
                    uniforms.insert(name, location);
                }
                None => log::debug!("uniform {} is not active", name),
            }
        }

        Ok(Self {
            program: Some(program),
            uniforms,
        })
    }

    pub fn uniform_handle(&self, name: &str) -> Option<&B::Location> {
        self.uniforms.get(name)
    }

    /// Number of declared uniforms that are active.
    pub fn active_uniforms(&self) -> usize {
        self.uniforms.len()
    }

    pub fn is_disposed(&self) -> bool {
        self.program.is_none()
    }

    pub fn use_program(&self, gl: &mut B) {
        if let Some(program) = &self.program {
            gl.use_program(program);
        }
    }

    pub fn dispose(&mut self, gl: &mut B) {
        if let Some(program) = self.program.take() {
            gl.delete_program(program);
            self.uniforms.clear();
        }
    }
}
