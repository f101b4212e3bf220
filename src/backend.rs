//! Platform seam between the background engine and the graphics API.
//!
//! The browser implementation lives in `wasm::gl`; `headless` provides a
//! recording implementation for host-side tests.

use crate::error::{BackgroundResult, ShaderStage};

/// Physical size of the drawing surface in device pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn min_dimension(&self) -> u32 {
        self.width.min(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// The subset of a WebGL2-style API a background needs.
///
/// A backend owns exactly one drawing surface under one mount point.
pub trait GraphicsBackend {
    type Shader;
    type Program;
    type Location: Clone;

    /// Insert the drawing surface under the mount point and acquire a
    /// context for it.
    fn attach_surface(&mut self, size: SurfaceSize) -> BackgroundResult<()>;

    /// Resize the backing buffer and the viewport.
    fn set_surface_size(&mut self, size: SurfaceSize);

    /// Release the context and remove the surface from the mount point.
    fn detach_surface(&mut self);

    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> BackgroundResult<Self::Shader>;
    fn link_program(
        &mut self,
        vertex: &Self::Shader,
        fragment: &Self::Shader,
    ) -> BackgroundResult<Self::Program>;
    fn delete_shader(&mut self, shader: Self::Shader);
    fn delete_program(&mut self, program: Self::Program);

    /// Location of an active uniform, `None` if the linker dropped it.
    fn uniform_location(&self, program: &Self::Program, name: &str) -> Option<Self::Location>;
    fn use_program(&mut self, program: &Self::Program);

    fn uniform1f(&mut self, location: &Self::Location, value: f32);
    fn uniform2f(&mut self, location: &Self::Location, x: f32, y: f32);
    fn uniform3f(&mut self, location: &Self::Location, x: f32, y: f32, z: f32);
    fn uniform1i(&mut self, location: &Self::Location, value: i32);

    fn clear(&mut self, rgba: [f32; 4]);

    /// Draw one triangle covering the viewport.
    fn draw_fullscreen(&mut self);
}
