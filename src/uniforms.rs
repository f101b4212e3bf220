//! Semantic uniform slots and the per-frame binder.
//!
//! Each shader variant declares, once, which GLSL name (if any) backs each
//! semantic slot. After linking the table is resolved into
//! [`ResolvedUniforms`], and every frame writes every slot through the
//! [`UniformBinder`]; absent slots are silent no-ops.

use crate::backend::{GraphicsBackend, SurfaceSize};
use crate::program::ShaderProgram;
use crate::theme::{Palette, Rgb};

/// GLSL names backing each semantic slot for one shader variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UniformNames {
    pub time: Option<&'static str>,
    pub scroll_progress: Option<&'static str>,
    pub primary: Option<&'static str>,
    pub secondary: Option<&'static str>,
    pub accent: Option<&'static str>,
    pub turbulence: Option<&'static str>,
    pub intensity: Option<&'static str>,
    pub resolution: Option<&'static str>,
    pub min_dimension: Option<&'static str>,
    pub pointer: Option<&'static str>,
    pub speed: Option<&'static str>,
    pub seed: Option<&'static str>,
    pub scale: Option<&'static str>,
    pub column_width: Option<&'static str>,
    pub opacity: Option<&'static str>,
    pub debug: Option<&'static str>,
}

impl UniformNames {
    /// All declared names, in slot order.
    pub fn declared(&self) -> Vec<&'static str> {
        [
            self.time,
            self.scroll_progress,
            self.primary,
            self.secondary,
            self.accent,
            self.turbulence,
            self.intensity,
            self.resolution,
            self.min_dimension,
            self.pointer,
            self.speed,
            self.seed,
            self.scale,
            self.column_width,
            self.opacity,
            self.debug,
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Handles for every slot, resolved once after linking.
pub struct ResolvedUniforms<L> {
    pub time: Option<L>,
    pub scroll_progress: Option<L>,
    pub primary: Option<L>,
    pub secondary: Option<L>,
    pub accent: Option<L>,
    pub turbulence: Option<L>,
    pub intensity: Option<L>,
    pub resolution: Option<L>,
    pub min_dimension: Option<L>,
    pub pointer: Option<L>,
    pub speed: Option<L>,
    pub seed: Option<L>,
    pub scale: Option<L>,
    pub column_width: Option<L>,
    pub opacity: Option<L>,
    pub debug: Option<L>,
}

impl<L: Clone> ResolvedUniforms<L> {
    pub fn resolve<B>(program: &ShaderProgram<B>, names: &UniformNames) -> Self
    where
        B: GraphicsBackend<Location = L>,
    {
        let find = |name: Option<&'static str>| name.and_then(|n| program.uniform_handle(n).cloned());
        Self {
            time: find(names.time),
            scroll_progress: find(names.scroll_progress),
            primary: find(names.primary),
            secondary: find(names.secondary),
            accent: find(names.accent),
            turbulence: find(names.turbulence),
            intensity: find(names.intensity),
            resolution: find(names.resolution),
            min_dimension: find(names.min_dimension),
            pointer: find(names.pointer),
            speed: find(names.speed),
            seed: find(names.seed),
            scale: find(names.scale),
            column_width: find(names.column_width),
            opacity: find(names.opacity),
            debug: find(names.debug),
        }
    }
}

/// Values for every slot for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameUniforms {
    pub time: f32,
    pub scroll_progress: f32,
    pub colors: Palette,
    pub turbulence: f32,
    pub intensity: f32,
    pub pointer: [f32; 2],
    pub speed: f32,
    pub seed: f32,
    pub scale: f32,
    pub column_width: f32,
    pub opacity: f32,
    pub debug: bool,
}

/// Writes values through optional handles.
pub struct UniformBinder<'a, B: GraphicsBackend> {
    gl: &'a mut B,
}

impl<'a, B: GraphicsBackend> UniformBinder<'a, B> {
    pub fn new(gl: &'a mut B) -> Self {
        Self { gl }
    }

    pub fn bind_scalar(&mut self, handle: Option<&B::Location>, value: f32) {
        if let Some(location) = handle {
            self.gl.uniform1f(location, value);
        }
    }

    pub fn bind_vec2(&mut self, handle: Option<&B::Location>, x: f32, y: f32) {
        if let Some(location) = handle {
            self.gl.uniform2f(location, x, y);
        }
    }

    pub fn bind_vec3(&mut self, handle: Option<&B::Location>, r: f32, g: f32, b: f32) {
        if let Some(location) = handle {
            self.gl.uniform3f(location, r, g, b);
        }
    }

    pub fn bind_rgb(&mut self, handle: Option<&B::Location>, color: Rgb) {
        self.bind_vec3(handle, color.r, color.g, color.b);
    }

    pub fn bind_bool(&mut self, handle: Option<&B::Location>, value: bool) {
        if let Some(location) = handle {
            self.gl.uniform1i(location, value as i32);
        }
    }

    /// Write every per-frame slot.
    pub fn bind_frame(&mut self, slots: &ResolvedUniforms<B::Location>, frame: &FrameUniforms) {
        self.bind_scalar(slots.time.as_ref(), frame.time);
        self.bind_scalar(slots.scroll_progress.as_ref(), frame.scroll_progress);
        self.bind_rgb(slots.primary.as_ref(), frame.colors.primary);
        self.bind_rgb(slots.secondary.as_ref(), frame.colors.secondary);
        self.bind_rgb(slots.accent.as_ref(), frame.colors.accent);
        self.bind_scalar(slots.turbulence.as_ref(), frame.turbulence);
        self.bind_scalar(slots.intensity.as_ref(), frame.intensity);
        self.bind_vec2(slots.pointer.as_ref(), frame.pointer[0], frame.pointer[1]);
        self.bind_scalar(slots.speed.as_ref(), frame.speed);
        self.bind_scalar(slots.seed.as_ref(), frame.seed);
        self.bind_scalar(slots.scale.as_ref(), frame.scale);
        self.bind_scalar(slots.column_width.as_ref(), frame.column_width);
        self.bind_scalar(slots.opacity.as_ref(), frame.opacity);
        self.bind_bool(slots.debug.as_ref(), frame.debug);
    }

    /// Write the size-dependent slots.
    pub fn bind_size(&mut self, slots: &ResolvedUniforms<B::Location>, size: SurfaceSize) {
        self.bind_vec2(
            slots.resolution.as_ref(),
            size.width as f32,
            size.height as f32,
        );
        self.bind_scalar(slots.min_dimension.as_ref(), size.min_dimension() as f32);
    }
}
