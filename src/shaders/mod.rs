//! GLSL ES 3.00 sources for the background variants.
//!
//! Every variant draws one viewport-covering triangle generated from
//! `gl_VertexID`, so no vertex buffers are needed.

mod accretion_disk;
mod dripping_fluid;
mod plasma;

pub(crate) use accretion_disk::SHADER_ACCRETION_DISK;
pub(crate) use dripping_fluid::SHADER_DRIPPING_FLUID;
pub(crate) use plasma::SHADER_PLASMA;

/// Fullscreen triangle; `vUv` spans [0, 1] across the viewport.
pub(crate) const FULLSCREEN_VERTEX: &str = r#"#version 300 es
out vec2 vUv;

void main() {
    vec2 corner = vec2(float((gl_VertexID << 1) & 2), float(gl_VertexID & 2));
    vUv = corner;
    gl_Position = vec4(corner * 2.0 - 1.0, 0.0, 1.0);
}
"#;
