use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::shaders::{
    FULLSCREEN_VERTEX, SHADER_ACCRETION_DISK, SHADER_DRIPPING_FLUID, SHADER_PLASMA,
};
use crate::uniforms::UniformNames;

/// Available background shaders
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShaderVariant {
    /// Plasma ring around a dark core
    #[default]
    AccretionDisk,
    /// Full-bleed plasma field
    Plasma,
    /// Scroll-driven dripping columns
    DrippingFluid,
}

// Noise drift loops first, then flicker and pulse.
const DISK_FREQUENCIES: [f32; 12] = [0.5, 0.3, 0.8, 0.6, 1.2, 0.9, 8.0, 12.0, 6.0, 3.0, 7.0, 11.0];
const PLASMA_FREQUENCIES: [f32; 9] = [0.5, 0.3, 0.8, 0.6, 1.2, 0.9, 8.0, 12.0, 6.0];
// Scaled by the whole number `floor(u_speed * 20 + 0.5)` in the shader.
const DRIP_FREQUENCIES: [f32; 1] = [0.1];

const DISK_UNIFORMS: UniformNames = UniformNames {
    time: Some("time"),
    scroll_progress: Some("scrollProgress"),
    primary: Some("themeColor"),
    secondary: Some("themeColorSecondary"),
    accent: Some("themeAccent"),
    turbulence: Some("turbulence"),
    intensity: Some("diskIntensity"),
    resolution: Some("uResolution"),
    min_dimension: Some("uMinDimension"),
    pointer: Some("uPointer"),
    speed: None,
    seed: None,
    scale: None,
    column_width: None,
    opacity: None,
    debug: Some("debugSeam"),
};

const PLASMA_UNIFORMS: UniformNames = UniformNames {
    time: Some("time"),
    scroll_progress: Some("scrollProgress"),
    primary: Some("themeColor"),
    secondary: Some("themeColorSecondary"),
    accent: None,
    turbulence: None,
    intensity: Some("diskIntensity"),
    resolution: None,
    min_dimension: None,
    pointer: Some("uPointer"),
    speed: None,
    seed: None,
    scale: None,
    column_width: None,
    opacity: None,
    debug: None,
};

const DRIP_UNIFORMS: UniformNames = UniformNames {
    time: Some("u_time"),
    scroll_progress: Some("u_scroll_progr"),
    primary: Some("u_color"),
    secondary: None,
    accent: None,
    turbulence: None,
    intensity: None,
    resolution: Some("u_resolution"),
    min_dimension: None,
    pointer: None,
    speed: Some("u_speed"),
    seed: Some("u_seed"),
    scale: Some("u_scale"),
    column_width: Some("u_col_width"),
    opacity: Some("u_opacity"),
    debug: None,
};

impl ShaderVariant {
    pub fn all() -> &'static [ShaderVariant] {
        &[
            ShaderVariant::AccretionDisk,
            ShaderVariant::Plasma,
            ShaderVariant::DrippingFluid,
        ]
    }

    pub fn id(&self) -> &'static str {
        match self {
            ShaderVariant::AccretionDisk => "accretion-disk",
            ShaderVariant::Plasma => "plasma",
            ShaderVariant::DrippingFluid => "dripping-fluid",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|v| v.id().eq_ignore_ascii_case(id.trim()))
    }

    pub fn vertex_source(&self) -> &'static str {
        FULLSCREEN_VERTEX
    }

    pub fn fragment_source(&self) -> &'static str {
        match self {
            ShaderVariant::AccretionDisk => SHADER_ACCRETION_DISK,
            ShaderVariant::Plasma => SHADER_PLASMA,
            ShaderVariant::DrippingFluid => SHADER_DRIPPING_FLUID,
        }
    }

    /// Angular frequencies, in rad/s, at which the fragment shader reads
    /// time. Every use of time in the shader is `sin` or `cos` of one of
    /// these (or a whole multiple of one) times time.
    pub fn time_frequencies(&self) -> &'static [f32] {
        match self {
            ShaderVariant::AccretionDisk => &DISK_FREQUENCIES,
            ShaderVariant::Plasma => &PLASMA_FREQUENCIES,
            ShaderVariant::DrippingFluid => &DRIP_FREQUENCIES,
        }
    }

    /// Whether shifting time by `period` seconds leaves every frame unchanged.
    pub fn is_periodic_in(&self, period: f64) -> bool {
        if !(period.is_finite() && period > 0.0) {
            return false;
        }
        self.time_frequencies().iter().all(|&w| {
            let cycles = f64::from(w) * period / TAU;
            (cycles - cycles.round()).abs() < 1e-4
        })
    }

    /// The uniform table for this variant.
    pub fn uniform_names(&self) -> &'static UniformNames {
        match self {
            ShaderVariant::AccretionDisk => &DISK_UNIFORMS,
            ShaderVariant::Plasma => &PLASMA_UNIFORMS,
            ShaderVariant::DrippingFluid => &DRIP_UNIFORMS,
        }
    }
}
