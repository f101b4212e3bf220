#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Scroll-driven animated shader backgrounds.
//!
//! The engine core is plain Rust behind three seams ([`GraphicsBackend`],
//! [`FrameScheduler`] and [`Clock`]) so it runs headless on the host. The
//! browser implementation of those seams, and the JavaScript API built on
//! them, only compile for `wasm32`.

pub mod animation;
pub mod background;
pub mod backend;
pub mod clock;
pub mod config;
pub mod easing;
pub mod error;
#[cfg(any(test, feature = "headless"))]
pub mod headless;
pub mod pointer;
pub mod program;
pub mod scroll;
mod shaders;
pub mod state;
pub mod surface;
pub mod theme;
pub mod uniforms;
pub mod variant;

pub use animation::{AnimationLoop, FrameScheduler, LoopState};
pub use background::AnimatedShaderBackground;
pub use backend::{GraphicsBackend, SurfaceSize};
pub use clock::{AnimationClock, Clock};
pub use config::BackgroundConfig;
pub use error::{BackgroundError, BackgroundResult, ShaderStage};
pub use scroll::ScrollFeed;
pub use surface::Viewport;
pub use theme::{Palette, Rgb, Theme};
pub use variant::ShaderVariant;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod api;
    mod clock;
    mod gl;
    mod listeners;
    mod scheduler;

    pub use api::{document_scroll_progress, ShaderBackground};

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        // A second init (e.g. module re-evaluated) keeps the first logger.
        console_log::init_with_level(log::Level::Info).ok();
        log::info!("backdrop {} loaded", env!("CARGO_PKG_VERSION"));
        Ok(())
    }

    /// Readable message for a thrown JS value.
    fn describe(err: &JsValue) -> String {
        err.as_string().unwrap_or_else(|| format!("{:?}", err))
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{document_scroll_progress, ShaderBackground};
