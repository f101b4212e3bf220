//! Drawing surface owned by one background.

use crate::backend::{GraphicsBackend, SurfaceSize};
use crate::error::{BackgroundError, BackgroundResult};

/// Host viewport in CSS pixels plus its device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// Physical size with the pixel ratio capped at `max_ratio`.
    pub fn physical_size(&self, max_ratio: f64) -> BackgroundResult<SurfaceSize> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(self.width) || !valid(self.height) {
            return Err(BackgroundError::resize(format!(
                "invalid viewport {}x{}",
                self.width, self.height
            )));
        }
        if !valid(self.pixel_ratio) {
            return Err(BackgroundError::resize(format!(
                "invalid pixel ratio {}",
                self.pixel_ratio
            )));
        }
        let ratio = self.pixel_ratio.min(max_ratio.max(1.0));
        let width = (self.width * ratio).round().max(1.0);
        let height = (self.height * ratio).round().max(1.0);
        if width > u32::MAX as f64 || height > u32::MAX as f64 {
            return Err(BackgroundError::resize("viewport too large"));
        }
        Ok(SurfaceSize::new(width as u32, height as u32))
    }
}

/// The canvas a background renders into, sized to its viewport.
pub struct RenderSurface<B: GraphicsBackend> {
    gl: B,
    size: SurfaceSize,
    max_pixel_ratio: f64,
    clear_color: [f32; 4],
    disposed: bool,
}

impl<B: GraphicsBackend> RenderSurface<B> {
    /// Attach a surface sized to `viewport`.
    pub fn initialize(
        mut gl: B,
        viewport: Viewport,
        max_pixel_ratio: f64,
        clear_color: [f32; 4],
    ) -> BackgroundResult<Self> {
        let size = viewport
            .physical_size(max_pixel_ratio)
            .map_err(|err| BackgroundError::surface_init(err.to_string()))?;
        gl.attach_surface(size)?;
        gl.set_surface_size(size);
        log::debug!("surface attached at {}x{}", size.width, size.height);
        Ok(Self {
            gl,
            size,
            max_pixel_ratio,
            clear_color,
            disposed: false,
        })
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn gl(&mut self) -> &mut B {
        &mut self.gl
    }

    /// Resize to `viewport`, then hand the new size to `on_resized` so
    /// size-dependent uniforms are updated in the same call.
    ///
    /// Unchanged physical sizes do not touch the backend.
    pub fn resize<F>(&mut self, viewport: Viewport, on_resized: F) -> BackgroundResult<SurfaceSize>
    where
        F: FnOnce(&mut B, SurfaceSize),
    {
        if self.disposed {
            return Ok(self.size);
        }
        let size = viewport.physical_size(self.max_pixel_ratio)?;
        if size == self.size {
            return Ok(size);
        }
        self.gl.set_surface_size(size);
        self.size = size;
        on_resized(&mut self.gl, size);
        Ok(size)
    }

    /// Clear, then run `draw`.
    pub fn render<F>(&mut self, draw: F)
    where
        F: FnOnce(&mut B),
    {
        if self.disposed {
            return;
        }
        self.gl.clear(self.clear_color);
        draw(&mut self.gl);
    }

    /// Release the context and detach the canvas. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.gl.detach_surface();
        self.disposed = true;
        log::debug!("surface disposed");
    }
}

impl<B: GraphicsBackend> Drop for RenderSurface<B> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessBackend;

    const CLEAR: [f32; 4] = [0.0, 0.0, 0.0, 0.0];

    #[test]
    fn physical_size_caps_pixel_ratio() {
        let size = Viewport::new(800.0, 600.0, 3.0).physical_size(2.0).unwrap();
        assert_eq!(size, SurfaceSize::new(1600, 1200));
        let size = Viewport::new(800.0, 600.0, 1.5).physical_size(2.0).unwrap();
        assert_eq!(size, SurfaceSize::new(1200, 900));
    }

    #[test]
    fn physical_size_rejects_garbage() {
        assert!(Viewport::new(f64::NAN, 600.0, 1.0).physical_size(2.0).is_err());
        assert!(Viewport::new(800.0, 0.0, 1.0).physical_size(2.0).is_err());
        assert!(Viewport::new(800.0, 600.0, f64::INFINITY).physical_size(2.0).is_err());
    }

    #[test]
    fn initialize_attaches_at_viewport_size() {
        let gl = HeadlessBackend::new();
        let recorder = gl.recorder();
        let surface = RenderSurface::initialize(gl, Viewport::new(1024.0, 768.0, 2.0), 2.0, CLEAR)
            .expect("attaches");
        assert_eq!(surface.size(), SurfaceSize::new(2048, 1536));
        let rec = recorder.recording();
        assert!(rec.attached);
        assert_eq!(rec.size, SurfaceSize::new(2048, 1536));
    }

    #[test]
    fn initialize_reports_missing_context() {
        let mut gl = HeadlessBackend::new();
        gl.fail_attach("webgl2 unavailable");
        let err = RenderSurface::initialize(gl, Viewport::new(800.0, 600.0, 1.0), 2.0, CLEAR)
            .err()
            .expect("fails");
        assert!(matches!(err, BackgroundError::SurfaceInit(_)));
    }

    #[test]
    fn repeated_resizes_track_the_window() {
        let gl = HeadlessBackend::new();
        let recorder = gl.recorder();
        let mut surface =
            RenderSurface::initialize(gl, Viewport::new(800.0, 600.0, 1.0), 2.0, CLEAR).unwrap();

        let sizes = [(1024.0, 768.0), (640.0, 480.0), (1920.0, 1080.0), (375.0, 812.0)];
        for (w, h) in sizes {
            let mut seen = None;
            surface
                .resize(Viewport::new(w, h, 1.0), |_, size| seen = Some(size))
                .unwrap();
            let expected = SurfaceSize::new(w as u32, h as u32);
            assert_eq!(surface.size(), expected);
            assert_eq!(recorder.recording().size, expected);
            assert_eq!(seen, Some(expected));
        }
    }

    #[test]
    fn same_size_resize_is_cheap() {
        let gl = HeadlessBackend::new();
        let recorder = gl.recorder();
        let mut surface =
            RenderSurface::initialize(gl, Viewport::new(800.0, 600.0, 1.0), 2.0, CLEAR).unwrap();
        let before = recorder.recording().resizes;
        let mut called = false;
        surface
            .resize(Viewport::new(800.0, 600.0, 1.0), |_, _| called = true)
            .unwrap();
        assert!(!called);
        assert_eq!(recorder.recording().resizes, before);
    }

    #[test]
    fn bad_resize_keeps_previous_size() {
        let gl = HeadlessBackend::new();
        let mut surface =
            RenderSurface::initialize(gl, Viewport::new(800.0, 600.0, 1.0), 2.0, CLEAR).unwrap();
        let err = surface.resize(Viewport::new(-1.0, 600.0, 1.0), |_, _| {});
        assert!(matches!(err, Err(BackgroundError::ResizeHandling(_))));
        assert_eq!(surface.size(), SurfaceSize::new(800, 600));
    }

    #[test]
    fn render_clears_then_draws() {
        let gl = HeadlessBackend::new();
        let recorder = gl.recorder();
        let mut surface =
            RenderSurface::initialize(gl, Viewport::new(800.0, 600.0, 1.0), 2.0, CLEAR).unwrap();
        surface.render(|gl| gl.draw_fullscreen());
        let rec = recorder.recording();
        assert_eq!(rec.clears, 1);
        assert_eq!(rec.draws, 1);
    }

    #[test]
    fn dispose_is_idempotent_and_stops_rendering() {
        let gl = HeadlessBackend::new();
        let recorder = gl.recorder();
        let mut surface =
            RenderSurface::initialize(gl, Viewport::new(800.0, 600.0, 1.0), 2.0, CLEAR).unwrap();
        surface.dispose();
        surface.dispose();
        surface.render(|gl| gl.draw_fullscreen());
        let rec = recorder.recording();
        assert!(!rec.attached);
        assert_eq!(rec.detaches, 1);
        assert_eq!(rec.draws, 0);
    }
}
