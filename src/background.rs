//! The composition root: one animated shader background.

use crate::animation::{AnimationLoop, FrameScheduler, LoopState};
use crate::backend::{GraphicsBackend, SurfaceSize};
use crate::clock::{AnimationClock, Clock};
use crate::config::BackgroundConfig;
use crate::error::{BackgroundError, BackgroundResult};
use crate::pointer::{Parallax, PointerReader};
use crate::program::ShaderProgram;
use crate::scroll::{ScrollFeed, ScrollTween};
use crate::state::{self, AnimationState, FrameInputs};
use crate::surface::{RenderSurface, Viewport};
use crate::theme::{Palette, Theme, ThemeController};
use crate::uniforms::{FrameUniforms, ResolvedUniforms, UniformBinder};

/// Graphics resources that exist only after a successful mount.
struct Gpu<B: GraphicsBackend> {
    surface: RenderSurface<B>,
    program: ShaderProgram<B>,
    slots: ResolvedUniforms<B::Location>,
}

impl<B: GraphicsBackend> Gpu<B> {
    fn build(gl: B, config: &BackgroundConfig, viewport: Viewport) -> BackgroundResult<Self> {
        let mut surface = RenderSurface::initialize(
            gl,
            config_viewport(config, viewport),
            config.max_pixel_ratio,
            config.clear_color,
        )?;

        let variant = config.variant;
        let names = variant.uniform_names();
        // A failure here drops `surface`, which detaches the canvas again.
        let program = ShaderProgram::compile(
            surface.gl(),
            variant.vertex_source(),
            variant.fragment_source(),
            &names.declared(),
        )?;
        let slots = ResolvedUniforms::resolve(&program, names);

        let size = surface.size();
        let gl = surface.gl();
        program.use_program(gl);
        UniformBinder::new(gl).bind_size(&slots, size);
        log::info!(
            "{} background mounted at {}x{} ({} active uniforms)",
            variant.id(),
            size.width,
            size.height,
            program.active_uniforms()
        );
        Ok(Self {
            surface,
            program,
            slots,
        })
    }

    fn dispose(mut self) {
        self.program.dispose(self.surface.gl());
        self.surface.dispose();
    }
}

/// An explicit configured size replaces the viewport's CSS size.
fn config_viewport(config: &BackgroundConfig, viewport: Viewport) -> Viewport {
    match config.size {
        Some(size) => Viewport::new(size.width, size.height, viewport.pixel_ratio),
        None => viewport,
    }
}

/// A full-surface shader background driven by time, scroll and theme.
///
/// Mounting never fails outward: when the surface or the program cannot be
/// created the error is logged and kept in [`error`](Self::error), and the
/// instance stays `Stopped` without drawing. Use
/// [`try_mount`](Self::try_mount) to observe the failure directly.
pub struct AnimatedShaderBackground<B, S, C>
where
    B: GraphicsBackend,
    S: FrameScheduler,
    C: Clock,
{
    config: BackgroundConfig,
    gpu: Option<Gpu<B>>,
    anim: AnimationLoop<S>,
    clock: C,
    animation_clock: AnimationClock,
    theme: ThemeController,
    scroll_feed: ScrollFeed,
    scroll: ScrollTween,
    pointer: Option<PointerReader>,
    parallax: Parallax,
    state: AnimationState,
    error: Option<BackgroundError>,
}

impl<B, S, C> AnimatedShaderBackground<B, S, C>
where
    B: GraphicsBackend,
    S: FrameScheduler,
    C: Clock,
{
    pub fn mount(gl: B, scheduler: S, clock: C, config: BackgroundConfig, viewport: Viewport) -> Self {
        let config = config.sanitized();
        let mut animation_clock = AnimationClock::with_rebase(
            clock.now_secs(),
            config.rebase_threshold_secs,
            config.rebase_period_secs,
        );
        // Prime the clock so the first frame's step covers time since mount.
        animation_clock.sample(clock.now_secs());

        let mut background = Self {
            gpu: None,
            anim: AnimationLoop::new(scheduler),
            clock,
            animation_clock,
            theme: ThemeController::new(config.theme, config.transition_secs, config.easing),
            scroll_feed: ScrollFeed::new(config.scroll_progress),
            scroll: ScrollTween::new(config.scroll_progress, config.scroll_smoothing_secs),
            pointer: None,
            parallax: Parallax::new(config.parallax.follow),
            state: AnimationState::new(config.scroll_progress),
            error: None,
            config,
        };

        match Gpu::build(gl, &background.config, viewport) {
            Ok(gpu) => {
                background.gpu = Some(gpu);
                if let Err(err) = background.anim.start() {
                    background.fail(err);
                }
            }
            Err(err) => background.fail(err),
        }
        background
    }

    /// Like [`mount`](Self::mount), but hands back the mount failure.
    pub fn try_mount(
        gl: B,
        scheduler: S,
        clock: C,
        config: BackgroundConfig,
        viewport: Viewport,
    ) -> BackgroundResult<Self> {
        let mut background = Self::mount(gl, scheduler, clock, config, viewport);
        match background.error.take() {
            Some(err) => Err(err),
            None => Ok(background),
        }
    }

    fn fail(&mut self, err: BackgroundError) {
        match &err {
            BackgroundError::SurfaceInit(_) => log::warn!("background disabled: {}", err),
            _ => log::error!("background disabled: {}", err),
        }
        self.anim.stop();
        if let Some(gpu) = self.gpu.take() {
            gpu.dispose();
        }
        self.error = Some(err);
    }

    /// Run one animation frame: sample time and inputs, advance the state,
    /// bind every uniform, draw, and schedule the next frame.
    ///
    /// Does nothing unless the loop is running, so a callback that fires
    /// after teardown is harmless.
    pub fn frame(&mut self) {
        if !self.anim.is_running() || self.gpu.is_none() {
            return;
        }

        let (elapsed, dt) = self.animation_clock.sample(self.clock.now_secs());
        let dt = dt as f32;

        self.theme.advance(dt);
        self.scroll.retarget(self.scroll_feed.get());
        let scroll_progress = self.scroll.advance(dt);
        let pointer = match (&self.pointer, self.config.parallax.enabled) {
            (Some(reader), true) => self.parallax.advance(reader.get(), dt),
            _ => self.parallax.current(),
        };
        state::advance(
            &mut self.state,
            &FrameInputs {
                elapsed,
                scroll_progress,
                theme_progress: self.theme.progress(),
                pointer,
            },
        );

        let frame = self.frame_uniforms();
        if let Some(Gpu {
            surface,
            program,
            slots,
        }) = self.gpu.as_mut()
        {
            surface.render(|gl| {
                program.use_program(gl);
                UniformBinder::new(gl).bind_frame(slots, &frame);
                gl.draw_fullscreen();
            });
        }

        if let Err(err) = self.anim.schedule_next() {
            log::error!("animation loop stopped: {}", err);
            self.error = Some(err);
        }
    }

    fn frame_uniforms(&self) -> FrameUniforms {
        let progress = self.state.scroll_progress;
        FrameUniforms {
            time: self.state.time(),
            scroll_progress: progress,
            colors: self.theme.current_colors(),
            turbulence: self.config.turbulence.at(progress),
            intensity: self.config.intensity.at(progress),
            pointer: [self.state.pointer.x, self.state.pointer.y],
            speed: self.config.speed,
            seed: self.config.seed,
            scale: self.config.scale,
            column_width: self.config.column_width,
            opacity: self.config.opacity,
            debug: self.config.debug,
        }
    }

    /// Follow a new viewport. Invalid sizes skip this tick.
    pub fn resize(&mut self, viewport: Viewport) {
        let viewport = config_viewport(&self.config, viewport);
        let Some(Gpu {
            surface,
            program,
            slots,
        }) = self.gpu.as_mut()
        else {
            return;
        };
        let resized = surface.resize(viewport, |gl, size| {
            program.use_program(gl);
            UniformBinder::new(gl).bind_size(slots, size);
        });
        match resized {
            Err(err) if err.is_transient() => log::debug!("resize skipped: {}", err),
            Err(err) => log::warn!("resize failed: {}", err),
            Ok(_) => {}
        }
    }

    /// Tab visibility changed. Coming back rebases the clock instead of
    /// replaying the hidden interval.
    pub fn on_visibility_change(&mut self, visible: bool) {
        if !visible {
            return;
        }
        let now = self.clock.now_secs();
        self.animation_clock.rebase_at(now);
        self.animation_clock.resume();
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme.set_theme(theme);
    }

    /// Set the theme by name; unknown names select the default theme.
    pub fn set_theme_by_name(&mut self, name: &str) {
        self.set_theme(Theme::from_id_or_default(name));
    }

    pub fn set_scroll_progress(&mut self, progress: f32) {
        self.scroll_feed.set(progress);
    }

    /// Read scroll progress from `feed` from now on.
    pub fn attach_scroll_feed(&mut self, feed: ScrollFeed) {
        self.scroll_feed = feed;
    }

    /// The feed this background currently reads scroll progress from.
    pub fn scroll_feed(&self) -> ScrollFeed {
        self.scroll_feed.clone()
    }

    pub fn attach_pointer(&mut self, reader: PointerReader) {
        self.pointer = Some(reader);
    }

    /// Stop the loop and release every graphics resource. Idempotent.
    pub fn unmount(&mut self) {
        self.anim.stop();
        if let Some(gpu) = self.gpu.take() {
            gpu.dispose();
            log::debug!("background unmounted after {} frames", self.state.frames);
        }
    }

    pub fn is_running(&self) -> bool {
        self.anim.is_running()
    }

    pub fn loop_state(&self) -> LoopState {
        self.anim.state()
    }

    pub fn is_mounted(&self) -> bool {
        self.gpu.is_some()
    }

    pub fn surface_size(&self) -> Option<SurfaceSize> {
        self.gpu.as_ref().map(|gpu| gpu.surface.size())
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn theme(&self) -> Theme {
        self.theme.theme()
    }

    pub fn current_colors(&self) -> Palette {
        self.theme.current_colors()
    }

    pub fn config(&self) -> &BackgroundConfig {
        &self.config
    }

    /// Why the background is not drawing, if it failed.
    pub fn error(&self) -> Option<&BackgroundError> {
        self.error.as_ref()
    }

    pub fn clock_rebases(&self) -> u32 {
        self.animation_clock.rebases()
    }
}

impl<B, S, C> Drop for AnimatedShaderBackground<B, S, C>
where
    B: GraphicsBackend,
    S: FrameScheduler,
    C: Clock,
{
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FixedSize;
    use crate::headless::{HeadlessBackend, ManualClock, ManualScheduler};
    use crate::variant::ShaderVariant;

    type Headless = AnimatedShaderBackground<HeadlessBackend, ManualScheduler, ManualClock>;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0, 1.0)
    }

    fn mount(config: BackgroundConfig) -> (Headless, ManualScheduler, ManualClock) {
        let scheduler = ManualScheduler::new();
        let clock = ManualClock::new(100.0);
        let bg = Headless::mount(
            HeadlessBackend::new(),
            scheduler.clone(),
            clock.clone(),
            config,
            viewport(),
        );
        (bg, scheduler, clock)
    }

    #[test]
    fn mount_starts_the_loop() {
        let (bg, scheduler, _) = mount(BackgroundConfig::default());
        assert!(bg.is_running());
        assert!(bg.is_mounted());
        assert!(scheduler.is_pending());
        assert_eq!(bg.surface_size(), Some(SurfaceSize::new(800, 600)));
    }

    #[test]
    fn frame_advances_elapsed_from_clock() {
        let (mut bg, scheduler, clock) = mount(BackgroundConfig::default());
        clock.advance(0.25);
        assert!(scheduler.take_pending());
        bg.frame();
        assert!((bg.state().elapsed - 0.25).abs() < 1e-9);
        assert_eq!(bg.state().frames, 1);
        assert!(scheduler.is_pending());
    }

    #[test]
    fn frames_after_unmount_do_nothing() {
        let (mut bg, scheduler, _) = mount(BackgroundConfig::default());
        bg.unmount();
        bg.frame();
        assert_eq!(bg.state().frames, 0);
        assert!(!scheduler.is_pending());
        assert!(!bg.is_mounted());
        bg.unmount();
    }

    #[test]
    fn fixed_size_ignores_viewport() {
        let config = BackgroundConfig {
            size: Some(FixedSize {
                width: 300.0,
                height: 200.0,
            }),
            ..BackgroundConfig::default()
        };
        let (mut bg, _, _) = mount(config);
        assert_eq!(bg.surface_size(), Some(SurfaceSize::new(300, 200)));
        bg.resize(Viewport::new(1920.0, 1080.0, 2.0));
        assert_eq!(bg.surface_size(), Some(SurfaceSize::new(600, 400)));
    }

    #[test]
    fn set_scroll_progress_is_clamped_and_smoothed() {
        let (mut bg, scheduler, clock) = mount(BackgroundConfig::default());
        bg.set_scroll_progress(3.0);
        assert_eq!(bg.scroll_feed().get(), 1.0);

        scheduler.take_pending();
        clock.advance(0.1);
        bg.frame();
        let partway = bg.state().scroll_progress;
        assert!(partway > 0.0 && partway < 1.0);

        scheduler.take_pending();
        clock.advance(1.0);
        bg.frame();
        assert_eq!(bg.state().scroll_progress, 1.0);
    }

    #[test]
    fn unknown_theme_name_selects_default() {
        let (mut bg, _, _) = mount(BackgroundConfig::default().with_theme(Theme::Blue));
        bg.set_theme_by_name("teal");
        assert_eq!(bg.theme(), Theme::Purple);
    }

    #[test]
    fn try_mount_surfaces_compile_errors() {
        let mut gl = HeadlessBackend::new();
        gl.fail_compile(crate::error::ShaderStage::Fragment, "syntax error");
        let result = Headless::try_mount(
            gl,
            ManualScheduler::new(),
            ManualClock::new(0.0),
            BackgroundConfig::default().with_variant(ShaderVariant::Plasma),
            viewport(),
        );
        assert!(matches!(result, Err(BackgroundError::ShaderCompile { .. })));
    }
}
