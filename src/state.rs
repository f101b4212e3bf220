//! Per-instance animation state and the pure per-frame update.

use crate::pointer::PointerPosition;
use crate::scroll::clamp_progress;

/// Inputs sampled at the start of a frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInputs {
    /// Rebased elapsed seconds from the animation clock
    pub elapsed: f64,
    /// Scroll progress as delivered by the page (not yet clamped)
    pub scroll_progress: f32,
    /// Theme transition progress after this frame's advance
    pub theme_progress: f32,
    pub pointer: PointerPosition,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationState {
    pub elapsed: f64,
    pub scroll_progress: f32,
    pub theme_progress: f32,
    pub pointer: PointerPosition,
    pub frames: u64,
}

impl AnimationState {
    pub fn new(scroll_progress: f32) -> Self {
        Self {
            elapsed: 0.0,
            scroll_progress: clamp_progress(scroll_progress),
            theme_progress: 1.0,
            pointer: PointerPosition::default(),
            frames: 0,
        }
    }

    /// Shader time as f32.
    pub fn time(&self) -> f32 {
        self.elapsed as f32
    }
}

/// Fold one frame of inputs into the state.
pub fn advance(state: &mut AnimationState, inputs: &FrameInputs) {
    state.elapsed = inputs.elapsed;
    state.scroll_progress = clamp_progress(inputs.scroll_progress);
    state.theme_progress = inputs.theme_progress.clamp(0.0, 1.0);
    state.pointer = inputs.pointer;
    state.frames += 1;
}
