//! Scroll coupling between a host page and its backgrounds.
//!
//! The page owns the scroll position. It computes a normalized progress value
//! and hands it to backgrounds either directly or through a [`ScrollFeed`]
//! shared with every background on the page.

use std::cell::Cell;
use std::rc::Rc;

use crate::easing::Easing;

/// Clamp a progress value into [0, 1]. NaN maps to 0.
#[inline]
pub fn clamp_progress(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Normalized progress of a scrolled document.
///
/// `scroll_top` is the current offset, `scroll_height` the full document
/// height and `viewport_height` the visible height. Documents that do not
/// scroll report 0.
pub fn progress_from_offsets(scroll_top: f64, scroll_height: f64, viewport_height: f64) -> f32 {
    let range = scroll_height - viewport_height;
    if !(range > 0.0) {
        return 0.0;
    }
    clamp_progress((scroll_top / range) as f32)
}

/// Shared, clamped scroll progress written by the page and read by
/// backgrounds once per frame.
#[derive(Clone, Debug, Default)]
pub struct ScrollFeed {
    value: Rc<Cell<f32>>,
}

impl ScrollFeed {
    pub fn new(initial: f32) -> Self {
        Self {
            value: Rc::new(Cell::new(clamp_progress(initial))),
        }
    }

    pub fn set(&self, progress: f32) {
        self.value.set(clamp_progress(progress));
    }

    pub fn get(&self) -> f32 {
        self.value.get()
    }
}

/// Eases the bound scroll value toward the latest target so that coarse
/// scroll events do not step the shader.
#[derive(Clone, Debug)]
pub struct ScrollTween {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
    easing: Easing,
}

impl ScrollTween {
    pub fn new(initial: f32, duration_secs: f32) -> Self {
        let initial = clamp_progress(initial);
        Self {
            from: initial,
            to: initial,
            elapsed: 0.0,
            duration: duration_secs.max(0.0),
            easing: Easing::EaseOutQuad,
        }
    }

    pub fn value(&self) -> f32 {
        if self.duration <= 0.0 || self.elapsed >= self.duration {
            return self.to;
        }
        let t = self.easing.apply(self.elapsed / self.duration);
        clamp_progress(self.from + (self.to - self.from) * t)
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    /// Retarget, restarting from the current value.
    pub fn retarget(&mut self, target: f32) {
        let target = clamp_progress(target);
        if target == self.to {
            return;
        }
        self.from = self.value();
        self.to = target;
        self.elapsed = 0.0;
    }

    /// Jump to `value` without easing.
    pub fn snap(&mut self, value: f32) {
        let value = clamp_progress(value);
        self.from = value;
        self.to = value;
        self.elapsed = self.duration;
    }

    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        self.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_is_idempotent() {
        let inputs = [
            -1e9,
            -2.5,
            -0.0,
            0.0,
            0.3,
            1.0,
            1.0001,
            42.0,
            f32::INFINITY,
            f32::NEG_INFINITY,
            f32::NAN,
        ];
        for x in inputs {
            let once = clamp_progress(x);
            assert!((0.0..=1.0).contains(&once), "{} -> {}", x, once);
            assert_eq!(clamp_progress(once), once);
        }
    }

    #[test]
    fn progress_from_offsets_handles_short_pages() {
        assert_eq!(progress_from_offsets(0.0, 800.0, 800.0), 0.0);
        assert_eq!(progress_from_offsets(100.0, 600.0, 800.0), 0.0);
    }

    #[test]
    fn progress_from_offsets_spans_the_scroll_range() {
        assert_eq!(progress_from_offsets(0.0, 3000.0, 1000.0), 0.0);
        assert!((progress_from_offsets(1000.0, 3000.0, 1000.0) - 0.5).abs() < 1e-6);
        assert_eq!(progress_from_offsets(2000.0, 3000.0, 1000.0), 1.0);
        // Overscroll (rubber-banding) stays in range
        assert_eq!(progress_from_offsets(2300.0, 3000.0, 1000.0), 1.0);
        assert_eq!(progress_from_offsets(-40.0, 3000.0, 1000.0), 0.0);
    }

    #[test]
    fn feed_clamps_and_shares() {
        let feed = ScrollFeed::new(3.0);
        assert_eq!(feed.get(), 1.0);
        let reader = feed.clone();
        feed.set(-0.5);
        assert_eq!(reader.get(), 0.0);
        feed.set(0.25);
        assert_eq!(reader.get(), 0.25);
    }

    #[test]
    fn tween_reaches_target_after_duration() {
        let mut tween = ScrollTween::new(0.0, 0.5);
        tween.retarget(1.0);
        assert_eq!(tween.value(), 0.0);
        let mut last = 0.0;
        for _ in 0..30 {
            let v = tween.advance(1.0 / 60.0);
            assert!(v >= last);
            last = v;
        }
        tween.advance(1.0);
        assert_eq!(tween.value(), 1.0);
    }

    #[test]
    fn tween_retarget_starts_from_current_value() {
        let mut tween = ScrollTween::new(0.0, 0.5);
        tween.retarget(1.0);
        tween.advance(0.1);
        let before = tween.value();
        tween.retarget(0.2);
        assert_eq!(tween.value(), before);
    }

    #[test]
    fn zero_duration_tween_tracks_directly() {
        let mut tween = ScrollTween::new(0.0, 0.0);
        tween.retarget(0.7);
        assert_eq!(tween.value(), 0.7);
    }

    #[test]
    fn snap_skips_easing() {
        let mut tween = ScrollTween::new(0.0, 0.5);
        tween.snap(0.4);
        assert_eq!(tween.value(), 0.4);
        assert_eq!(tween.target(), 0.4);
    }
}
