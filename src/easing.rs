//! Easing curves for theme transitions and scroll smoothing

use serde::{Deserialize, Serialize};

/// Named easing curve, selectable from the page configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    /// Power-2 ease-out
    EaseOutQuad,
    #[default]
    EaseOutCubic,
    EaseInOut,
}

impl Easing {
    /// Map linear progress `t` to eased progress. `t` is clamped to [0, 1].
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOutQuad => ease_out_quad(t),
            Easing::EaseOutCubic => ease_out_cubic(t),
            Easing::EaseInOut => ease_in_out(t),
        }
    }

    /// Upper bound of the curve's slope over [0, 1].
    pub fn max_slope(self) -> f32 {
        match self {
            Easing::Linear => 1.0,
            Easing::EaseOutQuad => 2.0,
            Easing::EaseOutCubic => 3.0,
            Easing::EaseInOut => 3.0,
        }
    }
}

#[inline]
pub fn ease_out_quad(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Ease-in-out cubic
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}
