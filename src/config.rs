//! Per-instance configuration accepted from the host page.

use serde::{Deserialize, Serialize};

use crate::clock::{REBASE_PERIOD_SECS, REBASE_THRESHOLD_SECS};
use crate::easing::Easing;
use crate::error::BackgroundResult;
use crate::scroll::clamp_progress;
use crate::theme::{Theme, THEME_TRANSITION_SECS};
use crate::variant::ShaderVariant;

/// A uniform that grows linearly with scroll progress.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrollResponse {
    pub base: f32,
    pub gain: f32,
}

impl ScrollResponse {
    pub const fn new(base: f32, gain: f32) -> Self {
        Self { base, gain }
    }

    pub fn at(&self, progress: f32) -> f32 {
        self.base + self.gain * clamp_progress(progress)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxConfig {
    pub enabled: bool,
    /// Fraction of the remaining distance covered per 60 Hz frame
    pub follow: f32,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            follow: 0.025,
        }
    }
}

/// Explicit surface size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FixedSize {
    pub width: f64,
    pub height: f64,
}

/// Background configuration. Every field has a default, so `{}` is valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub variant: ShaderVariant,
    pub theme: Theme,
    pub scroll_progress: f32,
    pub transition_secs: f32,
    pub easing: Easing,
    pub scroll_smoothing_secs: f32,
    pub turbulence: ScrollResponse,
    pub intensity: ScrollResponse,
    pub speed: f32,
    pub seed: f32,
    pub scale: f32,
    pub column_width: f32,
    pub opacity: f32,
    pub parallax: ParallaxConfig,
    pub max_pixel_ratio: f64,
    pub clear_color: [f32; 4],
    pub size: Option<FixedSize>,
    pub rebase_threshold_secs: f64,
    pub rebase_period_secs: f64,
    pub debug: bool,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            variant: ShaderVariant::default(),
            theme: Theme::default(),
            scroll_progress: 0.0,
            transition_secs: THEME_TRANSITION_SECS,
            easing: Easing::default(),
            scroll_smoothing_secs: 0.5,
            turbulence: ScrollResponse::new(0.3, 0.4),
            intensity: ScrollResponse::new(0.8, 0.4),
            speed: 0.05,
            seed: 0.176,
            scale: 0.15,
            column_width: 1.5,
            opacity: 1.0,
            parallax: ParallaxConfig::default(),
            max_pixel_ratio: 2.0,
            clear_color: [0.0, 0.0, 0.0, 0.0],
            size: None,
            rebase_threshold_secs: REBASE_THRESHOLD_SECS,
            rebase_period_secs: REBASE_PERIOD_SECS,
            debug: false,
        }
    }
}

impl BackgroundConfig {
    pub fn from_json(json: &str) -> BackgroundResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    pub fn with_variant(mut self, variant: ShaderVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_scroll_progress(mut self, progress: f32) -> Self {
        self.scroll_progress = clamp_progress(progress);
        self
    }

    /// Clamp values that would otherwise poison the frame math.
    pub fn sanitized(mut self) -> Self {
        self.scroll_progress = clamp_progress(self.scroll_progress);
        if self.transition_secs.is_nan() || self.transition_secs < 0.0 {
            self.transition_secs = THEME_TRANSITION_SECS;
        }
        if self.scroll_smoothing_secs.is_nan() || self.scroll_smoothing_secs < 0.0 {
            self.scroll_smoothing_secs = 0.0;
        }
        if self.max_pixel_ratio.is_nan() || self.max_pixel_ratio < 1.0 {
            self.max_pixel_ratio = 1.0;
        }
        self.opacity = if self.opacity.is_nan() { 1.0 } else { self.opacity.clamp(0.0, 1.0) };
        self.parallax.follow = if self.parallax.follow.is_nan() {
            ParallaxConfig::default().follow
        } else {
            self.parallax.follow.clamp(0.0, 1.0)
        };
        if !self.variant.is_periodic_in(self.rebase_period_secs) {
            log::warn!(
                "rebase period {}s does not repeat {}; using {}s",
                self.rebase_period_secs,
                self.variant.id(),
                REBASE_PERIOD_SECS
            );
            self.rebase_period_secs = REBASE_PERIOD_SECS;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = BackgroundConfig::from_json("{}").unwrap();
        assert_eq!(config, BackgroundConfig::default());
        assert_eq!(config.theme, Theme::Purple);
        assert_eq!(config.scroll_progress, 0.0);
        assert_eq!(config.transition_secs, 0.5);
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let config = BackgroundConfig::from_json(
            r#"{"variant":"dripping-fluid","theme":"forest","seed":0.5,"parallax":{"enabled":true}}"#,
        )
        .unwrap();
        assert_eq!(config.variant, ShaderVariant::DrippingFluid);
        assert_eq!(config.theme, Theme::Forest);
        assert_eq!(config.seed, 0.5);
        assert!(config.parallax.enabled);
        assert_eq!(config.parallax.follow, 0.025);
        assert_eq!(config.speed, 0.05);
    }

    #[test]
    fn unknown_theme_in_json_falls_back() {
        let config = BackgroundConfig::from_json(r#"{"theme":"magenta"}"#).unwrap();
        assert_eq!(config.theme, Theme::Purple);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = BackgroundConfig::from_json("{theme:").unwrap_err();
        assert!(matches!(err, crate::error::BackgroundError::Config(_)));
    }

    #[test]
    fn sanitize_clamps_out_of_range_values() {
        let config = BackgroundConfig::from_json(
            r#"{"scroll_progress":3.0,"transition_secs":-1.0,"max_pixel_ratio":0.2,"opacity":4.0}"#,
        )
        .unwrap();
        assert_eq!(config.scroll_progress, 1.0);
        assert_eq!(config.transition_secs, THEME_TRANSITION_SECS);
        assert_eq!(config.max_pixel_ratio, 1.0);
        assert_eq!(config.opacity, 1.0);
    }

    #[test]
    fn rebase_period_must_repeat_the_shader() {
        let config = BackgroundConfig::from_json(r#"{"rebase_period_secs":100.0}"#).unwrap();
        assert_eq!(config.rebase_period_secs, REBASE_PERIOD_SECS);

        let triple = 3.0 * REBASE_PERIOD_SECS;
        let config = BackgroundConfig {
            rebase_period_secs: triple,
            ..BackgroundConfig::default()
        }
        .sanitized();
        assert_eq!(config.rebase_period_secs, triple);
    }

    #[test]
    fn scroll_response_baseline_and_peak() {
        let config = BackgroundConfig::default();
        assert_eq!(config.turbulence.at(0.0), 0.3);
        assert!((config.turbulence.at(1.0) - 0.7).abs() < 1e-6);
        assert_eq!(config.intensity.at(0.0), 0.8);
        assert!((config.intensity.at(5.0) - 1.2).abs() < 1e-6);
    }

    #[test]
    fn builders_set_fields() {
        let config = BackgroundConfig::default()
            .with_variant(ShaderVariant::Plasma)
            .with_theme(Theme::Gold)
            .with_scroll_progress(-2.0);
        assert_eq!(config.variant, ShaderVariant::Plasma);
        assert_eq!(config.theme, Theme::Gold);
        assert_eq!(config.scroll_progress, 0.0);
    }
}
