//! Color themes and the transition controller that blends between them.
//!
//! A [`Theme`] is a closed set of named palettes. The [`ThemeController`]
//! owns the small amount of interpolation state an instance needs: where the
//! current transition started, where it is heading, and how far along it is.

use serde::{Deserialize, Serialize};

use crate::easing::Easing;

/// Default duration of a theme transition, in seconds
pub const THEME_TRANSITION_SECS: f32 = 0.5;

/// Linear RGB triple, components in [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        Rgb {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    /// Largest per-channel absolute difference.
    pub fn max_delta(self, other: Rgb) -> f32 {
        (self.r - other.r)
            .abs()
            .max((self.g - other.g).abs())
            .max((self.b - other.b).abs())
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// The colors a shader consumes for one theme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub accent: Rgb,
}

impl Palette {
    pub const fn from_hex(primary: u32, secondary: u32, accent: u32) -> Self {
        Self {
            primary: Rgb::from_hex(primary),
            secondary: Rgb::from_hex(secondary),
            accent: Rgb::from_hex(accent),
        }
    }

    pub fn lerp(&self, other: &Palette, t: f32) -> Palette {
        Palette {
            primary: self.primary.lerp(other.primary, t),
            secondary: self.secondary.lerp(other.secondary, t),
            accent: self.accent.lerp(other.accent, t),
        }
    }

    pub fn max_delta(&self, other: &Palette) -> f32 {
        self.primary
            .max_delta(other.primary)
            .max(self.secondary.max_delta(other.secondary))
            .max(self.accent.max_delta(other.accent))
    }
}

const PURPLE: Palette = Palette::from_hex(0xa78bfa, 0x6d28d9, 0xf472b6);
const BLUE: Palette = Palette::from_hex(0x3b82f6, 0x1d4ed8, 0x60a5fa);
const FOREST: Palette = Palette::from_hex(0x22c55e, 0x16a34a, 0x4ade80);
const GOLD: Palette = Palette::from_hex(0xf59e0b, 0xd97706, 0xfbbf24);

/// Available color themes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Theme {
    #[default]
    Purple,
    Blue,
    Forest,
    Gold,
}

impl Theme {
    pub fn all() -> &'static [Theme] {
        &[Theme::Purple, Theme::Blue, Theme::Forest, Theme::Gold]
    }

    pub fn id(&self) -> &'static str {
        match self {
            Theme::Purple => "purple",
            Theme::Blue => "blue",
            Theme::Forest => "forest",
            Theme::Gold => "gold",
        }
    }

    /// Parse from string ID, case-insensitive
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_lowercase().as_str() {
            "purple" => Some(Theme::Purple),
            "blue" => Some(Theme::Blue),
            "forest" => Some(Theme::Forest),
            "gold" => Some(Theme::Gold),
            _ => None,
        }
    }

    /// Parse from string ID, falling back to the default theme.
    pub fn from_id_or_default(id: &str) -> Self {
        Self::from_id(id).unwrap_or_else(|| {
            log::warn!("unknown theme {:?}, using {}", id, Theme::default().id());
            Theme::default()
        })
    }

    pub fn palette(&self) -> Palette {
        match self {
            Theme::Purple => PURPLE,
            Theme::Blue => BLUE,
            Theme::Forest => FOREST,
            Theme::Gold => GOLD,
        }
    }
}

impl From<String> for Theme {
    fn from(id: String) -> Self {
        Theme::from_id_or_default(&id)
    }
}

/// In-flight blend between two palettes.
#[derive(Clone, Copy, Debug)]
struct Transition {
    from: Palette,
    elapsed: f32,
}

/// Blends the displayed palette toward the selected theme.
#[derive(Clone, Debug)]
pub struct ThemeController {
    target: Theme,
    duration: f32,
    easing: Easing,
    transition: Option<Transition>,
}

impl ThemeController {
    pub fn new(theme: Theme, duration_secs: f32, easing: Easing) -> Self {
        Self {
            target: theme,
            duration: duration_secs.max(0.0),
            easing,
            transition: None,
        }
    }

    pub fn theme(&self) -> Theme {
        self.target
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Linear progress of the running transition; 1.0 once settled.
    pub fn progress(&self) -> f32 {
        match self.transition {
            Some(t) => linear_progress(self.duration, t.elapsed),
            None => 1.0,
        }
    }

    /// Retarget to `theme`, starting from whatever is on screen right now.
    pub fn set_theme(&mut self, theme: Theme) {
        if theme == self.target && self.transition.is_none() {
            return;
        }
        let from = self.current_colors();
        self.target = theme;
        self.transition = Some(Transition { from, elapsed: 0.0 });
        log::debug!("theme transition to {} over {}s", theme.id(), self.duration);
    }

    /// Advance the running transition by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        let duration = self.duration;
        if let Some(t) = self.transition.as_mut() {
            t.elapsed += dt.max(0.0);
            if linear_progress(duration, t.elapsed) >= 1.0 {
                self.transition = None;
            }
        }
    }

    /// Colors currently on screen.
    pub fn current_colors(&self) -> Palette {
        match self.transition {
            Some(t) => self.colors_at(t.elapsed),
            None => self.target.palette(),
        }
    }

    /// Colors `elapsed_since_change` seconds into the running transition.
    pub fn colors_at(&self, elapsed_since_change: f32) -> Palette {
        let target = self.target.palette();
        let Some(t) = self.transition else {
            return target;
        };
        let progress = linear_progress(self.duration, elapsed_since_change);
        if progress >= 1.0 {
            return target;
        }
        t.from.lerp(&target, self.easing.apply(progress))
    }

}

fn linear_progress(duration: f32, elapsed: f32) -> f32 {
    if duration <= 0.0 {
        return 1.0;
    }
    (elapsed.max(0.0) / duration).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_theme_default() {
        assert_eq!(Theme::default(), Theme::Purple);
    }

    #[test]
    fn purple_primary_matches_site_palette() {
        let p = Theme::Purple.palette().primary;
        assert!(approx(p.r, 0.65) && approx(p.g, 0.55) && approx(p.b, 0.98), "{:?}", p);
    }

    #[test]
    fn every_theme_has_a_distinct_palette() {
        let all = Theme::all();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.palette(), b.palette());
            }
        }
    }

    #[test]
    fn test_theme_from_id_case_insensitive() {
        assert_eq!(Theme::from_id("GOLD"), Some(Theme::Gold));
        assert_eq!(Theme::from_id(" forest "), Some(Theme::Forest));
        assert_eq!(Theme::from_id("teal"), None);
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        assert_eq!(Theme::from_id_or_default("teal"), Theme::Purple);
        let parsed: Theme = serde_json::from_str("\"crimson\"").unwrap();
        assert_eq!(parsed, Theme::Purple);
    }

    #[test]
    fn test_theme_roundtrip() {
        for theme in Theme::all() {
            let json = serde_json::to_string(theme).unwrap();
            assert_eq!(json, format!("\"{}\"", theme.id()));
            let back: Theme = serde_json::from_str(&json).unwrap();
            assert_eq!(back, *theme);
        }
    }

    #[test]
    fn settled_controller_reports_target_palette() {
        let ctl = ThemeController::new(Theme::Blue, 0.5, Easing::EaseOutCubic);
        assert!(!ctl.is_transitioning());
        assert_eq!(ctl.current_colors(), Theme::Blue.palette());
        assert_eq!(ctl.progress(), 1.0);
    }

    #[test]
    fn transition_boundaries_are_exact() {
        let mut ctl = ThemeController::new(Theme::Purple, 0.5, Easing::EaseOutCubic);
        ctl.set_theme(Theme::Gold);

        assert_eq!(ctl.colors_at(0.0), Theme::Purple.palette());
        assert_eq!(ctl.colors_at(0.5), Theme::Gold.palette());
        assert_eq!(ctl.colors_at(10.0), Theme::Gold.palette());
    }

    #[test]
    fn transition_settles_and_holds() {
        let mut ctl = ThemeController::new(Theme::Purple, 0.5, Easing::Linear);
        ctl.set_theme(Theme::Forest);
        for _ in 0..60 {
            ctl.advance(FRAME);
            assert!(ctl.progress() <= 1.0);
        }
        assert!(!ctl.is_transitioning());
        assert_eq!(ctl.progress(), 1.0);
        assert_eq!(ctl.current_colors(), Theme::Forest.palette());
    }

    #[test]
    fn advance_ends_transition_at_its_duration() {
        let mut ctl = ThemeController::new(Theme::Blue, 0.5, Easing::EaseOutCubic);
        ctl.set_theme(Theme::Gold);
        ctl.advance(0.25);
        assert!(ctl.is_transitioning());
        assert!(approx(ctl.progress(), 0.5));
        ctl.advance(0.25);
        assert!(!ctl.is_transitioning());
        assert_eq!(ctl.current_colors(), Theme::Gold.palette());
        ctl.advance(-1.0);
        assert_eq!(ctl.progress(), 1.0);
    }

    #[test]
    fn linear_midpoint_is_halfway() {
        let mut ctl = ThemeController::new(Theme::Purple, 1.0, Easing::Linear);
        ctl.set_theme(Theme::Blue);
        let mid = ctl.colors_at(0.5);
        let expected = Theme::Purple.palette().lerp(&Theme::Blue.palette(), 0.5);
        assert!(mid.max_delta(&expected) < 1e-6);
    }

    #[test]
    fn setting_settled_theme_is_noop() {
        let mut ctl = ThemeController::new(Theme::Gold, 0.5, Easing::Linear);
        ctl.set_theme(Theme::Gold);
        assert!(!ctl.is_transitioning());
    }

    #[test]
    fn zero_duration_switches_immediately() {
        let mut ctl = ThemeController::new(Theme::Purple, 0.0, Easing::Linear);
        ctl.set_theme(Theme::Blue);
        assert_eq!(ctl.current_colors(), Theme::Blue.palette());
        ctl.advance(0.0);
        assert!(!ctl.is_transitioning());
    }

    #[test]
    fn retarget_mid_transition_has_no_pop() {
        let duration = 0.5;
        let easing = Easing::EaseOutCubic;
        let mut ctl = ThemeController::new(Theme::Purple, duration, easing);
        ctl.set_theme(Theme::Gold);

        // Largest color change any single frame may produce.
        let max_step = easing.max_slope() * FRAME / duration + 1e-4;

        let mut prev = ctl.current_colors();
        for frame in 0..60 {
            if frame == 10 {
                ctl.set_theme(Theme::Forest);
                // Retargeting alone must not move the displayed color.
                assert_eq!(ctl.current_colors(), prev);
            }
            if frame == 20 {
                ctl.set_theme(Theme::Blue);
                assert_eq!(ctl.current_colors(), prev);
            }
            ctl.advance(FRAME);
            let now = ctl.current_colors();
            assert!(
                now.max_delta(&prev) <= max_step,
                "frame {} jumped by {}",
                frame,
                now.max_delta(&prev)
            );
            prev = now;
        }
        assert_eq!(ctl.current_colors(), Theme::Blue.palette());
    }
}
