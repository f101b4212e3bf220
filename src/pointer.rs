//! Pointer position shared with parallax-enabled backgrounds.
//!
//! A single [`PointerHub`] is fed by one global listener. Backgrounds hold a
//! [`PointerReader`], which can observe the position but never change it.

use std::cell::Cell;
use std::rc::Rc;

/// Pointer position in normalized device coordinates, both axes in [-1, 1],
/// +y up.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerPosition {
    pub x: f32,
    pub y: f32,
}

impl PointerPosition {
    /// Convert client pixel coordinates inside a `width` × `height` viewport.
    pub fn from_client(client_x: f64, client_y: f64, width: f64, height: f64) -> Self {
        if !(width > 0.0 && height > 0.0) {
            return Self::default();
        }
        let x = (client_x / width) * 2.0 - 1.0;
        let y = -((client_y / height) * 2.0 - 1.0);
        Self {
            x: (x as f32).clamp(-1.0, 1.0),
            y: (y as f32).clamp(-1.0, 1.0),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PointerHub {
    position: Rc<Cell<PointerPosition>>,
}

impl PointerHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, position: PointerPosition) {
        self.position.set(position);
    }

    pub fn reader(&self) -> PointerReader {
        PointerReader {
            position: Rc::clone(&self.position),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PointerReader {
    position: Rc<Cell<PointerPosition>>,
}

impl PointerReader {
    pub fn get(&self) -> PointerPosition {
        self.position.get()
    }
}

/// Smoothly follows the pointer. `follow` is the fraction of the remaining
/// distance covered per 60 Hz frame; other frame rates are compensated.
#[derive(Clone, Debug)]
pub struct Parallax {
    current: PointerPosition,
    follow: f32,
}

impl Parallax {
    pub fn new(follow: f32) -> Self {
        Self {
            current: PointerPosition::default(),
            follow: follow.clamp(0.0, 1.0),
        }
    }

    pub fn current(&self) -> PointerPosition {
        self.current
    }

    pub fn advance(&mut self, target: PointerPosition, dt: f32) -> PointerPosition {
        let frames = dt.max(0.0) * 60.0;
        let k = 1.0 - (1.0 - self.follow).powf(frames);
        self.current.x += (target.x - self.current.x) * k;
        self.current.y += (target.y - self.current.y) * k;
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_coordinates_map_to_ndc() {
        let center = PointerPosition::from_client(400.0, 300.0, 800.0, 600.0);
        assert!(center.x.abs() < 1e-6 && center.y.abs() < 1e-6);

        let top_left = PointerPosition::from_client(0.0, 0.0, 800.0, 600.0);
        assert_eq!(top_left, PointerPosition { x: -1.0, y: 1.0 });
    }

    #[test]
    fn degenerate_viewport_reports_center() {
        let p = PointerPosition::from_client(10.0, 10.0, 0.0, 600.0);
        assert_eq!(p, PointerPosition::default());
    }

    #[test]
    fn readers_observe_published_position() {
        let hub = PointerHub::new();
        let a = hub.reader();
        let b = hub.reader();
        hub.publish(PointerPosition { x: 0.5, y: -0.25 });
        assert_eq!(a.get(), b.get());
        assert_eq!(a.get().x, 0.5);
    }

    #[test]
    fn parallax_converges_without_overshoot() {
        let mut parallax = Parallax::new(0.025);
        let target = PointerPosition { x: 1.0, y: -1.0 };
        let mut last = 0.0;
        for _ in 0..600 {
            let p = parallax.advance(target, 1.0 / 60.0);
            assert!(p.x >= last && p.x <= 1.0);
            last = p.x;
        }
        assert!((parallax.current().x - 1.0).abs() < 1e-3);
    }

    #[test]
    fn parallax_is_frame_rate_independent() {
        let target = PointerPosition { x: 1.0, y: 0.0 };
        let mut at_60 = Parallax::new(0.025);
        let mut at_30 = Parallax::new(0.025);
        for _ in 0..60 {
            at_60.advance(target, 1.0 / 60.0);
        }
        for _ in 0..30 {
            at_30.advance(target, 1.0 / 30.0);
        }
        assert!((at_60.current().x - at_30.current().x).abs() < 1e-3);
    }
}
