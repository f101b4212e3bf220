use web_sys::{Performance, Window};

use crate::clock::Clock;

/// `performance.now()` in seconds, falling back to `Date.now()`.
pub struct PerformanceClock {
    performance: Option<Performance>,
}

impl PerformanceClock {
    pub fn new(window: &Window) -> Self {
        Self {
            performance: window.performance(),
        }
    }
}

impl Clock for PerformanceClock {
    fn now_secs(&self) -> f64 {
        match &self.performance {
            Some(performance) => performance.now() / 1000.0,
            None => js_sys::Date::now() / 1000.0,
        }
    }
}
