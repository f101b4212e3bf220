//! Monotonic time source and the rebasing elapsed-time accumulator.

use std::f64::consts::PI;

/// Elapsed seconds above which the clock is rebased.
pub const REBASE_THRESHOLD_SECS: f64 = 1.0e6;

/// Rebase step. Every angular frequency that is a multiple of 0.1 rad/s
/// completes a whole number of cycles in this span.
pub const REBASE_PERIOD_SECS: f64 = 20.0 * PI;

/// Monotonic time in seconds.
pub trait Clock {
    fn now_secs(&self) -> f64;
}

/// Converts raw clock readings into shader time.
///
/// Elapsed time is `now - start`. Once it grows past the threshold, `start`
/// moves forward by whole rebase periods, which leaves every periodic
/// function of time with a period dividing the rebase period unchanged.
#[derive(Clone, Debug)]
pub struct AnimationClock {
    start: f64,
    last_now: Option<f64>,
    last_elapsed: f64,
    threshold: f64,
    period: f64,
    rebases: u32,
}

impl AnimationClock {
    pub fn new(start: f64) -> Self {
        Self::with_rebase(start, REBASE_THRESHOLD_SECS, REBASE_PERIOD_SECS)
    }

    pub fn with_rebase(start: f64, threshold: f64, period: f64) -> Self {
        let period = if period > 0.0 && period.is_finite() {
            period
        } else {
            REBASE_PERIOD_SECS
        };
        let threshold = if threshold > 0.0 { threshold } else { REBASE_THRESHOLD_SECS };
        Self {
            start,
            last_now: None,
            last_elapsed: 0.0,
            threshold: threshold.max(period),
            period,
            rebases: 0,
        }
    }

    /// Number of rebases performed so far.
    pub fn rebases(&self) -> u32 {
        self.rebases
    }

    /// Sample the clock. Returns `(elapsed, dt)`, where `dt` is the
    /// non-negative wall-time step since the previous sample.
    pub fn sample(&mut self, now: f64) -> (f64, f64) {
        let dt = match self.last_now {
            Some(prev) if now > prev => now - prev,
            Some(_) => 0.0,
            None => 0.0,
        };
        if self.last_now.map_or(true, |prev| now > prev) {
            self.last_now = Some(now);
        }

        let mut elapsed = now - self.start;
        if elapsed < self.last_elapsed {
            // Clock stepped backward: hold.
            elapsed = self.last_elapsed;
        } else if elapsed > self.threshold {
            self.rebase_at(now);
            elapsed = (now - self.start).max(0.0);
        }
        self.last_elapsed = elapsed;
        (elapsed, dt)
    }

    /// Period-preserving rebase, used when a hidden tab comes back.
    pub fn rebase_at(&mut self, now: f64) {
        let elapsed = now - self.start;
        let cycles = (elapsed / self.period).floor();
        if cycles < 1.0 {
            return;
        }
        self.start += cycles * self.period;
        self.last_elapsed = (now - self.start).max(0.0);
        self.rebases += 1;
        log::debug!("animation clock rebased by {} periods", cycles);
    }

    /// Forget the last wall-time sample so the next `dt` is zero.
    pub fn resume(&mut self) {
        self.last_now = None;
    }
}
