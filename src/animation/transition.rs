//! Timed convergence from a start value to a target value.

use std::time::Duration;

use super::easing::Easing;

/// Duration and curve of a timed transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingConfig {
    pub duration: Duration,
    pub easing: Easing,
}

impl TimingConfig {
    pub const fn new(duration: Duration, easing: Easing) -> Self {
        Self { duration, easing }
    }

    pub const fn linear(duration: Duration) -> Self {
        Self::new(duration, Easing::Linear)
    }
}

/// One convergence: `from` → `to`, starting at `started_at` (frame time).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    from: f64,
    to: f64,
    started_at: Duration,
    timing: TimingConfig,
}

impl Transition {
    pub fn new(from: f64, to: f64, started_at: Duration, timing: TimingConfig) -> Self {
        Self {
            from,
            to,
            started_at,
            timing,
        }
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    /// Linear progress in `[0, 1]`. A zero duration is always complete.
    pub fn progress(&self, now: Duration) -> f64 {
        let total = self.timing.duration.as_secs_f64();
        if total <= 0.0 {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at).as_secs_f64();
        (elapsed / total).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        self.progress(now) >= 1.0
    }

    /// Value at `now`. Exactly `to` once finished.
    pub fn sample(&self, now: Duration) -> f64 {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * self.timing.easing.apply(t)
    }
}
