//! Animation primitives - timed transitions over shared scalars.
//!
//! An [`AnimatedScalar`] owns a [`SharedScalar`] and at most one running
//! [`Transition`]. The animation context calls [`AnimatedScalar::step`] once
//! per frame; the sampled value is written into the shared cell where any
//! context can read it.
//!
//! There is no cancellation. Starting a new convergence replaces the running
//! one: it begins from the value the cell holds right now and the timer
//! restarts (last target wins).
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use spark_tabbar::animation::{AnimatedScalar, TimingConfig};
//!
//! let mut position = AnimatedScalar::new(0.0);
//! let timing = TimingConfig::linear(Duration::from_millis(100));
//! position.animate_to(1.0, timing, Duration::ZERO);
//!
//! position.step(Duration::from_millis(50));
//! assert!((position.get() - 0.5).abs() < 1e-9);
//!
//! position.step(Duration::from_millis(100));
//! assert_eq!(position.get(), 1.0);
//! assert!(!position.is_animating());
//! ```

mod easing;
mod transition;

use std::time::Duration;

pub use easing::Easing;
pub use transition::{TimingConfig, Transition};

use crate::shared::SharedScalar;

// =============================================================================
// ANIMATED SCALAR
// =============================================================================

/// A shared scalar driven by timed convergences.
#[derive(Debug)]
pub struct AnimatedScalar {
    value: SharedScalar,
    transition: Option<Transition>,
}

impl AnimatedScalar {
    pub fn new(initial: f64) -> Self {
        Self {
            value: SharedScalar::new(initial),
            transition: None,
        }
    }

    /// Handle to the underlying cell for readers.
    pub fn shared(&self) -> SharedScalar {
        self.value.clone()
    }

    pub fn get(&self) -> f64 {
        self.value.get()
    }

    /// Target of the running convergence, or the settled value.
    pub fn target(&self) -> f64 {
        self.transition
            .map(|t| t.target())
            .unwrap_or_else(|| self.value.get())
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Start converging toward `target`, superseding any running convergence.
    pub fn animate_to(&mut self, target: f64, timing: TimingConfig, now: Duration) {
        let from = self.value.get();
        self.transition = Some(Transition::new(from, target, now, timing));
    }

    /// Jump to `value` and drop any running convergence.
    pub fn set_immediate(&mut self, value: f64) {
        self.transition = None;
        self.value.set(value);
    }

    /// Advance to `now`. Returns true while still converging.
    pub fn step(&mut self, now: Duration) -> bool {
        let Some(transition) = self.transition else {
            return false;
        };
        self.value.set(transition.sample(now));
        if transition.is_finished(now) {
            self.transition = None;
            false
        } else {
            true
        }
    }
}

// =============================================================================
// INTERPOLATION
// =============================================================================

/// Behavior outside the input range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extrapolate {
    /// Continue the line past the endpoints.
    #[default]
    Extend,
    /// Pin to the output endpoints.
    Clamp,
}

/// Map `value` from `input` range to `output` range.
///
/// A degenerate input range yields `output[0]`.
pub fn interpolate(value: f64, input: [f64; 2], output: [f64; 2], extrapolate: Extrapolate) -> f64 {
    let span = input[1] - input[0];
    if span == 0.0 || !span.is_finite() {
        return output[0];
    }
    let mut t = (value - input[0]) / span;
    if extrapolate == Extrapolate::Clamp {
        t = t.clamp(0.0, 1.0);
    }
    output[0] + (output[1] - output[0]) * t
}

// =============================================================================
// Tests
// =============================================================================
