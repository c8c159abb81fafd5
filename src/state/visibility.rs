//! Visibility state machine.
//!
//! The main context writes the visibility intent on every sync. The animation
//! context notices a flip and converges the position toward 1 (shown) or 0
//! (hidden) over a fixed 250 ms linear transition. A new flip mid-transition
//! simply retargets from wherever the position is.
//!
//! Positioning mode follows the intent, not the position. The bar switches
//! to absolute positioning the moment it is told to hide, so it overlays
//! content while it slides out instead of releasing its space at the end.

use std::time::Duration;

use crate::animation::{interpolate, AnimatedScalar, Extrapolate, TimingConfig};
use crate::shared::{SharedFlag, SharedScalar};

/// Fixed show/hide transition.
pub const VISIBILITY_TIMING: TimingConfig = TimingConfig::linear(Duration::from_millis(250));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityPhase {
    Visible,
    Hidden,
    Transitioning { toward_visible: bool },
}

/// Layout participation of the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionMode {
    /// Takes part in layout.
    Relative,
    /// Overlays content.
    Absolute,
}

// =============================================================================
// ANIMATION SIDE
// =============================================================================

/// Animation-context driver of VisibilityPosition.
#[derive(Debug)]
pub struct VisibilityMachine {
    intent: SharedFlag,
    position: AnimatedScalar,
    seen_intent: bool,
}

impl VisibilityMachine {
    /// Start settled at the initial intent.
    pub fn new(intent: SharedFlag) -> Self {
        let visible = intent.get();
        Self {
            intent,
            position: AnimatedScalar::new(if visible { 1.0 } else { 0.0 }),
            seen_intent: visible,
        }
    }

    pub fn position_cell(&self) -> SharedScalar {
        self.position.shared()
    }

    /// Advance one frame. Returns `(flipped, animating)`.
    pub fn step(&mut self, now: Duration) -> (bool, bool) {
        let intent = self.intent.get();
        let flipped = intent != self.seen_intent;
        if flipped {
            self.seen_intent = intent;
            let target = if intent { 1.0 } else { 0.0 };
            tracing::debug!(visible = intent, from = self.position.get(), "visibility flipped");
            self.position.animate_to(target, VISIBILITY_TIMING, now);
        }
        let animating = self.position.step(now);
        (flipped, animating)
    }
}

// =============================================================================
// MAIN SIDE
// =============================================================================

/// Main-context view: writes the intent, reads the derived transform.
#[derive(Debug, Clone)]
pub struct VisibilityView {
    intent: SharedFlag,
    position: SharedScalar,
    bar_height: SharedScalar,
}

impl VisibilityView {
    pub fn new(intent: SharedFlag, position: SharedScalar, bar_height: SharedScalar) -> Self {
        Self {
            intent,
            position,
            bar_height,
        }
    }

    /// Record the intent for the active route. Returns true on a flip.
    pub fn set_intent(&self, visible: bool) -> bool {
        let changed = self.intent.get() != visible;
        if changed {
            self.intent.set(visible);
        }
        changed
    }

    pub fn intent(&self) -> bool {
        self.intent.get()
    }

    pub fn position(&self) -> f64 {
        self.position.get()
    }

    /// Downward translation: one bar height when hidden, zero when shown.
    pub fn translate_y(&self) -> f64 {
        interpolate(
            self.position.get(),
            [0.0, 1.0],
            [self.bar_height.get(), 0.0],
            Extrapolate::Extend,
        )
    }

    pub fn position_mode(&self) -> PositionMode {
        if self.intent.get() {
            PositionMode::Relative
        } else {
            PositionMode::Absolute
        }
    }

    pub fn phase(&self) -> VisibilityPhase {
        let intent = self.intent.get();
        let position = self.position.get();
        match (intent, position) {
            (true, p) if p >= 1.0 => VisibilityPhase::Visible,
            (false, p) if p <= 0.0 => VisibilityPhase::Hidden,
            _ => VisibilityPhase::Transitioning {
                toward_visible: intent,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn pair(visible: bool, height: f64) -> (VisibilityMachine, VisibilityView) {
        let intent = SharedFlag::new(visible);
        let machine = VisibilityMachine::new(intent.clone());
        let view = VisibilityView::new(intent, machine.position_cell(), SharedScalar::new(height));
        (machine, view)
    }

    #[test]
    fn test_hide_converges_within_duration() {
        let (mut machine, view) = pair(true, 3.0);
        assert_eq!(view.phase(), VisibilityPhase::Visible);
        assert_eq!(view.translate_y(), 0.0);

        assert!(view.set_intent(false));
        assert_eq!(view.position_mode(), PositionMode::Absolute);
        assert_eq!(machine.step(ms(0)), (true, true));
        assert_eq!(
            view.phase(),
            VisibilityPhase::Transitioning {
                toward_visible: false
            }
        );
        machine.step(ms(125));
        assert!((view.position() - 0.5).abs() < 1e-9);
        assert_eq!(machine.step(ms(250)), (false, false));
        assert_eq!(view.position(), 0.0);
        assert_eq!(view.translate_y(), 3.0);
        assert_eq!(view.phase(), VisibilityPhase::Hidden);
    }

    #[test]
    fn test_flip_back_mid_transition_reverses() {
        let (mut machine, view) = pair(true, 2.0);
        view.set_intent(false);
        machine.step(ms(0));
        machine.step(ms(100));
        let mid = view.position();
        assert!(mid < 1.0 && mid > 0.0);

        view.set_intent(true);
        assert_eq!(view.position_mode(), PositionMode::Relative);
        machine.step(ms(100));
        machine.step(ms(150));
        assert!(view.position() > mid);
        machine.step(ms(350));
        assert_eq!(view.position(), 1.0);
        assert_eq!(view.phase(), VisibilityPhase::Visible);
    }

    #[test]
    fn test_same_intent_is_not_a_flip() {
        let (mut machine, view) = pair(true, 2.0);
        assert!(!view.set_intent(true));
        assert_eq!(machine.step(ms(10)), (false, false));
    }

    #[test]
    fn test_zero_height_before_layout_is_flush() {
        let (mut machine, view) = pair(false, 0.0);
        machine.step(ms(0));
        assert_eq!(view.translate_y(), 0.0);
    }
}
