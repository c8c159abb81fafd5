//! Per-item focus transitions.
//!
//! Each mounted item owns one FocusPosition: 1 when it is the selected item,
//! 0 otherwise, converging with the preset's duration and curve. The
//! [`FocusDriver`] lives on the animation context and restarts every item's
//! convergence whenever it observes a new SelectedIndex.

use std::time::Duration;

use crate::animation::{AnimatedScalar, TimingConfig};
use crate::shared::{SharedScalar, UNSET};

/// FocusPosition of one item.
#[derive(Debug)]
pub struct FocusTransition {
    index: usize,
    position: AnimatedScalar,
}

impl FocusTransition {
    /// Items mount unfocused; the first observed selection animates them in.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            position: AnimatedScalar::new(0.0),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn position_cell(&self) -> SharedScalar {
        self.position.shared()
    }

    pub fn value(&self) -> f64 {
        self.position.get()
    }

    /// Restart the convergence for a newly observed selection.
    pub fn retarget(&mut self, selected_raw: i64, timing: TimingConfig, now: Duration) {
        let focused = selected_raw != UNSET && selected_raw == self.index as i64;
        self.position
            .animate_to(if focused { 1.0 } else { 0.0 }, timing, now);
    }

    pub fn step(&mut self, now: Duration) -> bool {
        self.position.step(now)
    }
}

/// Result of one driver frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusStep {
    pub retargeted: bool,
    pub animating: bool,
}

/// Animation-context owner of every item's focus transition.
#[derive(Debug)]
pub struct FocusDriver {
    items: Vec<FocusTransition>,
    timing: TimingConfig,
    last_seen: Option<i64>,
}

impl FocusDriver {
    pub fn new(items: Vec<FocusTransition>, timing: TimingConfig) -> Self {
        Self {
            items,
            timing,
            last_seen: None,
        }
    }

    /// Swap in a new item set (route list changed). The next frame retargets.
    pub fn replace(&mut self, items: Vec<FocusTransition>) {
        self.items = items;
        self.last_seen = None;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.items.iter().map(FocusTransition::value).collect()
    }

    /// Observe SelectedIndex and advance every transition.
    pub fn frame(&mut self, selected_raw: i64, now: Duration) -> FocusStep {
        let retargeted = self.last_seen != Some(selected_raw);
        if retargeted {
            self.last_seen = Some(selected_raw);
            for item in &mut self.items {
                item.retarget(selected_raw, self.timing, now);
            }
        }
        let mut animating = false;
        for item in &mut self.items {
            animating |= item.step(now);
        }
        FocusStep {
            retargeted,
            animating,
        }
    }
}
