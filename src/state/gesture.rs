//! Gesture recognition - tap and long press per item.
//!
//! Each item owns one [`GestureRecognizer`] scoped to its hit region. The
//! recognizer runs on the animation context: pointer events are fed in
//! arrival order and long-press timers are polled once per frame.
//!
//! ```text
//!             Down inside
//!   Idle ────────────────────▶ Pressed ──── held ≥ long_press_min ───▶ LongPressed
//!    ▲                          │  │                                     │
//!    │  Up inside (Tap)         │  │ Move outside / Cancel               │ Up
//!    └──────────────────────────┘  └──────────▶ Failed ── Up ──▶ Idle ◀──┘
//! ```
//!
//! A tap and a long press never both fire for the same touch.

use std::time::Duration;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::config::DEFAULT_LONG_PRESS;
use crate::shared::SharedRect;

// =============================================================================
// POINTER EVENTS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Cancel,
}

/// A pointer event in bar coordinates, stamped with frame-clock time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f32,
    pub y: f32,
    pub at: Duration,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f32, y: f32, at: Duration) -> Self {
        Self { kind, x, y, at }
    }

    pub fn down(x: f32, y: f32, at: Duration) -> Self {
        Self::new(PointerKind::Down, x, y, at)
    }

    pub fn moved(x: f32, y: f32, at: Duration) -> Self {
        Self::new(PointerKind::Move, x, y, at)
    }

    pub fn up(x: f32, y: f32, at: Duration) -> Self {
        Self::new(PointerKind::Up, x, y, at)
    }

    pub fn cancel(at: Duration) -> Self {
        Self::new(PointerKind::Cancel, 0.0, 0.0, at)
    }

    /// Convert a crossterm mouse event. Only the left button takes part.
    ///
    /// `origin_row` is the terminal row of the bar's top edge.
    pub fn from_crossterm(event: &MouseEvent, origin_row: u16, at: Duration) -> Option<Self> {
        let kind = match event.kind {
            MouseEventKind::Down(MouseButton::Left) => PointerKind::Down,
            MouseEventKind::Drag(MouseButton::Left) => PointerKind::Move,
            MouseEventKind::Up(MouseButton::Left) => PointerKind::Up,
            _ => return None,
        };
        let row = event.row.checked_sub(origin_row)?;
        Some(Self::new(kind, event.column as f32, row as f32, at))
    }
}

// =============================================================================
// RECOGNIZER
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureConfig {
    pub long_press_min: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            long_press_min: DEFAULT_LONG_PRESS,
        }
    }
}

/// A confirmed gesture on one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    Tap(usize),
    LongPress(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tracking {
    Idle,
    Pressed { since: Duration },
    LongPressed,
    Failed,
}

#[derive(Debug)]
pub struct GestureRecognizer {
    index: usize,
    region: SharedRect,
    config: GestureConfig,
    tracking: Tracking,
}

impl GestureRecognizer {
    pub fn new(index: usize, region: SharedRect, config: GestureConfig) -> Self {
        Self {
            index,
            region,
            config,
            tracking: Tracking::Idle,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// A touch that started in this item is still down.
    pub fn is_tracking(&self) -> bool {
        !matches!(self.tracking, Tracking::Idle)
    }

    /// Feed one pointer event.
    pub fn handle(&mut self, event: &PointerEvent) -> Option<GestureOutcome> {
        let inside = self.region.get().contains(event.x, event.y);
        match (self.tracking, event.kind) {
            (_, PointerKind::Cancel) => {
                self.tracking = Tracking::Idle;
                None
            }
            (_, PointerKind::Down) => {
                self.tracking = if inside {
                    Tracking::Pressed { since: event.at }
                } else {
                    Tracking::Idle
                };
                None
            }
            (Tracking::Pressed { since }, PointerKind::Move) => {
                if !inside {
                    self.tracking = Tracking::Failed;
                    None
                } else {
                    self.activate_long_press(since, event.at)
                }
            }
            (Tracking::Pressed { since }, PointerKind::Up) => {
                if !inside {
                    self.tracking = Tracking::Idle;
                    return None;
                }
                let outcome = self
                    .activate_long_press(since, event.at)
                    .unwrap_or(GestureOutcome::Tap(self.index));
                self.tracking = Tracking::Idle;
                if outcome == GestureOutcome::Tap(self.index) {
                    tracing::debug!(index = self.index, "tap confirmed");
                }
                Some(outcome)
            }
            (Tracking::LongPressed | Tracking::Failed, PointerKind::Up) => {
                self.tracking = Tracking::Idle;
                None
            }
            _ => None,
        }
    }

    /// Check the long-press timer at frame time `now`.
    pub fn poll(&mut self, now: Duration) -> Option<GestureOutcome> {
        match self.tracking {
            Tracking::Pressed { since } => self.activate_long_press(since, now),
            _ => None,
        }
    }

    fn activate_long_press(&mut self, since: Duration, now: Duration) -> Option<GestureOutcome> {
        if now.saturating_sub(since) < self.config.long_press_min {
            return None;
        }
        self.tracking = Tracking::LongPressed;
        tracing::debug!(index = self.index, "long press confirmed");
        Some(GestureOutcome::LongPress(self.index))
    }
}
