//! Animation context.
//!
//! The [`Animator`] owns everything that runs once per frame: gesture
//! recognizers, the visibility machine, focus transitions and the reactor.
//! It is `Send`, so a host can drive it from its own loop or hand it to
//! [`Animator::spawn`].
//!
//! # Frame order
//!
//! ```text
//! frame(now)
//!   1. drain commands (remounts), then pointer events through the recognizers
//!   2. poll long-press timers
//!   3. visibility step
//!   4. focus retarget + step
//!   5. reactor evaluation   <- strictly after every writer of this frame
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use bitflags::bitflags;
use crossterm::event::MouseEvent;

use crate::error::Result;
use crate::reaction::{Change, Notifier, Reactor, SubscriptionId};
use crate::shared::SharedIndex;
use crate::state::{
    FocusDriver, FocusTransition, GestureOutcome, GestureRecognizer, PointerEvent,
    VisibilityMachine,
};

// =============================================================================
// CLOCK
// =============================================================================

/// Frame time: a `Duration` since mount. Cheap to copy between contexts.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    origin: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// REPORT
// =============================================================================

bitflags! {
    /// What happened during a frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FrameFlags: u8 {
        /// SelectedIndex differs from the previous frame.
        const SELECTION  = 1 << 0;
        /// A focus transition was retargeted or is running.
        const FOCUS      = 1 << 1;
        /// The visibility position flipped or is moving.
        const VISIBILITY = 1 << 2;
        /// A gesture was confirmed.
        const GESTURE    = 1 << 3;
        /// The item set was replaced.
        const REMOUNT    = 1 << 4;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    pub flags: FrameFlags,
    /// More frames are needed even without new input.
    pub animating: bool,
}

impl FrameReport {
    /// Nothing changed and nothing is moving.
    pub fn is_idle(&self) -> bool {
        self.flags.is_empty() && !self.animating
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

/// A per-item reaction to install on the animation side.
pub struct ItemWatch {
    pub source: Box<dyn Fn() -> i64 + Send>,
    /// Value the main side already reflects.
    pub baseline: i64,
    pub notifier: Notifier,
}

/// Replacement item set after a route list change.
pub struct ItemSet {
    pub focus: Vec<FocusTransition>,
    pub recognizers: Vec<GestureRecognizer>,
    pub watches: Vec<ItemWatch>,
    /// Reactions of the items being replaced.
    pub retired: Vec<SubscriptionId>,
}

/// Main context → animation context.
pub enum AnimatorCommand {
    ReplaceItems(ItemSet),
}

/// Pointer input handle, usable from any thread.
#[derive(Debug, Clone)]
pub struct InputSender {
    tx: Sender<PointerEvent>,
}

impl InputSender {
    pub(crate) fn new(tx: Sender<PointerEvent>) -> Self {
        Self { tx }
    }

    /// Queue an event for the next frame. Returns false once the animator is gone.
    pub fn send(&self, event: PointerEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// Queue a crossterm mouse event. Events that do not map are dropped.
    pub fn send_mouse(&self, event: &MouseEvent, origin_row: u16, at: Duration) -> bool {
        match PointerEvent::from_crossterm(event, origin_row, at) {
            Some(pointer) => self.send(pointer),
            None => true,
        }
    }
}

// =============================================================================
// ANIMATOR
// =============================================================================

pub struct Animator {
    selected: SharedIndex,
    last_selected: i64,
    visibility: VisibilityMachine,
    focus: FocusDriver,
    recognizers: Vec<GestureRecognizer>,
    reactor: Reactor,
    long_press: Notifier,
    commands: Receiver<AnimatorCommand>,
    input: Receiver<PointerEvent>,
}

impl Animator {
    pub(crate) fn new(
        selected: SharedIndex,
        visibility: VisibilityMachine,
        focus: FocusDriver,
        reactor: Reactor,
        long_press: Notifier,
        commands: Receiver<AnimatorCommand>,
        input: Receiver<PointerEvent>,
    ) -> Self {
        let last_selected = selected.raw();
        Self {
            selected,
            last_selected,
            visibility,
            focus,
            recognizers: Vec::new(),
            reactor,
            long_press,
            commands,
            input,
        }
    }

    pub fn item_count(&self) -> usize {
        self.focus.len()
    }

    /// Current FocusPosition of every item.
    pub fn focus_values(&self) -> Vec<f64> {
        self.focus.values()
    }

    /// Run one frame at `now`.
    pub fn frame(&mut self, now: Duration) -> FrameReport {
        let mut flags = FrameFlags::empty();

        while let Ok(command) = self.commands.try_recv() {
            match command {
                AnimatorCommand::ReplaceItems(set) => {
                    self.replace_items(set);
                    flags |= FrameFlags::REMOUNT;
                }
            }
        }

        while let Ok(event) = self.input.try_recv() {
            for recognizer in &mut self.recognizers {
                if let Some(outcome) = recognizer.handle(&event) {
                    apply_outcome(outcome, &self.selected, &self.long_press);
                    flags |= FrameFlags::GESTURE;
                }
            }
        }

        let mut pressing = false;
        for recognizer in &mut self.recognizers {
            if let Some(outcome) = recognizer.poll(now) {
                apply_outcome(outcome, &self.selected, &self.long_press);
                flags |= FrameFlags::GESTURE;
            }
            pressing |= recognizer.is_tracking();
        }

        let (flipped, moving) = self.visibility.step(now);
        if flipped || moving {
            flags |= FrameFlags::VISIBILITY;
        }

        let selected = self.selected.raw();
        if selected != self.last_selected {
            self.last_selected = selected;
            flags |= FrameFlags::SELECTION;
        }
        let focus = self.focus.frame(selected, now);
        if focus.retargeted || focus.animating {
            flags |= FrameFlags::FOCUS;
        }

        self.reactor.evaluate();

        FrameReport {
            flags,
            animating: moving || focus.animating || pressing,
        }
    }

    fn replace_items(&mut self, set: ItemSet) {
        for id in set.retired {
            self.reactor.unwatch(id);
        }
        for watch in set.watches {
            self.reactor
                .watch_from(watch.source, watch.baseline, watch.notifier);
        }
        tracing::debug!(items = set.focus.len(), "animator items replaced");
        self.focus.replace(set.focus);
        self.recognizers = set.recognizers;
    }

    /// Run frames on a dedicated thread every `interval`.
    pub fn spawn(self, clock: FrameClock, interval: Duration) -> Result<AnimatorThread> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = stop.clone();
        let handle = thread::Builder::new()
            .name("tabbar-animator".into())
            .spawn(move || {
                let mut animator = self;
                while !flag.load(Ordering::Acquire) {
                    animator.frame(clock.now());
                    thread::sleep(interval);
                }
                animator
            })?;
        Ok(AnimatorThread {
            stop,
            handle: Some(handle),
        })
    }
}

fn apply_outcome(outcome: GestureOutcome, selected: &SharedIndex, long_press: &Notifier) {
    match outcome {
        GestureOutcome::Tap(index) => {
            let previous = selected.set(index);
            tracing::debug!(index, ?previous, "tap wrote selected index");
        }
        GestureOutcome::LongPress(index) => {
            long_press.notify(Change {
                previous: None,
                current: index as i64,
            });
        }
    }
}

/// An animator running on its own thread. Stops on drop.
pub struct AnimatorThread {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<Animator>>,
}

impl AnimatorThread {
    /// Stop the loop and take the animator back.
    pub fn stop(mut self) -> Option<Animator> {
        self.stop.store(true, Ordering::Release);
        self.handle.take().and_then(|h| h.join().ok())
    }
}

impl Drop for AnimatorThread {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
