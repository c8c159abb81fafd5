//! Pipeline - wiring the two execution contexts together.
//!
//! ```text
//!  main context (TabBar)                         animation context (Animator)
//!  ─────────────────────                         ────────────────────────────
//!  sync(navigation) ── SelectedIndex / intent ──▶ frame(now)
//!  layout_pass(width) ── BarHeight / regions ───▶   recognizers, visibility, focus
//!  flush(navigator) ◀──────── Change (mpsc) ────── reactor.evaluate()
//!  snapshot() ◀──────────── focus / position ─────
//! ```
//!
//! Shared cells carry values; the reaction channel carries side effects.
//! Nothing the animator does calls into navigation directly.

pub mod animator;
pub mod mount;
pub mod tab_bar;

pub use animator::{
    Animator, AnimatorCommand, AnimatorThread, FrameClock, FrameFlags, FrameReport, InputSender,
    ItemSet, ItemWatch,
};
pub use mount::{mount, mount_with_measure};
pub use tab_bar::{ItemFrame, TabBar, TabBarFrame, TabBarProps};
