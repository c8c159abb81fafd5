//! # spark-tabbar
//!
//! Animated bottom tab bar core for Rust.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! main-context reactivity and [taffy](https://github.com/DioxusLabs/taffy)
//! for bar layout.
//!
//! ## Architecture
//!
//! A tab bar runs across two execution contexts that only share scalars:
//!
//! ```text
//! navigation ─▶ TabBar (main) ══ shared cells ══ Animator (animation) ◀─ pointer input
//!                  ▲                                    │
//!                  └───────── reaction channel ─────────┘
//! ```
//!
//! The main side mirrors navigation state into the SelectedIndex cell and
//! bridges index changes back into navigation. The animation side
//! recognizes gestures, runs focus and visibility transitions, and
//! schedules reactions. Visual presets read both sides to produce a frame.
//!
//! ## Modules
//!
//! - [`shared`] - cross-context cells (SelectedIndex, positions, regions)
//! - [`reaction`] - animation-side watches, main-side handlers
//! - [`animation`] - easing, timed transitions, interpolation
//! - [`navigation`] - the host navigation contract
//! - [`config`] / [`tabs`] - configuration and per-tab merging
//! - [`state`] - selection, visibility, layout, focus, gestures
//! - [`layout`] - taffy bar measurement
//! - [`presets`] - bubble and flashy visuals
//! - [`pipeline`] - mounting and wiring both contexts
//! - [`renderer`] - terminal drawing

pub mod animation;
pub mod config;
pub mod error;
pub mod layout;
pub mod logging;
pub mod navigation;
pub mod pipeline;
pub mod presets;
pub mod reaction;
pub mod renderer;
pub mod shared;
pub mod state;
pub mod tabs;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{Result, TabBarError};

pub use config::{Spacing, TabBarConfig, TabConfig};

pub use navigation::{
    Descriptor, Descriptors, EmitOutcome, NavigationShape, NavigationState, Navigator, RouteRef,
    TabEvent, TabEventKind,
};

pub use pipeline::{
    mount, mount_with_measure, Animator, AnimatorThread, FrameClock, FrameFlags, FrameReport,
    InputSender, TabBar, TabBarFrame,
};

pub use presets::{Preset, PresetRegistry};

pub use renderer::{write_frame, RenderedBar, TextRenderer};

pub use state::{PointerEvent, PositionMode, VisibilityPhase};

pub use logging::init_logging;
