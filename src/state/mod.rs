//! State Module - the synchronization core
//!
//! - **Selection** - SelectedIndex and the index-change bridge
//! - **Visibility** - show/hide intent and its animated position
//! - **Layout** - BarHeight and per-item measurements
//! - **Focus** - per-item focus transitions
//! - **Gesture** - tap / long-press recognition

pub mod focus;
pub mod gesture;
pub mod layout;
pub mod selection;
pub mod visibility;

pub use focus::{FocusDriver, FocusStep, FocusTransition};
pub use gesture::{GestureConfig, GestureOutcome, GestureRecognizer, PointerEvent, PointerKind};
pub use layout::{BarLayout, ItemLayout};
pub use selection::{
    bridge_index_change, bridge_long_press, BridgeOutcome, Observation, SelectionState,
};
pub use visibility::{PositionMode, VisibilityMachine, VisibilityPhase, VisibilityView, VISIBILITY_TIMING};
