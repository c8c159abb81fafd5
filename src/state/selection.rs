//! Selection state and the index-change bridge.
//!
//! [`SelectionState`] wraps the shared SelectedIndex cell. The main context
//! mirrors the navigation index into it; tap confirmation on the animation
//! context writes it directly. A reaction watching the cell hands each
//! observed crossing to [`bridge_index_change`] on the main context, which
//! turns it into a `tabPress` intent and (maybe) a navigation request.
//!
//! Whether a crossing came from navigation is decided when the reaction
//! observes it, not when the main context drains it: the watched value is an
//! [`Observation`] of both the cell and the last mirrored navigation index.

use std::sync::atomic::{AtomicI64, Ordering};

use crate::navigation::{Navigator, RouteRef, TabEvent, TabEventKind};
use crate::shared::{SharedIndex, UNSET};

// =============================================================================
// SELECTION STATE
// =============================================================================

/// The authoritative selected tab index.
#[derive(Debug, Clone)]
pub struct SelectionState {
    cell: SharedIndex,
    mirrored: SharedIndex,
    last_navigation: Option<usize>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self {
            cell: SharedIndex::unset(),
            mirrored: SharedIndex::unset(),
            last_navigation: None,
        }
    }

    /// Current index, safe from either context. `None` before the first sync.
    pub fn current(&self) -> Option<usize> {
        self.cell.get()
    }

    /// Handle to the shared cell (for recognizers and reactions).
    pub fn cell(&self) -> SharedIndex {
        self.cell.clone()
    }

    /// Mirror the navigation index. Main context only.
    ///
    /// Only a change of the navigation index writes the cell, so re-syncing
    /// the same index never overwrites a newer tap. Returns whether it wrote.
    pub fn set_from_navigation(&mut self, index: usize) -> bool {
        if self.last_navigation == Some(index) {
            return false;
        }
        self.last_navigation = Some(index);
        // Mirror first: a reader that sees the new cell value sees it too.
        self.mirrored.set(index);
        let previous = self.cell.set(index);
        tracing::debug!(index, ?previous, "mirrored navigation index");
        true
    }

    /// Forget the mirrored index so the next sync writes unconditionally.
    pub fn reset_navigation(&mut self) {
        self.last_navigation = None;
    }

    /// Reaction source: the current [`Observation`], encoded.
    ///
    /// The mirrored flag is fixed when the index changes. Navigation catching
    /// up with an index already observed does not produce a new value.
    pub fn observer(&self) -> impl Fn() -> i64 + Send + 'static {
        let cell = self.cell.clone();
        let mirrored = self.mirrored.clone();
        let last = AtomicI64::new(Observation::read(&cell, &mirrored).encode());
        move || {
            let previous = Observation::decode(last.load(Ordering::Relaxed));
            let observed = Observation::read(&cell, &mirrored);
            if observed.index == previous.index {
                return previous.encode();
            }
            let raw = observed.encode();
            last.store(raw, Ordering::Relaxed);
            raw
        }
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// OBSERVATION
// =============================================================================

/// SelectedIndex as one frame saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    /// Raw cell value (`UNSET` before the first sync).
    pub index: i64,
    /// The value equalled the mirrored navigation index at that frame.
    pub mirrored: bool,
}

impl Observation {
    pub fn new(index: i64, mirrored: bool) -> Self {
        Self { index, mirrored }
    }

    fn read(cell: &SharedIndex, mirrored: &SharedIndex) -> Self {
        // Cell first; its Acquire orders the mirrored load after it.
        let index = cell.raw();
        Self::new(index, index != UNSET && index == mirrored.raw())
    }

    /// Pack into one watchable value. Distinct observations stay distinct.
    pub fn encode(self) -> i64 {
        self.index * 2 + self.mirrored as i64
    }

    pub fn decode(raw: i64) -> Self {
        Self::new(raw.div_euclid(2), raw.rem_euclid(2) == 1)
    }
}

// =============================================================================
// BRIDGE
// =============================================================================

/// What the bridge did with one delivered crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeOutcome {
    /// The cell held the unset sentinel.
    Unset,
    /// No route at that index (route list changed under the crossing).
    MissingRoute,
    /// The value was mirrored from navigation; nothing to emit.
    AlreadyActive,
    /// `tabPress` was emitted and the listener prevented navigation.
    Prevented,
    /// `tabPress` was emitted and navigation requested.
    Navigated,
}

/// Turn an observed SelectedIndex value into navigation side effects.
pub fn bridge_index_change(
    observed: Observation,
    routes: &[RouteRef],
    navigator: &mut dyn Navigator,
) -> BridgeOutcome {
    if observed.index == UNSET {
        return BridgeOutcome::Unset;
    }
    let Ok(index) = usize::try_from(observed.index) else {
        return BridgeOutcome::Unset;
    };
    let Some(route) = routes.get(index) else {
        tracing::warn!(index, routes = routes.len(), "selected index has no route");
        return BridgeOutcome::MissingRoute;
    };
    if observed.mirrored {
        tracing::trace!(index, "selection mirrored from navigation");
        return BridgeOutcome::AlreadyActive;
    }

    let outcome = navigator.emit(&TabEvent {
        kind: TabEventKind::TabPress,
        target: route.key.clone(),
        can_prevent_default: true,
    });
    if outcome.default_prevented {
        tracing::debug!(index, route = %route.name, "tab press prevented");
        return BridgeOutcome::Prevented;
    }

    navigator.navigate(&route.name);
    tracing::debug!(index, route = %route.name, "navigated from tab press");
    BridgeOutcome::Navigated
}

/// Emit `tabLongPress` for the route at `index`. Never navigates.
pub fn bridge_long_press(index: usize, routes: &[RouteRef], navigator: &mut dyn Navigator) -> bool {
    let Some(route) = routes.get(index) else {
        return false;
    };
    navigator.emit(&TabEvent {
        kind: TabEventKind::TabLongPress,
        target: route.key.clone(),
        can_prevent_default: false,
    });
    tracing::debug!(index, route = %route.name, "tab long press");
    true
}
