//! Navigation collaborator interface.
//!
//! The tab bar does not own routes. It reads a [`NavigationShape`] plus a
//! [`Descriptors`] map on every sync and talks back through the
//! [`Navigator`] trait: emit a cancelable intent, then (maybe) navigate.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TabBarError};

/// A route as seen by the tab bar. `key` is unique per route instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteRef {
    pub key: String,
    pub name: String,
}

impl RouteRef {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
        }
    }
}

/// Active index plus the route list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NavigationState {
    pub index: usize,
    pub routes: Vec<RouteRef>,
}

impl NavigationState {
    pub fn new(index: usize, routes: Vec<RouteRef>) -> Self {
        Self { index, routes }
    }

    /// The active route. Fails on an empty list or out-of-range index.
    pub fn active_route(&self) -> Result<&RouteRef> {
        if self.routes.is_empty() {
            return Err(TabBarError::NoRoutes);
        }
        self.routes
            .get(self.index)
            .ok_or(TabBarError::IndexOutOfBounds {
                index: self.index,
                len: self.routes.len(),
            })
    }
}

/// The two shapes a navigation collaborator may hand over.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationShape {
    /// `{ index, routes }` with per-route descriptors.
    Current(NavigationState),
    /// `{ state: { index, routes } }`; no route options, the bar is always visible.
    Legacy { state: NavigationState },
}

impl NavigationShape {
    pub fn state(&self) -> &NavigationState {
        match self {
            Self::Current(state) => state,
            Self::Legacy { state } => state,
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy { .. })
    }
}

/// Options a route declares for the tab bar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteOptions {
    pub tab_bar_visible: Option<bool>,
}

/// Per-route descriptor from the navigation collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Descriptor {
    pub title: Option<String>,
    pub options: RouteOptions,
}

/// Descriptors keyed by route key.
pub type Descriptors = HashMap<String, Descriptor>;

/// Whether the bar should be shown for the active route (defaults to true).
pub fn visibility_intent(shape: &NavigationShape, descriptors: &Descriptors) -> Result<bool> {
    let route = shape.state().active_route()?;
    if shape.is_legacy() {
        return Ok(true);
    }
    Ok(descriptors
        .get(&route.key)
        .and_then(|d| d.options.tab_bar_visible)
        .unwrap_or(true))
}

// =============================================================================
// INTENTS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabEventKind {
    TabPress,
    TabLongPress,
}

impl TabEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TabPress => "tabPress",
            Self::TabLongPress => "tabLongPress",
        }
    }
}

/// An intent emitted to the navigation collaborator before any side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabEvent {
    pub kind: TabEventKind,
    /// Route key.
    pub target: String,
    pub can_prevent_default: bool,
}

/// What the collaborator did with an emitted intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmitOutcome {
    pub default_prevented: bool,
}

/// The navigation collaborator, called on the main context only.
pub trait Navigator {
    /// Deliver an intent to listeners.
    fn emit(&mut self, event: &TabEvent) -> EmitOutcome;

    /// Navigate to the route named `route_name`.
    fn navigate(&mut self, route_name: &str);
}
