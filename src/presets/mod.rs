//! Presets - how a tab item looks, as a pure function of its focus.
//!
//! A [`Preset`] supplies sizing/timing defaults and derives an
//! [`ItemVisual`] from an [`ItemInput`] (focus position plus the item's
//! measured layout). Presets never read another item's state.
//!
//! Presets are looked up by name in a [`PresetRegistry`]. The registry is
//! validated when it is built: duplicate names are rejected, and asking for
//! an unregistered name fails with the list of valid ones.
//!
//! | Name     | Look                                                        |
//! |----------|-------------------------------------------------------------|
//! | `bubble` | background pill grows to the container width, label fades in |
//! | `flashy` | icon slides up and out, label slides in, indicator dot      |

mod bubble;
mod flashy;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub use bubble::Bubble;
pub use flashy::Flashy;

use crate::animation::{Easing, TimingConfig};
use crate::config::{ItemContainerWidth, Spacing, TabBarConfig};
use crate::error::{Result, TabBarError};
use crate::tabs::MergedTab;
use crate::types::Rgba;

// =============================================================================
// TYPES
// =============================================================================

/// Sizing and timing a preset uses when the config leaves them unset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetDefaults {
    pub item_inner_space: Spacing,
    pub item_outer_space: Spacing,
    pub item_container_width: ItemContainerWidth,
    pub icon_size: f32,
    pub duration: Duration,
    pub easing: Easing,
}

/// Config values resolved against a preset's defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSizing {
    pub item_inner_space: Spacing,
    pub item_outer_space: Spacing,
    pub item_container_width: ItemContainerWidth,
    pub icon_size: f32,
    pub timing: TimingConfig,
}

impl PresetDefaults {
    pub fn resolve(&self, config: &TabBarConfig) -> ResolvedSizing {
        ResolvedSizing {
            item_inner_space: config.item_inner_space.unwrap_or(self.item_inner_space),
            item_outer_space: config.item_outer_space.unwrap_or(self.item_outer_space),
            item_container_width: config
                .item_container_width
                .unwrap_or(self.item_container_width),
            icon_size: config.icon_size.unwrap_or(self.icon_size),
            timing: TimingConfig::new(
                config
                    .duration_ms
                    .map(Duration::from_millis)
                    .unwrap_or(self.duration),
                config.easing.unwrap_or(self.easing),
            ),
        }
    }
}

/// Everything one item's visual derivation may read.
#[derive(Debug, Clone, Copy)]
pub struct ItemInput<'a> {
    pub tab: &'a MergedTab,
    /// FocusPosition, possibly outside `[0, 1]` mid-curve.
    pub focus: f64,
    pub icon_size: f32,
    pub inner_space: Spacing,
    pub label_width: f64,
    pub label_height: f64,
    pub container_width: f64,
    pub container_height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundVisual {
    pub width: f64,
    pub color: Rgba,
}

/// Indicator dot, positioned inside the item container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorVisual {
    pub left: f64,
    pub top: f64,
    pub radius: f64,
    pub color: Rgba,
}

/// Derived look of one item for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemVisual {
    pub icon_offset_y: f64,
    pub label_offset_y: f64,
    pub label_opacity: f64,
    pub icon_color: Rgba,
    pub label_color: Rgba,
    pub background: Option<BackgroundVisual>,
    pub indicator: Option<IndicatorVisual>,
}

/// A tab bar look.
pub trait Preset: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn defaults(&self) -> PresetDefaults;

    /// Fixed height of an item container.
    fn container_height(&self, icon_size: f32, inner_space: Spacing) -> f32 {
        icon_size + inner_space.vertical() * 2.0
    }

    fn item_visual(&self, input: &ItemInput<'_>) -> ItemVisual;
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Registered presets, in registration order.
#[derive(Debug, Clone, Default)]
pub struct PresetRegistry {
    presets: Vec<Arc<dyn Preset>>,
}

impl PresetRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// `bubble` and `flashy`.
    pub fn with_builtin() -> Self {
        Self {
            presets: vec![Arc::new(Bubble), Arc::new(Flashy)],
        }
    }

    pub fn register(&mut self, preset: Arc<dyn Preset>) -> Result<()> {
        if self.contains(preset.name()) {
            return Err(TabBarError::DuplicatePreset(preset.name().to_string()));
        }
        tracing::debug!(name = preset.name(), "registered preset");
        self.presets.push(preset);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.presets.iter().any(|p| p.name() == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.presets.iter().map(|p| p.name()).collect()
    }

    /// Look up a preset by name.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Preset>> {
        self.presets
            .iter()
            .find(|p| p.name() == name)
            .cloned()
            .ok_or_else(|| TabBarError::UnknownPreset {
                found: name.to_string(),
                expected: self.names().join(", "),
            })
    }
}
