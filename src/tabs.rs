//! Tab merging - route list + caller config + descriptor titles.
//!
//! Rebuilt on every sync, in route order. A route with a matching config entry
//! (looked up by route name first, then route key) takes the config's key and
//! title when present. A route without one falls back to its name.

use std::collections::HashMap;

use crate::config::{parse_optional_color, TabConfig};
use crate::error::Result;
use crate::navigation::{Descriptors, RouteRef};
use crate::types::Rgba;

/// Indicator settings as configured. Presets fill in their own defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndicatorStyle {
    pub size: Option<f32>,
    pub color: Option<Rgba>,
    pub visible: Option<bool>,
}

/// One tab as handed to the preset.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedTab {
    /// Key of the route this tab belongs to.
    pub route_key: String,
    pub route_name: String,
    /// Tab identity: the configured key, `tab-<config entry>`, or the route name.
    pub key: String,
    pub title: String,
    pub glyph: Option<String>,
    pub icon_color: Option<Rgba>,
    pub icon_inactive_color: Option<Rgba>,
    pub label_color: Option<Rgba>,
    pub background_color: Option<Rgba>,
    pub indicator: IndicatorStyle,
}

impl MergedTab {
    /// Accessibility label.
    pub fn label(&self) -> &str {
        &self.title
    }
}

/// Merge `routes` with the caller's `configs` and the navigation `descriptors`.
///
/// Fails only on an unparseable configured color.
pub fn merge_tabs(
    routes: &[RouteRef],
    descriptors: &Descriptors,
    configs: &HashMap<String, TabConfig>,
) -> Result<Vec<MergedTab>> {
    routes
        .iter()
        .map(|route| {
            let descriptor_title = descriptors.get(&route.key).and_then(|d| d.title.clone());
            let configured = configs
                .get_key_value(&route.name)
                .or_else(|| configs.get_key_value(&route.key));
            match configured {
                Some((config_key, config)) => {
                    merge_configured(route, descriptor_title, config_key, config)
                }
                None => {
                    tracing::trace!(route = %route.name, "no tab config, falling back to route name");
                    Ok(fallback(route, descriptor_title))
                }
            }
        })
        .collect()
}

fn merge_configured(
    route: &RouteRef,
    descriptor_title: Option<String>,
    config_key: &str,
    config: &TabConfig,
) -> Result<MergedTab> {
    let field = |suffix: &str| format!("tabs.{}.{suffix}", route.name);
    Ok(MergedTab {
        route_key: route.key.clone(),
        route_name: route.name.clone(),
        key: config
            .key
            .clone()
            .unwrap_or_else(|| format!("tab-{config_key}")),
        title: config
            .title
            .clone()
            .or(descriptor_title)
            .unwrap_or_else(|| route.name.clone()),
        glyph: config.icon.glyph.clone(),
        icon_color: parse_optional_color(&field("icon.color"), config.icon.color.as_deref())?,
        icon_inactive_color: parse_optional_color(
            &field("icon.inactive-color"),
            config.icon.inactive_color.as_deref(),
        )?,
        label_color: parse_optional_color(&field("label-color"), config.label_color.as_deref())?,
        background_color: parse_optional_color(
            &field("background-color"),
            config.background_color.as_deref(),
        )?,
        indicator: IndicatorStyle {
            size: config.indicator.size,
            color: parse_optional_color(&field("indicator.color"), config.indicator.color.as_deref())?,
            visible: config.indicator.visible,
        },
    })
}

fn fallback(route: &RouteRef, descriptor_title: Option<String>) -> MergedTab {
    MergedTab {
        route_key: route.key.clone(),
        route_name: route.name.clone(),
        key: route.name.clone(),
        title: descriptor_title.unwrap_or_else(|| route.name.clone()),
        glyph: None,
        icon_color: None,
        icon_inactive_color: None,
        label_color: None,
        background_color: None,
        indicator: IndicatorStyle::default(),
    }
}
