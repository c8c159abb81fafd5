//! Tab bar configuration surface.
//!
//! Everything is optional. Unset sizing and timing fields fall back to the
//! selected preset's defaults; unset tab entries fall back to the route name.
//!
//! ```toml
//! preset = "flashy"
//! icon-size = 2
//! duration-ms = 600
//! easing = "cubic-out"
//! item-inner-space = { horizontal = 2, vertical = 0 }
//! safe-area-bottom = 1
//!
//! [style]
//! background-color = "#1e1e2e"
//!
//! [tabs.Home]
//! title = "Home"
//! label-color = "#f5c2e7"
//! icon = { glyph = "⌂", color = "#f5c2e7" }
//! indicator = { size = 1, visible = true }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::Easing;
use crate::error::{Result, TabBarError};
use crate::types::Rgba;

pub const DEFAULT_PRESET: &str = "bubble";
pub const DEFAULT_LONG_PRESS: Duration = Duration::from_millis(500);

// =============================================================================
// SPACING
// =============================================================================

/// Uniform spacing or separate horizontal/vertical values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Spacing {
    Uniform(f32),
    Axes { horizontal: f32, vertical: f32 },
}

impl Spacing {
    pub fn horizontal(&self) -> f32 {
        match *self {
            Self::Uniform(v) => v,
            Self::Axes { horizontal, .. } => horizontal,
        }
    }

    pub fn vertical(&self) -> f32 {
        match *self {
            Self::Uniform(v) => v,
            Self::Axes { vertical, .. } => vertical,
        }
    }
}

/// How item containers share the bar width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemContainerWidth {
    /// Items keep their own width, spread evenly.
    #[default]
    Auto,
    /// Items grow to fill the bar.
    Fill,
}

// =============================================================================
// PER-TAB CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct IndicatorConfig {
    pub size: Option<f32>,
    pub color: Option<String>,
    pub visible: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct IconConfig {
    pub glyph: Option<String>,
    pub color: Option<String>,
    pub inactive_color: Option<String>,
}

/// Caller-supplied look of one tab, keyed by route name or route key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TabConfig {
    pub title: Option<String>,
    pub key: Option<String>,
    pub icon: IconConfig,
    pub label_color: Option<String>,
    pub background_color: Option<String>,
    pub indicator: IndicatorConfig,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BarStyle {
    pub background_color: Option<String>,
}

// =============================================================================
// TAB BAR CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TabBarConfig {
    pub preset: String,
    pub item_inner_space: Option<Spacing>,
    pub item_outer_space: Option<Spacing>,
    pub item_container_width: Option<ItemContainerWidth>,
    pub icon_size: Option<f32>,
    pub duration_ms: Option<u64>,
    pub easing: Option<Easing>,
    pub is_rtl: bool,
    pub long_press_ms: Option<u64>,
    /// Overrides the safe-area bottom inset reported by the host.
    pub safe_area_bottom: Option<f32>,
    pub style: BarStyle,
    pub tabs: HashMap<String, TabConfig>,
}

impl Default for TabBarConfig {
    fn default() -> Self {
        Self {
            preset: DEFAULT_PRESET.to_string(),
            item_inner_space: None,
            item_outer_space: None,
            item_container_width: None,
            icon_size: None,
            duration_ms: None,
            easing: None,
            is_rtl: false,
            long_press_ms: None,
            safe_area_bottom: None,
            style: BarStyle::default(),
            tabs: HashMap::new(),
        }
    }
}

impl TabBarConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate_colors()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading tab bar config");
        Self::from_toml_str(&text)
    }

    pub fn long_press(&self) -> Duration {
        self.long_press_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_LONG_PRESS)
    }

    /// Parse every color string once so bad values fail before the first frame.
    pub fn validate_colors(&self) -> Result<()> {
        parse_optional_color("style.background-color", self.style.background_color.as_deref())?;
        for (name, tab) in &self.tabs {
            let field = |suffix: &str| format!("tabs.{name}.{suffix}");
            parse_optional_color(&field("icon.color"), tab.icon.color.as_deref())?;
            parse_optional_color(&field("icon.inactive-color"), tab.icon.inactive_color.as_deref())?;
            parse_optional_color(&field("label-color"), tab.label_color.as_deref())?;
            parse_optional_color(&field("background-color"), tab.background_color.as_deref())?;
            parse_optional_color(&field("indicator.color"), tab.indicator.color.as_deref())?;
        }
        Ok(())
    }
}

/// Parse a configured color, naming the field on failure.
pub fn parse_color(field: &str, value: &str) -> Result<Rgba> {
    Rgba::parse(value).ok_or_else(|| TabBarError::InvalidColor {
        field: field.to_string(),
        value: value.to_string(),
    })
}

pub fn parse_optional_color(field: &str, value: Option<&str>) -> Result<Option<Rgba>> {
    value.map(|v| parse_color(field, v)).transpose()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TabBarConfig::from_toml_str("").unwrap();
        assert_eq!(config, TabBarConfig::default());
        assert_eq!(config.preset, "bubble");
        assert_eq!(config.long_press(), DEFAULT_LONG_PRESS);
    }

    #[test]
    fn test_full_config_parses() {
        let config = TabBarConfig::from_toml_str(
            r##"
            preset = "flashy"
            icon-size = 2
            duration-ms = 600
            easing = { elastic = { bounciness = 1.5 } }
            item-inner-space = { horizontal = 2, vertical = 0 }
            item-outer-space = 1
            item-container-width = "fill"
            is-rtl = true
            long-press-ms = 300
            safe-area-bottom = 1

            [style]
            background-color = "#1e1e2e"

            [tabs.Home]
            title = "Start"
            label-color = "red"
            icon = { glyph = "H", color = "#fff" }
            indicator = { size = 1, visible = false }
            "##,
        )
        .unwrap();

        assert_eq!(config.preset, "flashy");
        assert_eq!(config.icon_size, Some(2.0));
        assert_eq!(config.easing, Some(Easing::Elastic { bounciness: 1.5 }));
        assert_eq!(config.item_inner_space.unwrap().horizontal(), 2.0);
        assert_eq!(config.item_inner_space.unwrap().vertical(), 0.0);
        assert_eq!(config.item_outer_space, Some(Spacing::Uniform(1.0)));
        assert_eq!(config.item_container_width, Some(ItemContainerWidth::Fill));
        assert!(config.is_rtl);
        assert_eq!(config.long_press(), Duration::from_millis(300));
        let home = &config.tabs["Home"];
        assert_eq!(home.title.as_deref(), Some("Start"));
        assert_eq!(home.icon.glyph.as_deref(), Some("H"));
        assert_eq!(home.indicator.visible, Some(false));
    }

    #[test]
    fn test_plain_easing_name() {
        let config = TabBarConfig::from_toml_str("easing = \"cubic-out\"").unwrap();
        assert_eq!(config.easing, Some(Easing::CubicOut));
    }

    #[test]
    fn test_invalid_color_fails_fast() {
        let err = TabBarConfig::from_toml_str(
            r#"
            [tabs.Home]
            label-color = "blurple"
            "#,
        )
        .unwrap_err();
        match err {
            TabBarError::InvalidColor { field, value } => {
                assert_eq!(field, "tabs.Home.label-color");
                assert_eq!(value, "blurple");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        assert!(matches!(
            TabBarConfig::from_toml_str("preset = "),
            Err(TabBarError::Config(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "preset = \"flashy\"").unwrap();
        let config = TabBarConfig::load(file.path()).unwrap();
        assert_eq!(config.preset, "flashy");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        assert!(matches!(
            TabBarConfig::load("/definitely/not/here.toml"),
            Err(TabBarError::Io(_))
        ));
    }
}
