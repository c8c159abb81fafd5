use std::time::Duration;

use crate::animation::{interpolate, Easing, Extrapolate};
use crate::config::{ItemContainerWidth, Spacing};
use crate::types::Rgba;

use super::{BackgroundVisual, ItemInput, ItemVisual, Preset, PresetDefaults};

const DEFAULT_ACTIVE_COLOR: Rgba = Rgba::WHITE;
const DEFAULT_INACTIVE_COLOR: Rgba = Rgba::GRAY;
const DEFAULT_BACKGROUND: Rgba = Rgba::rgb(68, 71, 90);

/// A background pill grows from the icon to the full container and the
/// label fades in beside the icon.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bubble;

impl Preset for Bubble {
    fn name(&self) -> &'static str {
        "bubble"
    }

    fn defaults(&self) -> PresetDefaults {
        PresetDefaults {
            item_inner_space: Spacing::Axes {
                horizontal: 1.0,
                vertical: 0.0,
            },
            item_outer_space: Spacing::Uniform(0.0),
            item_container_width: ItemContainerWidth::Auto,
            icon_size: 1.0,
            duration: Duration::from_millis(500),
            easing: Easing::BUBBLE,
        }
    }

    fn item_visual(&self, input: &ItemInput<'_>) -> ItemVisual {
        let tab = input.tab;
        let focus = input.focus;
        let collapsed = input.icon_size as f64 + input.inner_space.horizontal() as f64 * 2.0;
        let focused = focus >= 0.5;

        let active = tab.icon_color.unwrap_or(DEFAULT_ACTIVE_COLOR);
        let inactive = tab.icon_inactive_color.unwrap_or(DEFAULT_INACTIVE_COLOR);

        ItemVisual {
            icon_offset_y: 0.0,
            label_offset_y: 0.0,
            label_opacity: interpolate(focus, [0.33, 1.0], [0.0, 1.0], Extrapolate::Clamp),
            icon_color: if focused { active } else { inactive },
            label_color: tab.label_color.unwrap_or(active),
            background: Some(BackgroundVisual {
                width: interpolate(
                    focus,
                    [0.0, 1.0],
                    [collapsed, input.container_width],
                    Extrapolate::Clamp,
                ),
                color: tab.background_color.unwrap_or(DEFAULT_BACKGROUND).fade(focus),
            }),
            indicator: None,
        }
    }
}
