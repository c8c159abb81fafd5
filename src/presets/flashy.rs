use std::time::Duration;

use crate::animation::{interpolate, Easing, Extrapolate};
use crate::config::{ItemContainerWidth, Spacing};
use crate::types::Rgba;

use super::{IndicatorVisual, ItemInput, ItemVisual, Preset, PresetDefaults};

pub const DEFAULT_INDICATOR_VISIBLE: bool = true;
pub const DEFAULT_INDICATOR_SIZE: f32 = 4.0;
pub const DEFAULT_INDICATOR_COLOR: Rgba = Rgba::BLACK;

/// Icon slides up out of the container while the label slides in from
/// below; a dot grows under the focused item.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flashy;

impl Preset for Flashy {
    fn name(&self) -> &'static str {
        "flashy"
    }

    fn defaults(&self) -> PresetDefaults {
        PresetDefaults {
            item_inner_space: Spacing::Axes {
                horizontal: 1.0,
                vertical: 1.0,
            },
            item_outer_space: Spacing::Uniform(0.0),
            item_container_width: ItemContainerWidth::Auto,
            icon_size: 1.0,
            duration: Duration::from_millis(1000),
            easing: Easing::ExpOut,
        }
    }

    fn item_visual(&self, input: &ItemInput<'_>) -> ItemVisual {
        let tab = input.tab;
        let focus = input.focus;
        let icon = input.icon_size as f64;

        let label_color = tab.label_color.unwrap_or(Rgba::WHITE);
        let style = &tab.indicator;
        let indicator = style
            .visible
            .unwrap_or(DEFAULT_INDICATOR_VISIBLE)
            .then(|| {
                let size = style.size.unwrap_or(DEFAULT_INDICATOR_SIZE) as f64;
                IndicatorVisual {
                    left: input.container_width / 2.0 - size / 2.0,
                    top: input.container_height - size,
                    radius: interpolate(focus, [0.5, 1.0], [0.0, size / 2.0], Extrapolate::Clamp),
                    color: style
                        .color
                        .or(tab.label_color)
                        .unwrap_or(DEFAULT_INDICATOR_COLOR),
                }
            });

        ItemVisual {
            icon_offset_y: interpolate(
                focus,
                [0.0, 1.0],
                [icon * -0.5, icon * -1.5],
                Extrapolate::Clamp,
            ),
            label_offset_y: interpolate(
                focus,
                [0.0, 1.0],
                [input.label_height * 0.5, input.label_height * -0.5],
                Extrapolate::Clamp,
            ),
            label_opacity: 1.0,
            icon_color: tab.icon_color.unwrap_or(label_color),
            label_color,
            background: None,
            indicator,
        }
    }
}
