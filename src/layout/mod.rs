//! Layout Module - bar layout through Taffy
//!
//! The bar is a one-level flex tree:
//!
//! ```text
//! bar (row | row-reverse, padding-bottom = safe area)
//! ├── item outer (padding = outer space, flex-grow 1 in fill mode)
//! │   └── item container (containerWidth × containerHeight)
//! └── ...
//! ```
//!
//! [`measure_bar`] computes that tree and returns absolute frames. Callers
//! feed the results into the layout callbacks (BarHeight, hit regions).

mod text_measure;

pub use text_measure::{string_width, CellTextMeasure, TextMeasure};

use taffy::{
    AvailableSpace, Dimension, Display, FlexDirection, JustifyContent, LengthPercentage, NodeId,
    Rect, Size, Style, TaffyTree,
};

use crate::config::{ItemContainerWidth, Spacing};
use crate::error::{Result, TabBarError};
use crate::types::LayoutBox;

/// Inputs of one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BarLayoutInput {
    pub available_width: f32,
    pub is_rtl: bool,
    pub container_width_mode: ItemContainerWidth,
    pub outer_space: Spacing,
    pub safe_area_bottom: f32,
    /// `(width, height)` of each item container, in route order.
    pub item_containers: Vec<(f32, f32)>,
}

/// Frames produced by one layout pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeasuredLayout {
    pub bar: LayoutBox,
    /// Outer frame of each item (its hit region), in route order.
    pub items: Vec<LayoutBox>,
}

impl MeasuredLayout {
    pub fn bar_height(&self) -> f32 {
        self.bar.height
    }
}

fn layout_error(err: taffy::TaffyError) -> TabBarError {
    TabBarError::Layout(err.to_string())
}

fn bar_style(input: &BarLayoutInput) -> Style {
    Style {
        display: Display::Flex,
        flex_direction: if input.is_rtl {
            FlexDirection::RowReverse
        } else {
            FlexDirection::Row
        },
        justify_content: Some(JustifyContent::SpaceEvenly),
        size: Size {
            width: Dimension::Length(input.available_width),
            height: Dimension::Auto,
        },
        padding: Rect {
            top: LengthPercentage::Length(0.0),
            right: LengthPercentage::Length(0.0),
            bottom: LengthPercentage::Length(input.safe_area_bottom),
            left: LengthPercentage::Length(0.0),
        },
        ..Default::default()
    }
}

fn item_outer_style(input: &BarLayoutInput) -> Style {
    let horizontal = LengthPercentage::Length(input.outer_space.horizontal());
    let vertical = LengthPercentage::Length(input.outer_space.vertical());
    Style {
        display: Display::Flex,
        justify_content: Some(JustifyContent::Center),
        flex_grow: match input.container_width_mode {
            ItemContainerWidth::Fill => 1.0,
            ItemContainerWidth::Auto => 0.0,
        },
        flex_shrink: 1.0,
        padding: Rect {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        },
        ..Default::default()
    }
}

fn item_container_style(width: f32, height: f32) -> Style {
    Style {
        size: Size {
            width: Dimension::Length(width),
            height: Dimension::Length(height),
        },
        flex_shrink: 0.0,
        ..Default::default()
    }
}

/// Run one layout pass over the bar.
pub fn measure_bar(input: &BarLayoutInput) -> Result<MeasuredLayout> {
    let mut tree: TaffyTree<()> = TaffyTree::new();

    let mut outers: Vec<NodeId> = Vec::with_capacity(input.item_containers.len());
    for &(width, height) in &input.item_containers {
        let container = tree
            .new_leaf(item_container_style(width, height))
            .map_err(layout_error)?;
        let outer = tree
            .new_with_children(item_outer_style(input), &[container])
            .map_err(layout_error)?;
        outers.push(outer);
    }
    let root = tree
        .new_with_children(bar_style(input), &outers)
        .map_err(layout_error)?;

    let available = Size {
        width: AvailableSpace::Definite(input.available_width),
        height: AvailableSpace::MaxContent,
    };
    tree.compute_layout(root, available).map_err(layout_error)?;

    let root_layout = tree.layout(root).map_err(layout_error)?;
    let bar = LayoutBox::new(
        root_layout.location.x,
        root_layout.location.y,
        root_layout.size.width,
        root_layout.size.height,
    );

    // Item locations are relative to the bar.
    let items = outers
        .iter()
        .map(|&node| {
            tree.layout(node).map_err(layout_error).map(|l| {
                LayoutBox::new(
                    bar.x + l.location.x,
                    bar.y + l.location.y,
                    l.size.width,
                    l.size.height,
                )
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::trace!(height = bar.height, items = items.len(), "bar layout pass");
    Ok(MeasuredLayout { bar, items })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(items: Vec<(f32, f32)>) -> BarLayoutInput {
        BarLayoutInput {
            available_width: 30.0,
            is_rtl: false,
            container_width_mode: ItemContainerWidth::Auto,
            outer_space: Spacing::Uniform(0.0),
            safe_area_bottom: 0.0,
            item_containers: items,
        }
    }

    #[test]
    fn test_bar_height_includes_padding_and_safe_area() {
        let mut input = input(vec![(4.0, 2.0), (4.0, 2.0)]);
        input.outer_space = Spacing::Axes {
            horizontal: 1.0,
            vertical: 1.0,
        };
        input.safe_area_bottom = 1.0;
        let layout = measure_bar(&input).unwrap();
        assert_eq!(layout.bar_height(), 5.0);
        assert_eq!(layout.bar.width, 30.0);
        assert_eq!(layout.items.len(), 2);
        assert_eq!(layout.items[0].width, 6.0);
        assert_eq!(layout.items[0].height, 4.0);
    }

    #[test]
    fn test_items_spread_left_to_right() {
        let layout = measure_bar(&input(vec![(6.0, 1.0), (6.0, 1.0), (6.0, 1.0)])).unwrap();
        assert!(layout.items[0].x < layout.items[1].x);
        assert!(layout.items[1].x < layout.items[2].x);
        // space-evenly: 12 free cells, 3 per gap
        assert_eq!(layout.items[0].x, 3.0);
        assert_eq!(layout.items[1].x, 12.0);
    }

    #[test]
    fn test_rtl_reverses_order() {
        let mut input = input(vec![(4.0, 1.0), (4.0, 1.0)]);
        input.is_rtl = true;
        let layout = measure_bar(&input).unwrap();
        assert!(layout.items[0].x > layout.items[1].x);
    }

    #[test]
    fn test_fill_mode_shares_width() {
        let mut input = input(vec![(4.0, 1.0), (4.0, 1.0)]);
        input.container_width_mode = ItemContainerWidth::Fill;
        let layout = measure_bar(&input).unwrap();
        assert_eq!(layout.items[0].width, 15.0);
        assert_eq!(layout.items[1].x, 15.0);
    }

    #[test]
    fn test_empty_bar() {
        let layout = measure_bar(&input(vec![])).unwrap();
        assert!(layout.items.is_empty());
        assert_eq!(layout.bar_height(), 0.0);
    }
}
