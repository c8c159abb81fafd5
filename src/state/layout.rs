//! Layout feedback - measured sizes mirrored into shared scalars.
//!
//! Layout callbacks run on the main context and write here; animated styles
//! read the cells. Nothing in this module schedules another layout pass.

use crate::shared::SharedScalar;

/// BarHeight, written by the bar container's layout callback.
#[derive(Debug, Clone, Default)]
pub struct BarLayout {
    height: SharedScalar,
}

impl BarLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn height_cell(&self) -> SharedScalar {
        self.height.clone()
    }

    pub fn height(&self) -> f64 {
        self.height.get()
    }

    pub fn on_layout(&self, height: f32) {
        self.height.set(height as f64);
    }
}

/// PerItemLayout plus the item's grow-only container width.
#[derive(Debug, Clone)]
pub struct ItemLayout {
    label_width: SharedScalar,
    label_height: SharedScalar,
    container_width: SharedScalar,
    inner_horizontal: f64,
}

impl ItemLayout {
    /// Before any label measurement the container wraps just the icon.
    pub fn new(icon_size: f32, inner_horizontal: f32) -> Self {
        let inner_horizontal = inner_horizontal as f64;
        Self {
            label_width: SharedScalar::default(),
            label_height: SharedScalar::default(),
            container_width: SharedScalar::new(icon_size as f64 + inner_horizontal * 2.0),
            inner_horizontal,
        }
    }

    /// Record a label measurement. Returns the container width afterwards.
    ///
    /// The container only ever grows, so the width stays put while the label
    /// reflows during a focus transition.
    pub fn on_label_layout(&self, width: f32, height: f32) -> f64 {
        let width = width as f64;
        self.label_width.set(width);
        self.label_height.set(height as f64);

        let previous = self.container_width.get();
        let next = (width + self.inner_horizontal * 2.0).max(previous);
        if next > previous {
            self.container_width.set(next);
            tracing::trace!(previous, next, "item container grew");
        }
        next
    }

    pub fn label_width(&self) -> f64 {
        self.label_width.get()
    }

    pub fn label_height(&self) -> f64 {
        self.label_height.get()
    }

    pub fn container_width(&self) -> f64 {
        self.container_width.get()
    }
}
