//! Shared scalars - cells readable and writable across execution contexts.
//!
//! The tab bar runs on two contexts: the main context (navigation side
//! effects, layout callbacks, signals) and the animation context (frame ticks,
//! gesture confirmation, convergences). Values both sides need live here, in
//! atomics, instead of in signals.
//!
//! # Writer roles
//!
//! Every cell has exactly one writer category:
//!
//! | Cell                | Writer                                            |
//! |---------------------|---------------------------------------------------|
//! | BarHeight           | main (bar layout callback)                        |
//! | PerItemLayout       | main (label layout callback), owning item only    |
//! | Item hit region     | main (layout pass), owning item only              |
//! | VisibilityIntent    | main (navigation sync)                            |
//! | VisibilityPosition  | animation                                         |
//! | FocusPosition       | animation, owning item only                       |
//! | SelectedIndex       | main (navigation mirror) and animation (tap)      |
//! | MirroredIndex       | main (navigation mirror)                          |
//!
//! SelectedIndex is the one cell with two writers. Both write whole values in
//! place, so the last store in program order wins. The navigation mirror
//! stores MirroredIndex before SelectedIndex, so a frame that reads the
//! mirrored value from SelectedIndex also sees it in MirroredIndex.
//!
//! # Happens-before
//!
//! Stores are `Release`, loads are `Acquire`. A store made before the
//! animation context starts frame N is visible to every read in frame N,
//! including the reaction evaluation that closes the frame.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};

use crate::types::LayoutBox;

/// Sentinel stored in a [`SharedIndex`] before the first sync.
pub const UNSET: i64 = -1;

// =============================================================================
// SHARED SCALAR
// =============================================================================

/// A shared `f64` cell (stored as bits in an `AtomicU64`).
#[derive(Debug, Clone)]
pub struct SharedScalar {
    bits: Arc<AtomicU64>,
}

impl SharedScalar {
    pub fn new(value: f64) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(value.to_bits())),
        }
    }

    #[inline]
    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }

    #[inline]
    pub fn set(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Release);
    }
}

impl Default for SharedScalar {
    fn default() -> Self {
        Self::new(0.0)
    }
}

// =============================================================================
// SHARED INDEX
// =============================================================================

/// A shared tab index with an "unset" sentinel.
#[derive(Debug, Clone)]
pub struct SharedIndex {
    cell: Arc<AtomicI64>,
}

impl SharedIndex {
    /// Create an unset index.
    pub fn unset() -> Self {
        Self {
            cell: Arc::new(AtomicI64::new(UNSET)),
        }
    }

    pub fn with(index: usize) -> Self {
        Self {
            cell: Arc::new(AtomicI64::new(index_to_raw(index))),
        }
    }

    /// Current index, or `None` before the first write.
    #[inline]
    pub fn get(&self) -> Option<usize> {
        raw_to_index(self.raw())
    }

    /// Raw cell value (`UNSET` before the first write).
    #[inline]
    pub fn raw(&self) -> i64 {
        self.cell.load(Ordering::Acquire)
    }

    /// Overwrite the index in place, returning the previous value.
    #[inline]
    pub fn set(&self, index: usize) -> Option<usize> {
        raw_to_index(self.cell.swap(index_to_raw(index), Ordering::AcqRel))
    }

    /// Reset to the unset sentinel.
    pub fn clear(&self) {
        self.cell.store(UNSET, Ordering::Release);
    }
}

#[inline]
fn index_to_raw(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}

#[inline]
fn raw_to_index(raw: i64) -> Option<usize> {
    usize::try_from(raw).ok()
}

// =============================================================================
// SHARED FLAG
// =============================================================================

/// A shared boolean cell.
#[derive(Debug, Clone)]
pub struct SharedFlag {
    flag: Arc<AtomicBool>,
}

impl SharedFlag {
    pub fn new(value: bool) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(value)),
        }
    }

    #[inline]
    pub fn get(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: bool) {
        self.flag.store(value, Ordering::Release);
    }
}

// =============================================================================
// SHARED RECT
// =============================================================================

/// A hit region written by the layout pass and read by gesture recognizers.
#[derive(Debug, Clone, Default)]
pub struct SharedRect {
    x: SharedScalar,
    y: SharedScalar,
    width: SharedScalar,
    height: SharedScalar,
}

impl SharedRect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, rect: LayoutBox) {
        self.x.set(rect.x as f64);
        self.y.set(rect.y as f64);
        self.width.set(rect.width as f64);
        self.height.set(rect.height as f64);
    }

    pub fn get(&self) -> LayoutBox {
        LayoutBox::new(
            self.x.get() as f32,
            self.y.get() as f32,
            self.width.get() as f32,
            self.height.get() as f32,
        )
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_scalar_clone_shares_cell() {
        let a = SharedScalar::new(1.5);
        let b = a.clone();
        b.set(-3.25);
        assert_eq!(a.get(), -3.25);
    }

    #[test]
    fn test_index_starts_unset() {
        let index = SharedIndex::unset();
        assert_eq!(index.get(), None);
        assert_eq!(index.raw(), UNSET);
    }

    #[test]
    fn test_index_set_returns_previous() {
        let index = SharedIndex::with(2);
        assert_eq!(index.set(4), Some(2));
        assert_eq!(index.get(), Some(4));
        index.clear();
        assert_eq!(index.get(), None);
    }

    #[test]
    fn test_index_visible_across_threads() {
        let index = SharedIndex::unset();
        let writer = index.clone();
        thread::spawn(move || {
            writer.set(3);
        })
        .join()
        .unwrap();
        assert_eq!(index.get(), Some(3));
    }

    #[test]
    fn test_rect_round_trip() {
        let rect = SharedRect::new();
        rect.set(LayoutBox::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(rect.get(), LayoutBox::new(1.0, 2.0, 3.0, 4.0));
    }
}
