#![forbid(unsafe_code)]

//! Three-column row detection.
//!
//! Composite fields (coordinate triples, RGB editors, min/mid/max ranges)
//! split the control column into three equal parts separated by the
//! inter-control gap:
//!
//! ```text
//!   | label |gap| slot 0 |g| slot 1 |g| slot 2 |right margin|
//!             ^ anchor
//! ```
//!
//! Knowing which slot a rect sits in lets the scorer keep vertical moves in
//! the same column and horizontal moves on the same row.

use crate::bounds::PanelMetrics;
use fieldnav_core::geometry::approx_eq;
use fieldnav_core::{NavConfig, Rect};

/// Half a pixel: hosts round split column positions independently.
pub const SLOT_TOLERANCE: f32 = 0.5;

/// Position of a rect inside a three-column row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowSlot {
    First,
    Middle,
    Last,
}

impl RowSlot {
    /// Zero-based column index.
    #[inline]
    pub const fn index(self) -> u8 {
        match self {
            RowSlot::First => 0,
            RowSlot::Middle => 1,
            RowSlot::Last => 2,
        }
    }
}

/// Classifies rects against the three-column split of one panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowGroupClassifier {
    anchor: f32,
    column_width: f32,
    gap: f32,
    row_height: f32,
    double_row_height: f32,
}

impl RowGroupClassifier {
    /// Derive the split for `panel`.
    ///
    /// With a label column the controls start `prefix_gap` after it;
    /// without one they start at the left margin.
    pub fn new(panel: &PanelMetrics, config: &NavConfig) -> Self {
        let anchor = if panel.prefix_width > 0.0 {
            panel.prefix_width + config.prefix_gap
        } else {
            config.margins.left
        };
        let gap = config.inter_control_gap;
        let column_width = (panel.width - anchor - config.margins.right - 2.0 * gap) / 3.0;
        Self {
            anchor,
            column_width,
            gap,
            row_height: config.row_height,
            double_row_height: config.double_row_height(),
        }
    }

    /// X coordinate where the control column starts.
    #[inline]
    pub fn anchor(&self) -> f32 {
        self.anchor
    }

    /// Width of one of the three columns.
    #[inline]
    pub fn column_width(&self) -> f32 {
        self.column_width
    }

    /// Slot `rect` occupies, or `None` when it is not part of a
    /// three-column row.
    pub fn slot_of(&self, rect: &Rect) -> Option<RowSlot> {
        if !(self.column_width > 0.0) {
            return None;
        }
        if rect.height != self.row_height && rect.height != self.double_row_height {
            return None;
        }
        let offset = rect.x - self.anchor;
        let stride = self.column_width + self.gap;
        [RowSlot::First, RowSlot::Middle, RowSlot::Last]
            .into_iter()
            .find(|slot| approx_eq(offset, stride * f32::from(slot.index()), SLOT_TOLERANCE))
    }
}
