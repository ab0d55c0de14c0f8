#![forbid(unsafe_code)]

//! Predicates about where the focused control sits inside its panel.
//!
//! Owners use these to decide whether an arrow key should leave the panel
//! before running a full directional query, and to notice when the host's
//! own focus cycling has walked focus out of the panel.

use crate::bounds::{PanelMetrics, panel_bounds};
use crate::row_group::{RowGroupClassifier, RowSlot};
use fieldnav_core::geometry::approx_eq;
use fieldnav_core::{NavConfig, Rect};

/// Tolerance for "reaches the right edge" and "starts at the anchor".
pub const EDGE_TOLERANCE: f32 = 0.5;

/// First/last/out-of-bounds checks for one panel.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryClassifier {
    bounds: Rect,
    classifier: RowGroupClassifier,
    row_height: f32,
    row_step: f32,
}

impl BoundaryClassifier {
    pub fn new(panel: &PanelMetrics, config: &NavConfig) -> Self {
        Self {
            bounds: panel_bounds(panel, config),
            classifier: RowGroupClassifier::new(panel, config),
            row_height: config.row_height,
            row_step: config.row_step(),
        }
    }

    /// Bounds the checks are made against.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// True when `focused` is the first field of the panel.
    ///
    /// The rect must start within one row of the bounds top, and not above
    /// it. `None` (nothing focused) is never first. Degenerate rects cannot be
    /// placed, so they count as first only in panels too short to hold two
    /// rows.
    pub fn is_first_field(&self, focused: Option<Rect>) -> bool {
        let Some(rect) = focused else {
            return false;
        };
        if rect.is_degenerate() {
            return self.interior_below_two_rows();
        }
        let below_top = rect.y - self.bounds.y;
        below_top >= -EDGE_TOLERANCE
            && below_top <= self.row_height
            && (self.is_sole_on_row(&rect) || self.classifier.slot_of(&rect) == Some(RowSlot::First))
    }

    /// True when `focused` is the last field of the panel.
    pub fn is_last_field(&self, focused: Option<Rect>) -> bool {
        let Some(rect) = focused else {
            return false;
        };
        if rect.is_degenerate() {
            return self.interior_below_two_rows();
        }
        let above_bottom = self.bounds.y_max() - rect.y_max();
        above_bottom >= -EDGE_TOLERANCE
            && above_bottom <= self.row_height
            && (self.is_sole_on_row(&rect) || self.classifier.slot_of(&rect) == Some(RowSlot::Last))
    }

    /// True when `focused` is not fully inside the bounds on either axis.
    pub fn is_out_of_bounds(&self, focused: &Rect) -> bool {
        !self.bounds.contains_vertically(focused) || !self.bounds.contains_horizontally(focused)
    }

    fn interior_below_two_rows(&self) -> bool {
        self.bounds.height < 2.0 * self.row_step
    }

    /// Starts at the left margin or the control column and runs to the
    /// right edge.
    fn is_sole_on_row(&self, rect: &Rect) -> bool {
        let starts_at_anchor = approx_eq(rect.x, self.bounds.x, EDGE_TOLERANCE)
            || approx_eq(rect.x, self.classifier.anchor(), EDGE_TOLERANCE);
        starts_at_anchor && approx_eq(rect.x_max(), self.bounds.x_max(), EDGE_TOLERANCE)
    }
}
