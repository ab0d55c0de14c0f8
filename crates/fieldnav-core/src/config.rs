#![forbid(unsafe_code)]

//! Host/theme metrics consumed by the navigation resolver.
//!
//! All lengths are in pixels. The defaults describe a compact inspector
//! theme: 16px text rows separated by 2px, fields inset 12px from the panel's
//! left edge and 4px from its right edge.

use crate::geometry::Sides;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default height of one text row.
pub const DEFAULT_ROW_HEIGHT: f32 = 16.0;
/// Default vertical gap between consecutive rows.
pub const DEFAULT_ROW_SPACING: f32 = 2.0;
/// Default number of rows a multi-line text area occupies.
pub const DEFAULT_TEXT_AREA_ROWS: u32 = 3;
/// Default height of the drag strip between a panel header and its body.
pub const DEFAULT_RESIZE_STRIP_HEIGHT: f32 = 4.0;
/// Default gap between a prefix label column and its control.
pub const DEFAULT_PREFIX_GAP: f32 = 2.0;
/// Default gap between sibling controls on one row.
pub const DEFAULT_INTER_CONTROL_GAP: f32 = 2.0;
/// Default consecutive out-of-bounds rejections before a scan aborts.
pub const DEFAULT_ABORT_THRESHOLD: u32 = 100;
/// Default number of ids the first (narrow) pass may cover.
pub const DEFAULT_FIRST_PASS_SPAN: u64 = 100;
/// Default number of ids the second pass adds past the end hint.
pub const DEFAULT_SECOND_PASS_WIDENING: u64 = 200;

/// Layout metrics and scan limits for one panel style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Height of a single-line control.
    pub row_height: f32,
    /// Vertical gap between rows.
    pub row_spacing: f32,
    /// Rows occupied by a multi-line text area.
    pub text_area_rows: u32,
    /// Panel body margins.
    pub margins: Sides,
    /// Height of the resize handle strip under the header.
    pub resize_strip_height: f32,
    /// Gap between the prefix label column and the control column.
    pub prefix_gap: f32,
    /// Gap between sibling controls on one row.
    pub inter_control_gap: f32,
    /// Consecutive out-of-bounds candidates tolerated before a scan aborts.
    pub abort_threshold: u32,
    /// Maximum ids covered by the first pass on either side of the focus.
    pub first_pass_span: u64,
    /// Ids added past the end hint by the second pass.
    pub second_pass_widening: u64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            row_spacing: DEFAULT_ROW_SPACING,
            text_area_rows: DEFAULT_TEXT_AREA_ROWS,
            margins: Sides::new(2.0, 4.0, 2.0, 12.0),
            resize_strip_height: DEFAULT_RESIZE_STRIP_HEIGHT,
            prefix_gap: DEFAULT_PREFIX_GAP,
            inter_control_gap: DEFAULT_INTER_CONTROL_GAP,
            abort_threshold: DEFAULT_ABORT_THRESHOLD,
            first_pass_span: DEFAULT_FIRST_PASS_SPAN,
            second_pass_widening: DEFAULT_SECOND_PASS_WIDENING,
        }
    }
}

impl NavConfig {
    /// Create a config with default metrics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the single row height.
    #[must_use]
    pub fn with_row_height(mut self, row_height: f32) -> Self {
        self.row_height = row_height;
        self
    }

    /// Set the vertical gap between rows.
    #[must_use]
    pub fn with_row_spacing(mut self, row_spacing: f32) -> Self {
        self.row_spacing = row_spacing;
        self
    }

    /// Set the panel body margins.
    #[must_use]
    pub fn with_margins(mut self, margins: impl Into<Sides>) -> Self {
        self.margins = margins.into();
        self
    }

    /// Set only the top margin.
    #[must_use]
    pub fn with_top_margin(mut self, top: f32) -> Self {
        self.margins.top = top;
        self
    }

    /// Set the resize strip height.
    #[must_use]
    pub fn with_resize_strip_height(mut self, height: f32) -> Self {
        self.resize_strip_height = height;
        self
    }

    /// Set the prefix-to-control gap.
    #[must_use]
    pub fn with_prefix_gap(mut self, gap: f32) -> Self {
        self.prefix_gap = gap;
        self
    }

    /// Set the gap between sibling controls.
    #[must_use]
    pub fn with_inter_control_gap(mut self, gap: f32) -> Self {
        self.inter_control_gap = gap;
        self
    }

    /// Set the out-of-bounds abort threshold.
    #[must_use]
    pub fn with_abort_threshold(mut self, threshold: u32) -> Self {
        self.abort_threshold = threshold;
        self
    }

    /// Set the first-pass id span.
    #[must_use]
    pub fn with_first_pass_span(mut self, span: u64) -> Self {
        self.first_pass_span = span;
        self
    }

    /// Set the second-pass widening.
    #[must_use]
    pub fn with_second_pass_widening(mut self, widening: u64) -> Self {
        self.second_pass_widening = widening;
        self
    }

    /// Distance between the tops of two consecutive single rows.
    #[inline]
    pub fn row_step(&self) -> f32 {
        self.row_height + self.row_spacing
    }

    /// Height of a control spanning two rows (including the gap between).
    #[inline]
    pub fn double_row_height(&self) -> f32 {
        2.0 * self.row_height + self.row_spacing
    }

    /// Height of a multi-line text area.
    #[inline]
    pub fn text_area_height(&self) -> f32 {
        let rows = self.text_area_rows.max(1) as f32;
        rows * self.row_height + (rows - 1.0) * self.row_spacing
    }

    /// Check that every metric is usable.
    pub fn validate(&self) -> Result<(), NavConfigError> {
        if !(self.row_height.is_finite() && self.row_height > 0.0) {
            return Err(NavConfigError::InvalidRowHeight(self.row_height));
        }
        let lengths = [
            ("row_spacing", self.row_spacing),
            ("resize_strip_height", self.resize_strip_height),
            ("prefix_gap", self.prefix_gap),
            ("inter_control_gap", self.inter_control_gap),
        ];
        for (field, value) in lengths {
            if !(value.is_finite() && value >= 0.0) {
                return Err(NavConfigError::InvalidLength { field, value });
            }
        }
        if !self.margins.is_well_formed() {
            return Err(NavConfigError::InvalidMargins(self.margins));
        }
        if self.abort_threshold == 0 {
            return Err(NavConfigError::ZeroAbortThreshold);
        }
        Ok(())
    }
}

/// Rejected configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum NavConfigError {
    /// Row height must be finite and positive.
    InvalidRowHeight(f32),
    /// A length must be finite and non-negative.
    InvalidLength { field: &'static str, value: f32 },
    /// Margins must be finite and non-negative.
    InvalidMargins(Sides),
    /// A zero threshold would abort every scan before it starts.
    ZeroAbortThreshold,
}

impl fmt::Display for NavConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRowHeight(value) => {
                write!(f, "invalid row height {value} (must be finite and > 0)")
            }
            Self::InvalidLength { field, value } => {
                write!(f, "invalid {field} {value} (must be finite and >= 0)")
            }
            Self::InvalidMargins(sides) => write!(
                f,
                "invalid margins top={} right={} bottom={} left={} (must be finite and >= 0)",
                sides.top, sides.right, sides.bottom, sides.left
            ),
            Self::ZeroAbortThreshold => write!(f, "abort threshold must be at least 1"),
        }
    }
}

impl std::error::Error for NavConfigError {}
