#![forbid(unsafe_code)]

//! Panel metrics and the rectangle candidates must fit inside.

use fieldnav_core::{NavConfig, Rect, Sides};
use serde::{Deserialize, Serialize};

/// Per-frame measurements of the panel being navigated.
///
/// Horizontal coordinates are panel-relative (the panel's left edge is 0);
/// `y` is the panel's top edge in the same space the host reports control
/// rects in.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelMetrics {
    /// Top edge of the panel.
    pub y: f32,
    /// Full panel width.
    pub width: f32,
    /// Full panel height, header included.
    pub height: f32,
    /// Height of the panel header.
    pub header_height: f32,
    /// Width of the prefix label column, measured from the panel's left
    /// edge; 0 when rows carry no labels.
    pub prefix_width: f32,
}

impl PanelMetrics {
    /// Panel at the origin with no header and no label column.
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            y: 0.0,
            width,
            height,
            header_height: 0.0,
            prefix_width: 0.0,
        }
    }

    #[must_use]
    pub const fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }

    #[must_use]
    pub const fn with_header_height(mut self, header_height: f32) -> Self {
        self.header_height = header_height;
        self
    }

    #[must_use]
    pub const fn with_prefix_width(mut self, prefix_width: f32) -> Self {
        self.prefix_width = prefix_width;
        self
    }

    /// Width left for controls after the left and right margins.
    pub fn usable_width(&self, config: &NavConfig) -> f32 {
        self.width - config.margins.horizontal_sum()
    }
}

/// Compute the rectangle a candidate must be contained in.
///
/// A panel whose height does not exceed its header (collapsed, or an empty
/// body) yields [`Rect::ZERO`], as does any combination of metrics that
/// leaves no positive area; navigation inside such a panel always fails.
pub fn panel_bounds(panel: &PanelMetrics, config: &NavConfig) -> Rect {
    if !(panel.height > panel.header_height) {
        return Rect::ZERO;
    }
    let margins = config.margins;
    let body_inset = Sides {
        top: panel.header_height + config.resize_strip_height + margins.top,
        ..margins
    };
    let bounds = Rect::new(0.0, panel.y, panel.width, panel.height).inner(body_inset);
    if bounds.is_degenerate() || !bounds.x_max().is_finite() || !bounds.y_max().is_finite() {
        return Rect::ZERO;
    }
    bounds
}
