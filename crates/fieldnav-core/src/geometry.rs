#![forbid(unsafe_code)]

//! Geometric primitives.

use serde::{Deserialize, Serialize};

/// A control rectangle as reported by the host for the last render pass.
///
/// Uses panel coordinates in pixels (origin at top-left). Equality is exact;
/// callers that need tolerance use [`approx_eq`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f32,
    /// Top edge (inclusive).
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Rect {
    /// The zero rectangle.
    pub const ZERO: Rect = Rect::new(0.0, 0.0, 0.0, 0.0);

    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn x_max(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn y_max(&self) -> f32 {
        self.y + self.height
    }

    /// True when the rectangle has no usable extent on either axis.
    ///
    /// Some host control types never report real geometry and come back as
    /// zero-sized rects.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// True when `other` lies within this rectangle's horizontal extent.
    #[inline]
    pub fn contains_horizontally(&self, other: &Rect) -> bool {
        other.x >= self.x && other.x_max() <= self.x_max()
    }

    /// True when `other` lies within this rectangle's vertical extent.
    #[inline]
    pub fn contains_vertically(&self, other: &Rect) -> bool {
        other.y >= self.y && other.y_max() <= self.y_max()
    }

    /// True when `other` is fully contained on both axes.
    #[inline]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.contains_horizontally(other) && self.contains_vertically(other)
    }

    /// True when the two rectangles share some vertical span.
    #[inline]
    pub fn overlaps_vertically(&self, other: &Rect) -> bool {
        self.y < other.y_max() && other.y < self.y_max()
    }

    /// Create a new rectangle inside the current one with the given margin.
    ///
    /// Collapses to zero width/height instead of going negative.
    pub fn inner(&self, margin: Sides) -> Rect {
        Rect {
            x: self.x + margin.left,
            y: self.y + margin.top,
            width: (self.width - margin.horizontal_sum()).max(0.0),
            height: (self.height - margin.vertical_sum()).max(0.0),
        }
    }
}

/// Compare two coordinates within `tolerance` pixels.
#[inline]
pub fn approx_eq(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() <= tolerance
}

/// Sides for panel margins.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sides {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Sides {
    /// Create new sides with equal values.
    pub const fn all(val: f32) -> Self {
        Self {
            top: val,
            right: val,
            bottom: val,
            left: val,
        }
    }

    /// Create new sides with specific values.
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Sum of left and right.
    #[inline]
    pub fn horizontal_sum(&self) -> f32 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    #[inline]
    pub fn vertical_sum(&self) -> f32 {
        self.top + self.bottom
    }

    fn values(&self) -> [f32; 4] {
        [self.top, self.right, self.bottom, self.left]
    }

    /// True when every side is finite and non-negative.
    pub fn is_well_formed(&self) -> bool {
        self.values().iter().all(|v| v.is_finite() && *v >= 0.0)
    }
}

impl From<f32> for Sides {
    fn from(val: f32) -> Self {
        Self::all(val)
    }
}

impl From<(f32, f32, f32, f32)> for Sides {
    fn from((top, right, bottom, left): (f32, f32, f32, f32)) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Rect, Sides, approx_eq};

    #[test]
    fn rect_edges() {
        let rect = Rect::new(12.0, 18.0, 66.0, 16.0);
        assert_eq!(rect.x_max(), 78.0);
        assert_eq!(rect.y_max(), 34.0);
    }

    #[test]
    fn degenerate_rects() {
        assert!(Rect::ZERO.is_degenerate());
        assert!(Rect::new(5.0, 5.0, 0.0, 16.0).is_degenerate());
        assert!(Rect::new(5.0, 5.0, 10.0, 0.0).is_degenerate());
        assert!(Rect::new(5.0, 5.0, f32::NAN, 16.0).is_degenerate());
        assert!(!Rect::new(5.0, 5.0, 1.0, 1.0).is_degenerate());
    }

    #[test]
    fn containment_is_inclusive_of_edges() {
        let bounds = Rect::new(12.0, 0.0, 202.0, 100.0);
        assert!(bounds.contains_rect(&Rect::new(12.0, 0.0, 202.0, 16.0)));
        assert!(bounds.contains_rect(&Rect::new(148.0, 84.0, 66.0, 16.0)));
        assert!(!bounds.contains_rect(&Rect::new(11.0, 0.0, 10.0, 16.0)));
        assert!(!bounds.contains_rect(&Rect::new(12.0, 90.0, 10.0, 16.0)));
    }

    #[test]
    fn per_axis_containment() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
        let wide = Rect::new(-5.0, 10.0, 20.0, 10.0);
        assert!(!bounds.contains_horizontally(&wide));
        assert!(bounds.contains_vertically(&wide));
    }

    #[test]
    fn vertical_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 16.0);
        assert!(a.overlaps_vertically(&Rect::new(40.0, 8.0, 10.0, 16.0)));
        assert!(!a.overlaps_vertically(&Rect::new(0.0, 16.0, 10.0, 16.0)));
    }

    #[test]
    fn rect_inner_reduces_and_clamps() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let inner = rect.inner(Sides::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(inner, Rect::new(4.0, 1.0, 4.0, 6.0));

        let collapsed = rect.inner(Sides::all(8.0));
        assert_eq!(collapsed.width, 0.0);
        assert_eq!(collapsed.height, 0.0);
    }

    #[test]
    fn sides_conversions_and_sums() {
        assert_eq!(Sides::all(3.0), Sides::from(3.0));
        let sides = Sides::from((1.0, 2.0, 3.0, 4.0));
        assert_eq!(sides, Sides::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(sides.horizontal_sum(), 6.0);
        assert_eq!(sides.vertical_sum(), 4.0);
        assert!(sides.is_well_formed());
        assert!(!Sides::new(-1.0, 0.0, 0.0, 0.0).is_well_formed());
        assert!(!Sides::new(0.0, f32::INFINITY, 0.0, 0.0).is_well_formed());
    }

    #[test]
    fn approx_eq_tolerance() {
        assert!(approx_eq(80.0, 80.4, 0.5));
        assert!(!approx_eq(80.0, 80.6, 0.5));
    }

    #[test]
    fn rect_json_shape() {
        let json = serde_json::to_string(&Rect::new(1.0, 2.0, 3.0, 4.0)).expect("serialize");
        assert_eq!(json, r#"{"x":1.0,"y":2.0,"width":3.0,"height":4.0}"#);
    }
}
