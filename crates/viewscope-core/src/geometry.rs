#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Host render trees report geometry in fractional points, so every type
//! here is `f64`-based. Rectangles are origin + size with the origin at the
//! top-left corner.

/// A point in some coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset by `dx`, `dy`.
    #[inline]
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Whether both coordinates are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Zero size.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Grow by insets on every side.
    #[inline]
    #[must_use]
    pub fn outset(self, insets: Insets) -> Self {
        Self::new(
            self.width + insets.horizontal_sum(),
            self.height + insets.vertical_sum(),
        )
    }

    /// Truncated integer dimensions, as shown in labels.
    ///
    /// Non-finite and negative values collapse to zero.
    #[inline]
    pub fn truncated(self) -> (i64, i64) {
        (truncate(self.width).max(0), truncate(self.height).max(0))
    }
}

/// Truncate toward zero, mapping non-finite input to 0.
#[inline]
pub fn truncate(v: f64) -> i64 {
    if v.is_finite() { v.trunc() as i64 } else { 0 }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f64,
    /// Top edge (inclusive).
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// The empty rectangle at the origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from an origin and a size.
    #[inline]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn mid_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    #[inline]
    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.mid_x(), self.mid_y())
    }

    /// Check if the rectangle has zero (or negative) area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Whether either dimension is below `min`.
    ///
    /// NaN dimensions count as degenerate.
    #[inline]
    pub fn is_degenerate(&self, min: f64) -> bool {
        !(self.width >= min && self.height >= min)
    }

    /// Check if a point is inside the rectangle (half-open on the far edges).
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.max_x() && point.y >= self.y && point.y < self.max_y()
    }

    /// Translate by `dx`, `dy`.
    #[inline]
    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// A rectangle of `size` centered on this rectangle's center.
    #[inline]
    #[must_use]
    pub fn centered(&self, size: Size) -> Rect {
        Rect::new(
            self.mid_x() - size.width / 2.0,
            self.mid_y() - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    /// Move this rectangle (keeping its size) so it lies inside `bounds`.
    ///
    /// When the rectangle is larger than `bounds` on an axis, it is pinned
    /// to the leading edge of `bounds` on that axis.
    #[must_use]
    pub fn clamp_within(&self, bounds: &Rect) -> Rect {
        let max_x = bounds.max_x() - self.width;
        let max_y = bounds.max_y() - self.height;
        let x = self.x.min(max_x).max(bounds.x);
        let y = self.y.min(max_y).max(bounds.y);
        Rect::new(x, y, self.width, self.height)
    }

    /// The part of this rectangle inside `clip`, `None` when they share no area.
    #[must_use]
    pub fn clipped_to(&self, clip: &Rect) -> Option<Rect> {
        let (left, top) = (self.x.max(clip.x), self.y.max(clip.y));
        let width = self.max_x().min(clip.max_x()) - left;
        let height = self.max_y().min(clip.max_y()) - top;
        (width > 0.0 && height > 0.0).then(|| Rect::new(left, top, width, height))
    }

    /// Whether all four components are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// Edge insets for label padding.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Insets {
    /// Create insets with explicit values.
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Symmetric insets: `horizontal` on left/right, `vertical` on top/bottom.
    pub const fn symmetric(horizontal: f64, vertical: f64) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }

    #[inline]
    pub fn horizontal_sum(&self) -> f64 {
        self.left + self.right
    }

    #[inline]
    pub fn vertical_sum(&self) -> f64 {
        self.top + self.bottom
    }
}
