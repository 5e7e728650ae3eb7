//! Core geometry types.
//!
//! All layout math is done in `f64` points. Pixel snapping happens only when a
//! frame is emitted (see [`Rect::aligned`]), never between chained computations.

use serde::Serialize;

/// Point in layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate, growing downward.
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Point at `(x, y)`.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height in points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// `width` by `height`.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle.
///
/// Width and height are never negative for frames produced by the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    /// Leading edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Rect {
    /// Rectangle with its top-leading corner at `(x, y)`.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of `size` with its top-leading corner at `origin`.
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Top-leading corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Width and height.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Leading edge.
    pub fn min_x(&self) -> f64 {
        self.x
    }

    /// Top edge.
    pub fn min_y(&self) -> f64 {
        self.y
    }

    /// Trailing edge.
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Horizontal center.
    pub fn mid_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Vertical center.
    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Center point.
    pub fn center(&self) -> Point {
        Point::new(self.mid_x(), self.mid_y())
    }

    /// Whether the rectangles overlap with positive area. Touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min_x() < other.max_x()
            && other.min_x() < self.max_x()
            && self.min_y() < other.max_y()
            && other.min_y() < self.max_y()
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let min_x = self.min_x().min(other.min_x());
        let min_y = self.min_y().min(other.min_y());
        let max_x = self.max_x().max(other.max_x());
        let max_y = self.max_y().max(other.max_y());
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Same size, origin moved by `(dx, dy)`.
    pub fn offset_by(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Snap to the pixel grid of a display with `scale` pixels per point.
    pub fn aligned(&self, scale: f64) -> Rect {
        Rect::new(
            align_to_pixel(self.x, scale),
            align_to_pixel(self.y, scale),
            align_to_pixel(self.width, scale),
            align_to_pixel(self.height, scale),
        )
    }
}

/// `round(value * scale) / scale`.
pub fn align_to_pixel(value: f64, scale: f64) -> f64 {
    (value * scale).round() / scale
}

/// Direction-aware edge insets (leading/trailing rather than left/right).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EdgeInsets {
    /// Inset from the top edge.
    pub top: f64,
    /// Inset from the leading edge.
    pub leading: f64,
    /// Inset from the bottom edge.
    pub bottom: f64,
    /// Inset from the trailing edge.
    pub trailing: f64,
}

impl EdgeInsets {
    /// No insets.
    pub const ZERO: Self = Self {
        top: 0.0,
        leading: 0.0,
        bottom: 0.0,
        trailing: 0.0,
    };

    /// Insets in CSS order: top, leading, bottom, trailing.
    pub fn new(top: f64, leading: f64, bottom: f64, trailing: f64) -> Self {
        Self {
            top,
            leading,
            bottom,
            trailing,
        }
    }
}

/// Axis along which months are stacked and scrolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollAxis {
    /// Months stack downward; offsets are `y` values.
    Vertical,
    /// Months sit side by side; offsets are `x` values.
    Horizontal,
}

impl ScrollAxis {
    /// Component of `point` along this axis.
    pub fn component(&self, point: Point) -> f64 {
        match self {
            Self::Vertical => point.y,
            Self::Horizontal => point.x,
        }
    }

    /// Length of `size` along this axis.
    pub fn length(&self, size: Size) -> f64 {
        match self {
            Self::Vertical => size.height,
            Self::Horizontal => size.width,
        }
    }

    /// `(min, max)` extent of `rect` along this axis.
    pub fn extent(&self, rect: &Rect) -> (f64, f64) {
        match self {
            Self::Vertical => (rect.min_y(), rect.max_y()),
            Self::Horizontal => (rect.min_x(), rect.max_x()),
        }
    }

    /// `rect` moved by `delta` along this axis.
    pub fn offset(&self, rect: &Rect, delta: f64) -> Rect {
        match self {
            Self::Vertical => rect.offset_by(0.0, delta),
            Self::Horizontal => rect.offset_by(delta, 0.0),
        }
    }
}
