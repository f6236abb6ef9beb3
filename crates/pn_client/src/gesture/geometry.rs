use serde::{Deserialize, Serialize};

/// Screen position in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Moves `factor` of the way toward `target`.
    pub fn lerp(&self, target: Point, factor: f64) -> Point {
        Point::new(
            self.x + (target.x - self.x) * factor,
            self.y + (target.y - self.y) * factor,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Pixel position of a point given in percent of this size.
    pub fn from_percent(&self, x_percent: f64, y_percent: f64) -> Point {
        Point::new(self.width * x_percent / 100.0, self.height * y_percent / 100.0)
    }

    /// Pixel position of a point given in normalized `[0, 1]` coordinates.
    pub fn from_normalized(&self, point: Point) -> Point {
        Point::new(point.x * self.width, point.y * self.height)
    }
}

/// Axis-aligned rectangle, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn moved_to(&self, origin: Point) -> Rect {
        Rect::new(origin.x, origin.y, self.width, self.height)
    }

    pub fn centered_at(&self, center: Point) -> Rect {
        Rect::new(center.x - self.width / 2.0, center.y - self.height / 2.0, self.width, self.height)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left() && point.x <= self.right() && point.y >= self.top() && point.y <= self.bottom()
    }

    /// Strict overlap test against `other` grown by `margin` on every side.
    pub fn overlaps_with_margin(&self, other: &Rect, margin: f64) -> bool {
        self.left() < other.right() + margin
            && self.right() > other.left() - margin
            && self.top() < other.bottom() + margin
            && self.bottom() > other.top() - margin
    }
}
