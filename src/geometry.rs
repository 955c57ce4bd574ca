use serde::{Deserialize, Serialize};

/// A point in global screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Usable area of one screen. `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ScreenRect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_origin_size(origin: Point, width: i32, height: i32) -> Self {
        Self::new(origin.x, origin.y, origin.x + width, origin.y + height)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x < self.right && p.y >= self.top && p.y < self.bottom
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Squared distance from `p` to the closest point of the rect, 0 inside.
    pub fn distance_sq(&self, p: Point) -> i64 {
        let dx = (self.left - p.x).max(0).max(p.x - (self.right - 1)) as i64;
        let dy = (self.top - p.y).max(0).max(p.y - (self.bottom - 1)) as i64;
        dx * dx + dy * dy
    }
}

/// `max(lo, min(v, hi))`. When the range is inverted the result pins to `lo`.
pub fn clamp_axis(v: i32, lo: i32, hi: i32) -> i32 {
    lo.max(v.min(hi))
}

/// Clamp a square edge length into `[min, max]`.
pub fn clamp_size(size: i64, min: u32, max: u32) -> u32 {
    let min = min as i64;
    let max = (max as i64).max(min);
    size.clamp(min, max) as u32
}

/// Keep a `width` x `height` box at `pos` inside `screen`, `margin` away from
/// every edge.
pub fn clamp_to_screen(pos: Point, width: i32, height: i32, screen: ScreenRect, margin: i32) -> Point {
    Point::new(
        clamp_axis(
            pos.x,
            screen.left + margin,
            screen.right - width - margin,
        ),
        clamp_axis(
            pos.y,
            screen.top + margin,
            screen.bottom - height - margin,
        ),
    )
}
