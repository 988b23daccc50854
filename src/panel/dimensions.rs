//! Logical-coordinate primitives.
//!
//! Everything is f64; integer rounding happens only when a box is committed
//! to the host's render tree.

use crate::utils::round_at_commit;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl From<(f64, f64)> for Size {
    fn from((w, h): (f64, f64)) -> Self {
        Self { w, h }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub loc: Point,
    pub size: Size,
}

impl Rect {
    pub fn from_loc_and_size(loc: impl Into<Point>, size: impl Into<Size>) -> Self {
        Self {
            loc: loc.into(),
            size: size.into(),
        }
    }

    pub fn right(&self) -> f64 {
        self.loc.x + self.size.w
    }

    pub fn bottom(&self) -> f64 {
        self.loc.y + self.size.h
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.loc.x
            && point.x < self.right()
            && point.y >= self.loc.y
            && point.y < self.bottom()
    }

    /// Rounds all four edges to integers, reconstructing the size from the
    /// rounded edges so adjacent boxes stay gap-free.
    pub fn round(&self) -> Rect {
        let x1 = round_at_commit(self.loc.x);
        let y1 = round_at_commit(self.loc.y);
        let x2 = round_at_commit(self.right());
        let y2 = round_at_commit(self.bottom());
        Rect::from_loc_and_size((x1, y1), (x2 - x1, y2 - y1))
    }
}

/// The two panel axes: fixed (thickness) and variable (length).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// The monitor/panel dimension running along this axis.
    pub fn pick(self, size: Size) -> f64 {
        match self {
            Axis::Horizontal => size.w,
            Axis::Vertical => size.h,
        }
    }
}
