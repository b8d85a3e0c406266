//! Pixel-space value objects shared by the layout, the builders and the renderers.

use derive_more::{Add, Constructor, Sub};
use serde::{Deserialize, Serialize};

/// Value Object - point. `left` is always a pixel x; `top` is either a pixel y
/// or, for signal-derived points, an amplitude in microvolts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Add, Sub, Constructor, Serialize, Deserialize)]
pub struct Point {
    pub left: f64,
    pub top: f64,
}

/// Value Object - segment from `a` to `b`
#[derive(Debug, Clone, Copy, PartialEq, Default, Constructor, Serialize, Deserialize)]
pub struct Line {
    pub ax: f64,
    pub ay: f64,
    pub bx: f64,
    pub by: f64,
}

impl Line {
    pub fn vertical(x: f64, from_y: f64, to_y: f64) -> Self {
        Self::new(x, from_y, x, to_y)
    }

    pub fn min_ox(&self) -> f64 {
        self.ax.min(self.bx)
    }

    pub fn max_ox(&self) -> f64 {
        self.ax.max(self.bx)
    }
}

/// Value Object - axis aligned rectangle in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default, Constructor, Serialize, Deserialize)]
pub struct Rectangle {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    pub fn min_ox(&self) -> f64 {
        self.left
    }

    pub fn max_ox(&self) -> f64 {
        self.left + self.width
    }

    pub fn min_oy(&self) -> f64 {
        self.top
    }

    pub fn max_oy(&self) -> f64 {
        self.top + self.height
    }

    /// Vertical centre snapped to a whole pixel.
    pub fn mid_oy(&self) -> f64 {
        self.top + (self.height / 2.0).floor()
    }

    pub fn contains(&self, point: Point) -> bool {
        point.left >= self.min_ox()
            && point.left <= self.max_ox()
            && point.top >= self.min_oy()
            && point.top <= self.max_oy()
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        let left = self.min_ox().min(other.min_ox());
        let top = self.min_oy().min(other.min_oy());
        let right = self.max_ox().max(other.max_ox());
        let bottom = self.max_oy().max(other.max_oy());
        Rectangle::new(left, top, right - left, bottom - top)
    }
}

/// Value Object - ordered point run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<Point>,
}

impl Polyline {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding box over both coordinates, `None` when empty.
    pub fn bounds(&self) -> Option<Rectangle> {
        let first = self.points.first()?;
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.left, first.left, first.top, first.top);
        for p in &self.points[1..] {
            min_x = min_x.min(p.left);
            max_x = max_x.max(p.left);
            min_y = min_y.min(p.top);
            max_y = max_y.max(p.top);
        }
        Some(Rectangle::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    /// Point whose `left` is closest to `x`. Points are laid out left to right
    /// one pixel apart, so this is a binary search.
    pub fn nearest(&self, x: f64) -> Option<&Point> {
        if self.points.is_empty() {
            return None;
        }
        let idx = self.points.partition_point(|p| p.left < x);
        if idx == 0 {
            return self.points.first();
        }
        if idx >= self.points.len() {
            return self.points.last();
        }
        let before = &self.points[idx - 1];
        let after = &self.points[idx];
        if (x - before.left) <= (after.left - x) {
            Some(before)
        } else {
            Some(after)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_subtraction_is_component_wise() {
        let d = Point::new(10.0, 4.0) - Point::new(3.0, 6.0);
        assert_eq!(d, Point::new(7.0, -2.0));
    }

    #[test]
    fn rectangle_edges() {
        let r = Rectangle::new(33.0, 33.0, 734.0, 401.0);
        assert_eq!(r.max_ox(), 767.0);
        assert_eq!(r.max_oy(), 434.0);
        assert_eq!(r.mid_oy(), 233.0);
    }

    #[test]
    fn polyline_bounds_and_nearest() {
        let line = Polyline::new(vec![
            Point::new(0.0, 5.0),
            Point::new(1.0, -20.0),
            Point::new(2.0, 7.0),
        ]);
        assert_eq!(line.bounds(), Some(Rectangle::new(0.0, -20.0, 2.0, 27.0)));
        assert_eq!(line.nearest(1.4).map(|p| p.top), Some(-20.0));
        assert_eq!(line.nearest(9.0).map(|p| p.top), Some(7.0));
        assert!(Polyline::default().nearest(0.0).is_none());
    }
}
