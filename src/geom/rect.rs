//! Axis-aligned rectangle with the overlap predicates used throughout
//! table detection.

use super::ruling::Ruling;
use super::{Point, fcmp};

/// An axis-aligned box in page coordinates. `top < bottom` (the Y axis
/// grows downward, as on a page).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Build from top-left corner plus extents.
    pub fn from_size(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Point {
        (
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Corners in top-left, top-right, bottom-right, bottom-left order.
    pub fn points(&self) -> [Point; 4] {
        [
            (self.left, self.top),
            (self.right, self.top),
            (self.right, self.bottom),
            (self.left, self.bottom),
        ]
    }

    /// Grow in place to the bounding box of self and `other`.
    pub fn merge(&mut self, other: &Rect) {
        self.left = self.left.min(other.left);
        self.top = self.top.min(other.top);
        self.right = self.right.max(other.right);
        self.bottom = self.bottom.max(other.bottom);
    }

    pub fn union(a: &Rect, b: &Rect) -> Rect {
        let mut out = *a;
        out.merge(b);
        out
    }

    /// Bounding box of a non-empty sequence of rectangles.
    pub fn bounding_box_of<'a>(rects: impl IntoIterator<Item = &'a Rect>) -> Option<Rect> {
        let mut iter = rects.into_iter();
        let mut out = *iter.next()?;
        for r in iter {
            out.merge(r);
        }
        Some(out)
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.0 >= self.left && p.0 <= self.right && p.1 >= self.top && p.1 <= self.bottom
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }

    /// Interval overlap on the X axis.
    pub fn horizontally_overlaps(&self, other: &Rect) -> bool {
        self.left < other.right && self.right > other.left
    }

    pub fn vertically_overlaps(&self, other: &Rect) -> bool {
        self.vertical_overlap(other) > 0.0
    }

    /// Length of the shared Y interval.
    pub fn vertical_overlap(&self, other: &Rect) -> f64 {
        (self.bottom.min(other.bottom) - self.top.max(other.top)).max(0.0)
    }

    /// Shared Y interval relative to the smaller height.
    pub fn vertical_overlap_ratio(&self, other: &Rect) -> f64 {
        let smaller = self.height().min(other.height());
        if smaller <= 0.0 {
            return 0.0;
        }
        self.vertical_overlap(other) / smaller
    }

    /// Shared Y interval relative to the larger height.
    pub fn vertical_overlap_percent(&self, other: &Rect) -> f64 {
        let larger = self.height().max(other.height());
        if larger <= 0.0 {
            return 0.0;
        }
        self.vertical_overlap(other) / larger
    }

    /// Intersection area divided by the smaller rectangle's area.
    pub fn overlap_ratio(&self, other: &Rect) -> f64 {
        let w = (self.right.min(other.right) - self.left.max(other.left)).max(0.0);
        let h = (self.bottom.min(other.bottom) - self.top.max(other.top)).max(0.0);
        let smaller = self.area().min(other.area());
        if smaller <= 0.0 {
            return 0.0;
        }
        (w * h) / smaller
    }

    /// Whether a normalized ruling touches this rectangle. Oblique rulings
    /// never match; callers normalize first.
    pub fn intersects_ruling(&self, ruling: &Ruling) -> bool {
        if ruling.horizontal() {
            ruling.position() >= self.top
                && ruling.position() <= self.bottom
                && ruling.start() <= self.right
                && ruling.end() >= self.left
        } else if ruling.vertical() {
            ruling.position() >= self.left
                && ruling.position() <= self.right
                && ruling.start() <= self.bottom
                && ruling.end() >= self.top
        } else {
            false
        }
    }

    /// Ordering by (top, left), the page reading order for areas.
    pub fn cmp_reading_order(&self, other: &Rect) -> std::cmp::Ordering {
        fcmp(self.top, other.top).then(fcmp(self.left, other.left))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_is_bounding_box_union() {
        let mut a = Rect::new(0.0, 0.0, 10.0, 10.0);
        a.merge(&Rect::new(5.0, -5.0, 20.0, 8.0));
        assert_eq!(a, Rect::new(0.0, -5.0, 20.0, 10.0));
    }

    #[test]
    fn contains_and_intersects() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(10.0, 10.0, 20.0, 20.0);
        let apart = Rect::new(200.0, 0.0, 210.0, 10.0);
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(outer.intersects(&inner));
        assert!(!outer.intersects(&apart));
    }

    #[test]
    fn overlap_ratio_is_relative_to_smaller() {
        let big = Rect::new(0.0, 0.0, 100.0, 100.0);
        let small = Rect::new(50.0, 50.0, 60.0, 60.0);
        assert!((big.overlap_ratio(&small) - 1.0).abs() < 1e-9);

        let half = Rect::new(95.0, 0.0, 105.0, 100.0);
        assert!((big.overlap_ratio(&half) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn vertical_overlap_percent_uses_larger_height() {
        let tall = Rect::new(0.0, 0.0, 10.0, 100.0);
        let short = Rect::new(0.0, 40.0, 10.0, 60.0);
        assert!((tall.vertical_overlap_percent(&short) - 0.2).abs() < 1e-9);
        assert!((short.vertical_overlap_ratio(&tall) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ruling_intersection_is_oriented() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        let h = Ruling::new((-10.0, 25.0), (10.0, 25.0));
        let v = Ruling::new((50.0, -10.0), (50.0, 10.0));
        let miss = Ruling::new((0.0, 60.0), (100.0, 60.0));
        assert!(r.intersects_ruling(&h));
        assert!(r.intersects_ruling(&v));
        assert!(!r.intersects_ruling(&miss));
    }
}
