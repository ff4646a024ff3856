//! Line segments constrained to horizontal or vertical after
//! normalization, with the merge and snap operations the detectors rely on.

use std::collections::HashMap;

use ordered_float::OrderedFloat;

use super::{Point, cluster_values, fcmp};

/// How far from a right angle a segment may lean before `normalize`
/// straightens it, in degrees.
const ORIENTATION_TOLERANCE: f64 = 1.0;

const POSITION_EQ: f64 = 1e-6;

/// A line segment between two points. Detection and extraction only ever
/// operate on normalized rulings, where either y1 == y2 (horizontal) or
/// x1 == x2 (vertical); anything else is `oblique` and gets dropped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ruling {
    pub p1: Point,
    pub p2: Point,
}

impl Ruling {
    pub fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    /// A strictly vertical ruling at `x` spanning `top..bottom`.
    pub fn vertical_at(x: f64, top: f64, bottom: f64) -> Self {
        Self::new((x, top), (x, bottom))
    }

    /// A strictly horizontal ruling at `y` spanning `left..right`.
    pub fn horizontal_at(y: f64, left: f64, right: f64) -> Self {
        Self::new((left, y), (right, y))
    }

    pub fn horizontal(&self) -> bool {
        // the equality check rejects a NaN y by itself; the varying axis
        // needs the explicit NaN test, since NaN != x is true
        self.p1.1 == self.p2.1
            && self.p1.0 != self.p2.0
            && !self.p1.0.is_nan()
            && !self.p2.0.is_nan()
    }

    pub fn vertical(&self) -> bool {
        self.p1.0 == self.p2.0
            && self.p1.1 != self.p2.1
            && !self.p1.1.is_nan()
            && !self.p2.1.is_nan()
    }

    /// Neither horizontal nor vertical; includes zero-length segments and
    /// anything with a NaN coordinate.
    pub fn oblique(&self) -> bool {
        !self.horizontal() && !self.vertical()
    }

    fn angle_degrees(&self) -> f64 {
        let degrees = (self.p2.1 - self.p1.1)
            .atan2(self.p2.0 - self.p1.0)
            .to_degrees();
        (degrees + 360.0) % 360.0
    }

    /// Force a nearly-horizontal or nearly-vertical segment onto its axis
    /// (coordinates averaged) and orient it start-before-end. Segments
    /// leaning more than a degree are left as-is for `oblique` to catch.
    pub fn normalize(&mut self) {
        let angle = self.angle_degrees();
        let near = |target: f64| (angle - target).abs() <= ORIENTATION_TOLERANCE;
        if near(0.0) || near(180.0) || near(360.0) {
            let y = (self.p1.1 + self.p2.1) / 2.0;
            self.p1.1 = y;
            self.p2.1 = y;
        } else if near(90.0) || near(270.0) {
            let x = (self.p1.0 + self.p2.0) / 2.0;
            self.p1.0 = x;
            self.p2.0 = x;
        }
        if (self.horizontal() && self.p1.0 > self.p2.0)
            || (self.vertical() && self.p1.1 > self.p2.1)
        {
            std::mem::swap(&mut self.p1, &mut self.p2);
        }
    }

    /// Fixed coordinate of a normalized ruling: y for horizontal, x for
    /// vertical.
    pub fn position(&self) -> f64 {
        if self.vertical() {
            self.p1.0
        } else {
            self.p1.1
        }
    }

    /// Lesser coordinate along the varying axis.
    pub fn start(&self) -> f64 {
        if self.vertical() {
            self.p1.1.min(self.p2.1)
        } else {
            self.p1.0.min(self.p2.0)
        }
    }

    /// Greater coordinate along the varying axis.
    pub fn end(&self) -> f64 {
        if self.vertical() {
            self.p1.1.max(self.p2.1)
        } else {
            self.p1.0.max(self.p2.0)
        }
    }

    fn set_end(&mut self, value: f64) {
        if self.vertical() {
            self.p2.1 = value;
        } else {
            self.p2.0 = value;
        }
    }

    pub fn length(&self) -> f64 {
        self.end() - self.start()
    }

    pub fn left(&self) -> f64 {
        self.p1.0.min(self.p2.0)
    }

    pub fn right(&self) -> f64 {
        self.p1.0.max(self.p2.0)
    }

    pub fn top(&self) -> f64 {
        self.p1.1.min(self.p2.1)
    }

    pub fn bottom(&self) -> f64 {
        self.p1.1.max(self.p2.1)
    }

    /// Scale both endpoints, used when mapping raster coordinates back to
    /// page space.
    pub fn scale(&mut self, factor: f64) {
        self.p1.0 *= factor;
        self.p1.1 *= factor;
        self.p2.0 *= factor;
        self.p2.1 *= factor;
    }

    /// Merge colinear rulings of a single orientation into longer ones.
    /// Segments at the same position whose gap is at most `expand` become
    /// one; obliques, zero-length, and NaN segments are dropped.
    pub fn collapse_oriented_rulings(rulings: Vec<Ruling>, expand: f64) -> Vec<Ruling> {
        let mut oriented: Vec<Ruling> = rulings
            .into_iter()
            .map(|mut r| {
                r.normalize();
                r
            })
            .filter(|r| !r.oblique() && r.length() > 0.0)
            .collect();
        oriented.sort_by(|a, b| fcmp(a.position(), b.position()).then(fcmp(a.start(), b.start())));

        let mut collapsed: Vec<Ruling> = Vec::new();
        for r in oriented {
            if let Some(last) = collapsed.last_mut() {
                if (last.position() - r.position()).abs() < POSITION_EQ
                    && r.start() <= last.end() + expand
                {
                    if r.end() > last.end() {
                        last.set_end(r.end());
                    }
                    continue;
                }
            }
            collapsed.push(r);
        }
        collapsed
    }

    /// Snap every endpoint coordinate to the mean of its cluster, where
    /// clusters chain values within `tolerance` (X and Y independently).
    /// Re-snapping an already-snapped set at the same tolerance is a no-op:
    /// cluster means of a snapped set are farther apart than the tolerance.
    pub fn snap_points(rulings: &mut [Ruling], tolerance: f64) {
        let snap_axis = |values: Vec<f64>| -> HashMap<OrderedFloat<f64>, f64> {
            let mut map = HashMap::new();
            for cluster in cluster_values(values, tolerance) {
                let mean = cluster.iter().sum::<f64>() / cluster.len() as f64;
                for value in cluster {
                    map.insert(OrderedFloat(value), mean);
                }
            }
            map
        };

        let xs = snap_axis(
            rulings
                .iter()
                .flat_map(|r| [r.p1.0, r.p2.0])
                .filter(|v| v.is_finite())
                .collect(),
        );
        let ys = snap_axis(
            rulings
                .iter()
                .flat_map(|r| [r.p1.1, r.p2.1])
                .filter(|v| v.is_finite())
                .collect(),
        );

        for r in rulings.iter_mut() {
            if let Some(&x) = xs.get(&OrderedFloat(r.p1.0)) {
                r.p1.0 = x;
            }
            if let Some(&x) = xs.get(&OrderedFloat(r.p2.0)) {
                r.p2.0 = x;
            }
            if let Some(&y) = ys.get(&OrderedFloat(r.p1.1)) {
                r.p1.1 = y;
            }
            if let Some(&y) = ys.get(&OrderedFloat(r.p2.1)) {
                r.p2.1 = y;
            }
        }
    }
}
