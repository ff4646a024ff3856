//! Minimal cell rectangles from an intersection grid of rulings.

use std::collections::HashMap;

use ordered_float::OrderedFloat;

use crate::geom::{Rect, Ruling};

/// How far a ruling may stop short of a crossing and still count as
/// intersecting it.
const INTERSECT_TOLERANCE: f64 = 1.0;

type PointKey = (OrderedFloat<f64>, OrderedFloat<f64>);

/// Ruling indices meeting at one crossing point.
#[derive(Default)]
struct Crossing {
    h: Vec<usize>,
    v: Vec<usize>,
}

/// Find the minimal cell rectangles bounded on all four sides by ruling
/// segments. For every top-left crossing the nearest valid bottom-right is
/// taken first, so no emitted cell contains another cell's top-left corner
/// in its interior.
pub fn find_cells(horizontals: &[Ruling], verticals: &[Ruling]) -> Vec<Rect> {
    let mut crossings: HashMap<PointKey, Crossing> = HashMap::new();
    for (hi, h) in horizontals.iter().enumerate() {
        if !h.horizontal() {
            continue;
        }
        for (vi, v) in verticals.iter().enumerate() {
            if !v.vertical() {
                continue;
            }
            let crosses = v.position() >= h.start() - INTERSECT_TOLERANCE
                && v.position() <= h.end() + INTERSECT_TOLERANCE
                && h.position() >= v.start() - INTERSECT_TOLERANCE
                && h.position() <= v.end() + INTERSECT_TOLERANCE;
            if crosses {
                let key = (OrderedFloat(v.position()), OrderedFloat(h.position()));
                let entry = crossings.entry(key).or_default();
                entry.h.push(hi);
                entry.v.push(vi);
            }
        }
    }

    let mut points: Vec<PointKey> = crossings.keys().copied().collect();
    points.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));

    // two crossings are edge-connected when one ruling runs through both
    let shares_v = |a: &PointKey, b: &PointKey| -> bool {
        crossings[a].v.iter().any(|i| crossings[b].v.contains(i))
    };
    let shares_h = |a: &PointKey, b: &PointKey| -> bool {
        crossings[a].h.iter().any(|i| crossings[b].h.contains(i))
    };

    let mut cells: Vec<Rect> = Vec::new();
    for p in &points {
        let below: Vec<&PointKey> = points.iter().filter(|q| q.0 == p.0 && q.1 > p.1).collect();
        let right: Vec<&PointKey> = points.iter().filter(|q| q.1 == p.1 && q.0 > p.0).collect();

        'below: for b in below {
            if !shares_v(p, b) {
                continue;
            }
            for r in &right {
                if !shares_h(p, r) {
                    continue;
                }
                let corner = (r.0, b.1);
                if crossings.contains_key(&corner) && shares_v(r, &corner) && shares_h(b, &corner)
                {
                    cells.push(Rect::new(
                        p.0.into_inner(),
                        p.1.into_inner(),
                        corner.0.into_inner(),
                        corner.1.into_inner(),
                    ));
                    break 'below;
                }
            }
        }
    }

    // larger spans that survived (a skipped grid point on one edge) would
    // mask the grid; drop any cell holding another's top-left inside it
    let corners: Vec<(f64, f64)> = cells.iter().map(|c| (c.left, c.top)).collect();
    let mut minimal: Vec<Rect> = cells
        .into_iter()
        .filter(|cell| {
            !corners.iter().any(|&(x, y)| {
                x > cell.left && x < cell.right && y > cell.top && y < cell.bottom
            })
        })
        .collect();

    minimal.sort_by(|a, b| a.cmp_reading_order(b));
    minimal.dedup();
    minimal
}
