//! Text-edge analysis: X coordinates at which chunks repeatedly align
//! (left, center, right) across text lines. These alignments trace table
//! column boundaries even when no ruling was drawn.

use std::collections::HashSet;

use crate::geom::{Rect, fcmp};
use crate::text::Line;

use super::REQUIRED_LINES_FOR_EDGE;

/// Base half-width of the absorption window around a running average.
const HALF_RANGE: f64 = 2.0;

/// Center alignments drift less, so their window stays small and constant.
const MID_HALF_RANGE: f64 = 1.5;

/// Left edges closer than this to the text bounding box left are the page
/// margin, not a table.
const PAGE_MARGIN_SLACK: f64 = 8.0;

const BULLET_X_SLACK: f64 = 5.0;
const BULLET_Y_OVERLAP: f64 = 0.9;

/// Which chunk coordinate a text edge tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeKind {
    Left,
    Mid,
    Right,
}

/// A persistent vertical alignment: x0..x1 is the absorption window around
/// the final average, top..bottom spans the first to the last contributing
/// chunk.
#[derive(Clone, Debug)]
pub struct TextEdge {
    pub x0: f64,
    pub x1: f64,
    pub top: f64,
    pub bottom: f64,
    pub kind: EdgeKind,
    pub intersecting_row_count: usize,
}

impl TextEdge {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x0, self.top, self.x1, self.bottom)
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Shared Y extent relative to the taller of the two edges.
    pub fn y_overlap_percent(&self, other: &TextEdge) -> f64 {
        let a = self.top.max(other.top);
        let b = self.bottom.min(other.bottom);
        if a <= b {
            (b - a) / self.height().max(other.height())
        } else {
            0.0
        }
    }
}

/// All retained edges of a page, by kind.
#[derive(Clone, Debug, Default)]
pub struct TextEdges {
    pub left: Vec<TextEdge>,
    pub mid: Vec<TextEdge>,
    pub right: Vec<TextEdge>,
}

impl TextEdges {
    /// Right then left edges: the combined side-edge pool used by table
    /// location.
    pub fn side(&self) -> Vec<TextEdge> {
        let mut side = self.right.clone();
        side.extend(self.left.iter().cloned());
        side
    }
}

/// A running cluster of X samples of one kind, with the chunks that
/// contributed them.
struct Range {
    kind: EdgeKind,
    sum: f64,
    avg: f64,
    samples: Vec<f64>,
    chunk_rects: Vec<Rect>,
}

impl Range {
    fn new(first: f64, rect: Rect, kind: EdgeKind) -> Self {
        Self {
            kind,
            sum: first,
            avg: first,
            samples: vec![first],
            chunk_rects: vec![rect],
        }
    }

    fn half_range_const(&self) -> f64 {
        if self.kind == EdgeKind::Mid {
            MID_HALF_RANGE
        } else {
            HALF_RANGE
        }
    }

    /// Absorption window for the next sample. For side edges the window
    /// shrinks with the vertical distance to the last contributing chunk:
    /// far-apart rows must agree more tightly on X.
    fn half_range(&self, rect: &Rect) -> f64 {
        let mut size = self.half_range_const();
        if self.kind != EdgeKind::Mid {
            if let Some(last) = self.chunk_rects.last() {
                let distance = (rect.top - last.bottom).abs();
                size *= 60.0 / (distance * distance.max(10.0).ln());
            }
        }
        size
    }

    fn add(&mut self, number: f64, rect: Rect) -> bool {
        if (number - self.avg).abs() < self.half_range(&rect) {
            self.sum += number;
            self.samples.push(number);
            self.chunk_rects.push(rect);
            self.avg = self.sum / self.samples.len() as f64;
            return true;
        }
        false
    }

    /// Backtracked entries keep chronological order at the front.
    fn add_to_beginning(&mut self, number: f64, rect: Rect) -> bool {
        if self.add(number, rect) {
            let n = self.samples.remove(self.samples.len() - 1);
            let r = self.chunk_rects.remove(self.chunk_rects.len() - 1);
            self.samples.insert(0, n);
            self.chunk_rects.insert(0, r);
            return true;
        }
        false
    }

    /// The chunk overlaps this range horizontally but the tracked edge has
    /// drifted away: the alignment is over.
    fn blown_out(&self, rect: &Rect) -> bool {
        let (edge, half) = match self.kind {
            EdgeKind::Mid => ((rect.left + rect.right) / 2.0, self.half_range_const()),
            EdgeKind::Left => (rect.left, self.half_range(rect) / 2.0),
            EdgeKind::Right => (rect.right, self.half_range(rect) / 2.0),
        };
        self.avg > rect.left && self.avg < rect.right && (edge - self.avg).abs() >= half
    }

    fn to_edge(&self, line_count: usize) -> Option<TextEdge> {
        let first = self.chunk_rects.first()?;
        let last = self.chunk_rects.last()?;
        Some(TextEdge {
            x0: self.avg - self.half_range_const(),
            x1: self.avg + self.half_range_const(),
            top: first.top,
            bottom: last.bottom,
            kind: self.kind,
            intersecting_row_count: self.samples.len().min(line_count),
        })
    }
}

/// Discover the text edges of a set of lines, walking top to bottom and
/// absorbing each non-whitespace chunk's left, mid, and right X samples
/// into active ranges. Ranges that blow out or survive to the end are
/// kept when they accumulated at least `REQUIRED_LINES_FOR_EDGE` samples.
pub fn text_edges(lines: &[Line], text_bounds: &Rect) -> TextEdges {
    const KINDS: [EdgeKind; 3] = [EdgeKind::Left, EdgeKind::Mid, EdgeKind::Right];

    let mut done: [Vec<Range>; 3] = [Vec::new(), Vec::new(), Vec::new()];
    let mut active: [Vec<Range>; 3] = [Vec::new(), Vec::new(), Vec::new()];

    for line in lines {
        for chunk in line.chunks() {
            if chunk.is_whitespace() {
                continue;
            }
            let rect = chunk.rect;
            for (slot, kind) in KINDS.iter().enumerate() {
                let number = match kind {
                    EdgeKind::Left => rect.left,
                    EdgeKind::Mid => (rect.left + rect.right) / 2.0,
                    EdgeKind::Right => rect.right,
                };

                let ranges = &mut active[slot];
                let mut added = false;
                let mut closest: Option<(f64, usize)> = None;
                for (idx, range) in ranges.iter_mut().enumerate() {
                    added = range.add(number, rect);
                    if let Some(&last_number) = range.samples.last() {
                        let replace = match closest {
                            None => true,
                            Some((current, _)) => {
                                number > last_number
                                    && (number - last_number).abs() < (number - current).abs()
                            }
                        };
                        if replace {
                            closest = Some((last_number, idx));
                        }
                    }
                    if added {
                        break;
                    }
                }

                if !added {
                    let mut new_range = Range::new(number, rect, *kind);
                    // backtrack: recent entries of the closest range that
                    // still agree with the new sample seed its beginning
                    if let Some((_, closest_idx)) = closest {
                        let closest_range = &ranges[closest_idx];
                        for j in (0..closest_range.samples.len()).rev() {
                            let candidate = closest_range.samples[j];
                            if (number - candidate).abs() > closest_range.half_range_const() {
                                break;
                            }
                            if !new_range.add_to_beginning(candidate, closest_range.chunk_rects[j])
                            {
                                break;
                            }
                        }
                    }
                    ranges.push(new_range);
                }

                let mut idx = 0;
                while idx < ranges.len() {
                    if ranges[idx].blown_out(&rect) {
                        let retired = ranges.remove(idx);
                        if retired.samples.len() >= REQUIRED_LINES_FOR_EDGE {
                            done[slot].push(retired);
                        }
                    } else {
                        idx += 1;
                    }
                }
            }
        }
    }

    for (slot, survivors) in active.into_iter().enumerate() {
        for range in survivors {
            if range.samples.len() >= REQUIRED_LINES_FOR_EDGE {
                done[slot].push(range);
            }
        }
    }

    let [left_ranges, mid_ranges, right_ranges] = done;
    let build = |ranges: Vec<Range>| -> Vec<TextEdge> {
        ranges
            .iter()
            .filter_map(|r| r.to_edge(lines.len()))
            .collect()
    };

    let mut edges = TextEdges {
        left: build(left_ranges),
        mid: build(mid_ranges),
        right: build(right_ranges),
    };

    edges
        .left
        .retain(|e| e.x0 >= text_bounds.left + PAGE_MARGIN_SLACK);

    reduce_bullet_edges(&mut edges);
    edges
}

/// A column of bullet characters projects a tight left/mid/right triple of
/// edges; keep only the first of each such stack so bullets don't read as
/// tables.
fn reduce_bullet_edges(edges: &mut TextEdges) {
    let mut tagged: Vec<(usize, usize, TextEdge)> = Vec::new();
    for (list_idx, list) in [&edges.left, &edges.mid, &edges.right].iter().enumerate() {
        for (idx, edge) in list.iter().enumerate() {
            tagged.push((list_idx, idx, edge.clone()));
        }
    }
    tagged.sort_by(|a, b| fcmp(a.2.height(), b.2.height()));

    let mut to_remove: HashSet<(usize, usize)> = HashSet::new();
    let mut prev: Option<&(usize, usize, TextEdge)> = None;
    for entry in &tagged {
        if let Some(p) = prev {
            if (entry.2.x0 - p.2.x0).abs() < BULLET_X_SLACK
                && entry.2.y_overlap_percent(&p.2) > BULLET_Y_OVERLAP
            {
                to_remove.insert((entry.0, entry.1));
            }
        }
        prev = Some(entry);
    }

    let filter = |list: &mut Vec<TextEdge>, list_idx: usize| {
        let mut idx = 0;
        list.retain(|_| {
            let keep = !to_remove.contains(&(list_idx, idx));
            idx += 1;
            keep
        });
    };
    filter(&mut edges.left, 0);
    filter(&mut edges.mid, 1);
    filter(&mut edges.right, 2);
}
