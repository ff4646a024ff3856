//! Page-level table-area detection.
//!
//! Cell clusters from pixel-derived rulings give the ruled tables; an
//! iterative text-edge pass finds the unruled ones; the union is
//! deduplicated into the final area list.

use tracing::{debug, warn};

use crate::extract::find_cells;
use crate::geom::{Rect, Ruling, fcmp};
use crate::page::{Page, PageRenderer};
use crate::text::{Line, column_positions, group_by_lines, merge_words};

use super::edges::{TextEdge, TextEdges, text_edges};
use super::{
    CELL_CORNER_DISTANCE, DEFAULT_DPI, IDENTICAL_OVERLAP, PADDING, POINT_SNAP,
    REQUIRED_CELLS_FOR_TABLE, ROW_HEIGHT_MULT_BOTTOM, ROW_HEIGHT_MULT_TOP,
    RULING_COLLAPSE_EXPANSION, WIDE_CHUNK_PAGE_FRACTION, pixels,
};

/// Everything one detection pass learned about a page: the accepted table
/// areas plus the intermediates the blunt fallback needs. Passing this
/// struct around (instead of caching it on the detector) makes the
/// detect-before-blunt ordering a compile-time fact.
#[derive(Clone, Debug, Default)]
pub struct DetectionContext {
    pub tables: Vec<Rect>,
    lines: Vec<Line>,
    text_bounds: Option<Rect>,
    horizontal_rulings: Vec<Ruling>,
}

/// Table-area detector. Thresholds assume the default 144 DPI raster
/// contract (two image pixels per page unit).
pub struct Detector {
    dpi: u32,
}

impl Default for Detector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector {
    pub fn new() -> Self {
        Self { dpi: DEFAULT_DPI }
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Detect table areas on a page. Rasterization or text-suppression
    /// failure yields an empty context rather than an error.
    pub fn detect(&self, page: &Page, renderer: &dyn PageRenderer) -> DetectionContext {
        let image = match renderer.render_grayscale(page, self.dpi) {
            Ok(image) => image,
            Err(e) => {
                warn!(error = %e, "rasterization failed, returning no areas");
                return DetectionContext::default();
            }
        };
        let mut horizontal = pixels::horizontal_rulings(&image);

        // vertical detection runs on a text-stripped raster so glyph
        // strokes don't masquerade as rulings
        let stripped = match renderer.render_grayscale_without_text(page, self.dpi) {
            Ok(image) => image,
            Err(e) => {
                warn!(error = %e, "text suppression failed, returning no areas");
                return DetectionContext::default();
            }
        };
        let mut vertical = pixels::vertical_rulings(&stripped);

        let mut areas: Vec<Rect> = Vec::new();
        if !horizontal.is_empty() || !vertical.is_empty() {
            let split = horizontal.len();
            let mut combined = horizontal;
            combined.extend(vertical);
            Ruling::snap_points(&mut combined, POINT_SNAP);
            let rest = combined.split_off(split);
            horizontal =
                Ruling::collapse_oriented_rulings(combined, RULING_COLLAPSE_EXPANSION);
            vertical = Ruling::collapse_oriented_rulings(rest, RULING_COLLAPSE_EXPANSION);

            let cells = find_cells(&horizontal, &vertical);
            areas = areas_from_cells(&cells);
            debug!(
                cells = cells.len(),
                areas = areas.len(),
                "cell-based areas from raster rulings"
            );
        } else {
            horizontal = Vec::new();
            vertical = Vec::new();
        }

        // a vertical ruling piercing an area usually marks rows whose
        // horizontal lines went missing; stretch the area over it
        for ruling in &vertical {
            for area in &mut areas {
                if area.intersects_ruling(ruling)
                    && !(area.contains_point(ruling.p1) && area.contains_point(ruling.p2))
                {
                    area.top = area.top.min(ruling.top()).floor();
                    area.bottom = area.bottom.max(ruling.bottom()).ceil();
                    break;
                }
            }
        }

        // raster space is twice page space; halve and pad (the extra
        // bottom unit covers the halved-coordinate fuzz)
        for area in &mut areas {
            let (left, top, width, height) = (area.left, area.top, area.width(), area.height());
            area.left = left / 2.0 - PADDING;
            area.top = top / 2.0 - PADDING;
            area.right = area.left + width / 2.0 + PADDING;
            area.bottom = area.top + height / 2.0 + PADDING + 1.0;
        }
        for ruling in &mut horizontal {
            ruling.scale(0.5);
        }

        let mut chunks = merge_words(page.text(), &[]);
        let text_bounds = page.text_bounds();
        // chunks spanning a large share of the page are justified
        // paragraph text, not table content
        chunks.retain(|c| c.rect.width() <= WIDE_CHUNK_PAGE_FRACTION * page.width());
        let lines = group_by_lines(chunks);

        for line in &lines {
            for area in &mut areas {
                if !area.contains(&line.rect) && line.rect.intersects(area) {
                    area.left = area.left.min(line.rect.left).floor();
                    area.right = area.right.max(line.rect.right).ceil();
                }
            }
        }

        // areas without any text are graphics, not tables
        areas.retain(|a| lines.iter().any(|l| a.intersects(&l.rect)));

        if let Some(bounds) = text_bounds {
            let mut remaining = lines.clone();
            loop {
                remaining.retain(|l| !areas.iter().any(|a| a.contains(&l.rect)));
                let edges = text_edges(&remaining, &bounds);
                let Some((kind, count)) = relevant_edges(&edges, remaining.len()) else {
                    break;
                };
                let relevant = match kind {
                    RelevantKind::Mid => edges.mid.clone(),
                    RelevantKind::Side => edges.side(),
                };
                let Some(found) =
                    table_from_text(&remaining, &relevant, count, &horizontal, &bounds)
                else {
                    break;
                };
                debug!(?kind, count, area = ?found, "text-edge table accepted");
                areas.push(self.expand(page, found));
            }
        }

        let tables = dedup_areas(areas);
        debug!(tables = tables.len(), "detection finished");
        DetectionContext {
            tables,
            lines,
            text_bounds,
            horizontal_rulings: horizontal,
        }
    }

    /// Fallback: find the biggest table-looking region with progressively
    /// relaxed thresholds. Prone to false positives and to merging
    /// neighboring tables, but finds tables `detect` misses.
    pub fn blunt_detect(&self, page: &Page, context: &DetectionContext) -> Option<Rect> {
        let bounds = context.text_bounds?;
        let edges = text_edges(&context.lines, &bounds);
        let side = edges.side();

        for overlap_step in (1..=7).rev() {
            let target = overlap_step as f64 / 10.0;
            for count in (3..=8).rev() {
                if let Some(table) = table_from_text(
                    &context.lines,
                    &side,
                    count,
                    &context.horizontal_rulings,
                    &bounds,
                ) {
                    if table.vertical_overlap_percent(&bounds) > target {
                        return Some(self.expand(page, table));
                    }
                }
            }
        }
        None
    }

    /// Grow a found table up and down through rows that still fit its
    /// column structure: a row belongs until one of its chunks crosses a
    /// column ruling placed just right of each inferred column edge.
    fn expand(&self, page: &Page, table: Rect) -> Rect {
        let view = page.area(table);
        let lines = group_by_lines(merge_words(view.text(), &[]));
        let columns = column_positions(&lines);
        let rulings: Vec<Ruling> = columns
            .iter()
            .map(|&edge| Ruling::vertical_at(edge + 1.0, page.top(), page.bottom()))
            .collect();

        let below = page.area(Rect::new(table.left, table.bottom, table.right, page.bottom()));
        let above = page.area(Rect::new(table.left, page.top(), table.right, table.top));

        let grown = expand_into_area(table, &rulings, &below, false);
        expand_into_area(grown, &rulings, &above, true)
    }
}

fn expand_into_area(area: Rect, rulings: &[Ruling], view: &Page, upward: bool) -> Rect {
    let mut lines = group_by_lines(merge_words(view.text(), &[]));
    if upward {
        lines.reverse();
    }

    let mut out = area;
    'lines: for line in &lines {
        for chunk in line.chunks() {
            if chunk.is_whitespace() {
                continue;
            }
            let mut probe = chunk.rect;
            // a little room for error before a chunk counts as crossing
            if probe.width() > 5.0 {
                probe.right -= 5.0;
            }
            if rulings.iter().any(|r| probe.intersects_ruling(r)) {
                break 'lines;
            }
        }
        out.merge(&line.rect);
    }

    // otherwise text at the seam can get cut off
    if upward {
        out.top -= 1.0;
    } else {
        out.bottom += 1.0;
    }
    out
}

/// Cluster cells by corner proximity; clusters with enough cells become
/// table areas (their bounding boxes).
fn areas_from_cells(cells: &[Rect]) -> Vec<Rect> {
    let mut assigned = vec![false; cells.len()];
    let mut areas = Vec::new();

    let corners_close = |a: &Rect, b: &Rect| -> bool {
        a.points().iter().any(|p| {
            b.points()
                .iter()
                .any(|q| ((p.0 - q.0).powi(2) + (p.1 - q.1).powi(2)).sqrt() < CELL_CORNER_DISTANCE)
        })
    };

    for start in 0..cells.len() {
        if assigned[start] {
            continue;
        }
        assigned[start] = true;
        let mut group = vec![start];
        let mut frontier = vec![start];
        while let Some(idx) = frontier.pop() {
            for other in 0..cells.len() {
                if !assigned[other] && corners_close(&cells[idx], &cells[other]) {
                    assigned[other] = true;
                    group.push(other);
                    frontier.push(other);
                }
            }
        }
        if group.len() >= REQUIRED_CELLS_FOR_TABLE {
            let mut bbox = cells[group[0]];
            for &idx in &group[1..] {
                bbox.merge(&cells[idx]);
            }
            areas.push(bbox);
        }
    }
    areas
}

#[derive(Clone, Copy, Debug)]
enum RelevantKind {
    Mid,
    Side,
}

/// Decide which edge kind locates tables on this page and how many such
/// edges a table row should touch. Buckets edges by how many rows they
/// cross and scans from the tallest bucket down, preferring mid edges
/// (two or more) over side edges (three or more).
fn relevant_edges(edges: &TextEdges, line_count: usize) -> Option<(RelevantKind, usize)> {
    if line_count == 0 {
        return None;
    }
    let side = edges.side();

    let bucket = |pool: &[TextEdge]| -> Vec<Vec<TextEdge>> {
        let mut buckets = vec![Vec::new(); line_count];
        for edge in pool {
            if edge.intersecting_row_count >= 1 {
                let idx = (edge.intersecting_row_count - 1).min(line_count - 1);
                buckets[idx].push(edge.clone());
            }
        }
        buckets
    };
    let side_buckets = bucket(&side);
    let mid_buckets = bucket(&edges.mid);

    for i in (3..line_count).rev() {
        let mut side_pool: Vec<&TextEdge> = side_buckets[i].iter().collect();
        // side edges tolerate a one-row miscount; mid edges don't, they
        // false-detect more easily
        if i > 3 {
            side_pool.extend(side_buckets[i - 1].iter());
            if i < line_count - 1 {
                side_pool.extend(side_buckets[i + 1].iter());
            }
        }
        let mid_pool: Vec<&TextEdge> = mid_buckets[i].iter().collect();

        let mid_count = grouped_edge_count(&mid_pool);
        let side_count = grouped_edge_count(&side_pool);

        if mid_count > 1 {
            return Some((RelevantKind::Mid, mid_count));
        }
        if side_count > 2 {
            return Some((RelevantKind::Side, side_count));
        }
    }
    None
}

/// Merge edges whose Y extents touch into groups; when several groups
/// exist only the biggest one counts, so edge stacks from unrelated page
/// regions don't inflate the total.
fn grouped_edge_count(pool: &[&TextEdge]) -> usize {
    if pool.len() < 2 {
        return pool.len();
    }
    let mut intervals: Vec<(f64, f64, usize)> = pool.iter().map(|e| (e.top, e.bottom, 1)).collect();
    intervals.sort_by(|a, b| fcmp(a.0, b.0));

    let mut merged: Vec<(f64, f64, usize)> = Vec::new();
    for (top, bottom, count) in intervals {
        match merged.last_mut() {
            Some(last) if top <= last.1 => {
                last.1 = last.1.max(bottom);
                last.2 += count;
            }
            _ => merged.push((top, bottom, count)),
        }
    }
    if merged.len() <= 1 {
        pool.len()
    } else {
        merged.iter().map(|g| g.2).max().unwrap_or(0)
    }
}

/// Walk lines top to bottom collecting rows that touch enough relevant
/// edges; close the table when the row gap jumps past 2.5x the running
/// average or a row stops touching edges entirely. Nearby horizontal
/// rulings then stretch the area, and a unit of padding finishes it.
fn table_from_text(
    lines: &[Line],
    relevant: &[TextEdge],
    relevant_count: usize,
    horizontal_rulings: &[Ruling],
    text_bounds: &Rect,
) -> Option<Rect> {
    let edge_rects: Vec<Rect> = relevant.iter().map(TextEdge::rect).collect();

    // larger tables get one row of slack; smaller ones would start
    // swallowing paragraphs
    let slack = if relevant_count <= 3 { 0 } else { 1 };

    let mut table: Option<Rect> = None;
    let mut prev_row: Option<&Line> = None;
    let mut last_table_row: Option<&Line> = None;
    let mut space_count = 0usize;
    let mut total_spacing = 0.0f64;

    for line in lines {
        let full_row = Rect::new(
            text_bounds.left,
            line.rect.top,
            text_bounds.right,
            line.rect.bottom,
        );
        let touching = edge_rects.iter().filter(|e| line.rect.intersects(e)).count();
        let touching_full = edge_rects.iter().filter(|e| full_row.intersects(e)).count();

        if table.is_some() && space_count > 0 {
            if let Some(prev) = prev_row {
                let threshold = (total_spacing / space_count as f64) * 2.5;
                let gap = line.top() - prev.top();
                if gap > threshold || touching_full == 0 {
                    last_table_row = prev_row;
                    break;
                }
            }
        }

        if touching + slack >= relevant_count {
            if let (Some(prev), Some(_)) = (prev_row, table.as_ref()) {
                space_count += 1;
                total_spacing += line.top() - prev.top();
            }
            match table.as_mut() {
                None => table = Some(line.rect),
                Some(t) => {
                    t.left = t.left.min(line.rect.left);
                    t.right = t.right.max(line.rect.right);
                    t.bottom = t.bottom.max(line.rect.bottom);
                }
            }
        } else if table.is_some() && last_table_row.is_none() {
            last_table_row = prev_row;
        }

        prev_row = Some(line);
    }

    let mut table = table?;
    let last_row = last_table_row.or(prev_row)?;
    let avg_row_height = if space_count > 0 {
        total_spacing / space_count as f64
    } else {
        last_row.rect.height()
    };

    // horizontal rulings just past the bottom (ascending order) belong to
    // the table frame
    let threshold = avg_row_height * ROW_HEIGHT_MULT_BOTTOM;
    for ruling in horizontal_rulings {
        if ruling.position() < table.bottom {
            continue;
        }
        if ruling.position() - table.bottom <= threshold {
            table.bottom = table.bottom.max(ruling.position());
            table.left = table.left.min(ruling.left());
            table.right = table.right.max(ruling.right());
        } else {
            break;
        }
    }

    // headings sit higher, so the top gets a more generous threshold
    let threshold = avg_row_height * ROW_HEIGHT_MULT_TOP;
    for ruling in horizontal_rulings.iter().rev() {
        if ruling.position() > table.top {
            continue;
        }
        if table.top - ruling.position() <= threshold {
            table.top = table.top.min(ruling.position());
            table.left = table.left.min(ruling.left());
            table.right = table.right.max(ruling.right());
        } else {
            break;
        }
    }

    table.top = table.top.floor() - PADDING;
    table.bottom = table.bottom.ceil() + PADDING;
    table.left = table.left.floor() - PADDING;
    table.right = table.right.ceil() + PADDING;
    Some(table)
}

/// Deterministic duplicate removal: biggest areas first, then drop
/// anything contained in (or nearly coincident with) an area already
/// retained. Running this twice yields the same set.
pub(crate) fn dedup_areas(mut areas: Vec<Rect>) -> Vec<Rect> {
    areas.sort_by(|a, b| fcmp(b.area(), a.area()).then(a.cmp_reading_order(b)));
    let mut retained: Vec<Rect> = Vec::new();
    for area in areas {
        let duplicate = retained
            .iter()
            .any(|kept| kept.contains(&area) || kept.overlap_ratio(&area) >= IDENTICAL_OVERLAP);
        if !duplicate {
            retained.push(area);
        }
    }
    retained.sort_by(|a, b| a.cmp_reading_order(b));
    retained
}

#[cfg(test)]
mod tests {
    use super::super::edges::EdgeKind;
    use super::*;

    #[test]
    fn dedup_is_idempotent_and_order_free() {
        let areas = vec![
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Rect::new(1.0, 1.0, 99.0, 99.0),
            Rect::new(0.5, 0.5, 100.0, 100.5),
            Rect::new(300.0, 0.0, 400.0, 80.0),
        ];
        let once = dedup_areas(areas.clone());
        let twice = dedup_areas(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn cell_clusters_need_enough_cells() {
        let mut cells = Vec::new();
        for row in 0..2 {
            for col in 0..2 {
                cells.push(Rect::from_size(
                    col as f64 * 50.0,
                    row as f64 * 20.0,
                    50.0,
                    20.0,
                ));
            }
        }
        // a lone far-away cell never becomes an area
        cells.push(Rect::from_size(1000.0, 1000.0, 50.0, 20.0));
        let areas = areas_from_cells(&cells);
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0], Rect::new(0.0, 0.0, 100.0, 40.0));
    }

    #[test]
    fn grouped_edge_count_takes_biggest_group() {
        let edge = |top: f64, bottom: f64| TextEdge {
            x0: 0.0,
            x1: 1.0,
            top,
            bottom,
            kind: EdgeKind::Left,
            intersecting_row_count: 4,
        };
        let a = edge(0.0, 50.0);
        let b = edge(10.0, 60.0);
        let c = edge(40.0, 55.0);
        let d = edge(200.0, 260.0);
        let pool: Vec<&TextEdge> = vec![&a, &b, &c, &d];
        assert_eq!(grouped_edge_count(&pool), 3);

        let single: Vec<&TextEdge> = vec![&a, &b];
        assert_eq!(grouped_edge_count(&single), 2);
    }
}
