//! Spreadsheet (lattice) extraction: tables assembled from a grid of
//! ruling-bounded cells.

use std::collections::{HashMap, HashSet, VecDeque};

use ordered_float::OrderedFloat;
use tracing::debug;

use crate::geom::{Rect, Ruling, cluster_values, fcmp};
use crate::page::Page;
use crate::table::{Cell, Table};
use crate::text::{TextChunk, merge_words};

use super::cells::find_cells;
use super::ExtractionAlgorithm;

/// X/Y slack when clustering cell edges into row and column bands.
const BAND_TOLERANCE: f64 = 2.0;

/// Gap bridged when joining colinear ruling segments.
const RULING_JOIN: f64 = 1.0;

const LABEL: &str = "lattice";

/// Ruling-driven extractor: reconstructs cells from the intersection grid
/// and assembles one table per connected cell group.
#[derive(Default)]
pub struct SpreadsheetExtractor;

impl SpreadsheetExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract using the rulings the page itself carries.
    pub fn extract(&self, page: &Page) -> Vec<Table> {
        self.extract_with_rulings(page, page.rulings())
    }

    /// Extract using a caller-supplied ruling set (the mixed-mode handoff
    /// path and the detector both use this).
    pub fn extract_with_rulings(&self, page: &Page, rulings: Vec<Ruling>) -> Vec<Table> {
        let collapsed = Ruling::collapse_oriented_rulings(rulings, RULING_JOIN);
        let (horizontals, verticals): (Vec<Ruling>, Vec<Ruling>) =
            collapsed.into_iter().partition(|r| r.horizontal());

        let cells = find_cells(&horizontals, &verticals);
        debug!(
            cells = cells.len(),
            horizontals = horizontals.len(),
            verticals = verticals.len(),
            "lattice grid reconstructed"
        );
        if cells.is_empty() {
            return Vec::new();
        }

        let chunks = merge_words(page.text(), &verticals);

        let mut tables: Vec<Table> = group_cells(cells)
            .into_iter()
            .map(|group| build_table(&group, &chunks))
            .collect();
        tables.sort_by(|a, b| a.rect().cmp_reading_order(&b.rect()));
        tables
    }
}

impl ExtractionAlgorithm for SpreadsheetExtractor {
    fn extract(&self, page: &Page) -> Vec<Table> {
        SpreadsheetExtractor::extract(self, page)
    }

    fn label(&self) -> &'static str {
        LABEL
    }
}

type CornerKey = (OrderedFloat<f64>, OrderedFloat<f64>);

fn corner_keys(cell: &Rect) -> [CornerKey; 4] {
    cell.points()
        .map(|(x, y)| (OrderedFloat(x), OrderedFloat(y)))
}

/// Group cells into connected components over shared corners (cells come
/// from one snapped grid, so shared corners compare exactly).
fn group_cells(cells: Vec<Rect>) -> Vec<Vec<Rect>> {
    let mut by_corner: HashMap<CornerKey, Vec<usize>> = HashMap::new();
    for (idx, cell) in cells.iter().enumerate() {
        for key in corner_keys(cell) {
            by_corner.entry(key).or_default().push(idx);
        }
    }

    let mut visited = vec![false; cells.len()];
    let mut groups: Vec<Vec<Rect>> = Vec::new();
    let mut queue: VecDeque<usize> = VecDeque::new();

    for start in 0..cells.len() {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        queue.push_back(start);
        let mut group = Vec::new();
        while let Some(idx) = queue.pop_front() {
            group.push(cells[idx]);
            for key in corner_keys(&cells[idx]) {
                if let Some(neighbors) = by_corner.get(&key) {
                    for &n in neighbors {
                        if !visited[n] {
                            visited[n] = true;
                            queue.push_back(n);
                        }
                    }
                }
            }
        }
        groups.push(group);
    }
    groups
}

/// Map every observed edge coordinate to its band index.
fn band_index(values: Vec<f64>) -> (Vec<f64>, HashMap<OrderedFloat<f64>, usize>) {
    let mut unique = values;
    unique.sort_by(|a, b| fcmp(*a, *b));
    unique.dedup();
    let clusters = cluster_values(unique, BAND_TOLERANCE);

    let mut starts = Vec::with_capacity(clusters.len());
    let mut index = HashMap::new();
    for (i, cluster) in clusters.into_iter().enumerate() {
        starts.push(cluster.iter().sum::<f64>() / cluster.len() as f64);
        for value in cluster {
            index.insert(OrderedFloat(value), i);
        }
    }
    (starts, index)
}

/// Assemble one table from a connected cell group: cluster left edges into
/// column bands and top edges into row bands, place each cell at its
/// top-left band pair, and mark the rest of a spanning cell's extent with
/// placeholders. A chunk belongs to the cell containing its center.
fn build_table(group: &[Rect], chunks: &[TextChunk]) -> Table {
    let (col_starts, col_index) = band_index(group.iter().map(|c| c.left).collect());
    let (row_starts, row_index) = band_index(group.iter().map(|c| c.top).collect());

    let slot = |cell: &Rect| -> (usize, usize) {
        let row = row_index
            .get(&OrderedFloat(cell.top))
            .copied()
            .unwrap_or(0);
        let col = col_index
            .get(&OrderedFloat(cell.left))
            .copied()
            .unwrap_or(0);
        (row, col)
    };

    let mut table = Table::new(LABEL);
    let mut occupied: HashSet<(usize, usize)> = HashSet::new();

    let mut placed: Vec<(usize, usize, Cell)> = Vec::new();
    for rect in group {
        let (row, col) = slot(rect);
        let mut cell = Cell::new(*rect);
        for chunk in chunks {
            if chunk.is_whitespace() {
                continue;
            }
            let (cx, cy) = chunk.center();
            if cx >= rect.left && cx < rect.right && cy >= rect.top && cy < rect.bottom {
                cell.add_chunk(chunk.clone());
            }
        }
        occupied.insert((row, col));
        placed.push((row, col, cell));
    }

    for (row, col, cell) in placed {
        let rect = cell.rect;
        table.put_cell(row, col, cell);

        // a cell reaching past the next band start spans that band too
        let row_span: Vec<usize> = (row + 1..row_starts.len())
            .take_while(|&r| row_starts[r] < rect.bottom - BAND_TOLERANCE)
            .collect();
        let col_span: Vec<usize> = (col + 1..col_starts.len())
            .take_while(|&c| col_starts[c] < rect.right - BAND_TOLERANCE)
            .collect();
        for &r in std::iter::once(&row).chain(row_span.iter()) {
            for &c in std::iter::once(&col).chain(col_span.iter()) {
                if (r, c) != (row, col) && !occupied.contains(&(r, c)) {
                    occupied.insert((r, c));
                    table.put_cell(r, c, Cell::placeholder(rect));
                }
            }
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separate_grids_form_separate_groups() {
        let mut cells = Vec::new();
        for y in [0.0, 10.0] {
            for x in [0.0, 10.0] {
                cells.push(Rect::from_size(x, y, 10.0, 10.0));
                cells.push(Rect::from_size(x + 100.0, y + 100.0, 10.0, 10.0));
            }
        }
        let groups = group_cells(cells);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 4);
    }

    #[test]
    fn spanning_cell_occupies_both_columns() {
        let group = vec![
            Rect::new(0.0, 0.0, 100.0, 50.0),
            Rect::new(100.0, 0.0, 200.0, 50.0),
            Rect::new(0.0, 50.0, 200.0, 100.0),
        ];
        let table = build_table(&group, &[]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.col_count(), 2);
        assert!(!table.cell(1, 0).unwrap().is_placeholder());
        assert!(table.cell(1, 1).unwrap().is_placeholder());
    }
}
