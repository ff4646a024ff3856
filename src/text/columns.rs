//! Column inference from text geometry alone.
//!
//! Merges horizontally-overlapping text into region rectangles line by
//! line; the right edge of each final region is a column boundary. Head
//! and tail lines are treated as suspect (titles, footer notes) and only
//! probed for new regions, never merged.

use crate::geom::{Rect, fcmp};

use super::line::Line;

/// Head/tail schedule by line count: small tables keep everything, larger
/// ones skip the likeliest title and footer rows.
fn trusted_range(line_count: usize) -> (usize, usize) {
    match line_count {
        0..=4 => (0, 0),
        5..=7 => (1, 1),
        _ => (2, 2),
    }
}

/// Derive the ascending list of column right edges from lines sorted by
/// top. Fewer than two resulting regions still yields a usable (one
/// column) answer for the stream extractor.
pub fn column_positions(lines: &[Line]) -> Vec<f64> {
    if lines.is_empty() {
        return Vec::new();
    }

    let (start, skip_end) = trusted_range(lines.len());
    let end = lines.len() - skip_end;

    let mut regions: Vec<Rect> = lines[start]
        .chunks()
        .iter()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.rect)
        .collect();

    for line in &lines[start + 1..end] {
        add_line(&mut regions, line, true);
    }

    // probe passes over the skipped head and tail: columns that only show
    // up in headers still seed regions, but suspect rows never widen one
    for line in &lines[..=start] {
        add_line(&mut regions, line, false);
    }
    for line in &lines[end.saturating_sub(1)..] {
        add_line(&mut regions, line, false);
    }

    // one sorted sweep reaches the merge fixed point: regions are joined
    // while their X intervals chain-overlap
    regions.sort_by(|a, b| fcmp(a.left, b.left));
    let mut merged: Vec<Rect> = Vec::new();
    for region in regions {
        match merged.last_mut() {
            Some(last) if last.horizontally_overlaps(&region) => last.merge(&region),
            _ => merged.push(region),
        }
    }

    let mut columns: Vec<f64> = merged.iter().map(|r| r.right).collect();
    columns.sort_by(|a, b| fcmp(*a, *b));
    columns.dedup();
    columns
}

fn add_line(regions: &mut Vec<Rect>, line: &Line, merge: bool) {
    for chunk in line.chunks() {
        if chunk.is_whitespace() {
            continue;
        }
        let mut matched = false;
        for region in regions.iter_mut() {
            if region.horizontally_overlaps(&chunk.rect) {
                matched = true;
                if merge {
                    region.merge(&chunk.rect);
                }
            }
        }
        if !matched {
            regions.push(chunk.rect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{TextChunk, TextElement, group_by_lines};

    fn chunk(left: f64, top: f64, width: f64) -> TextChunk {
        TextChunk::from_element(TextElement::new(
            Rect::from_size(left, top, width, 10.0),
            "x",
            "Helvetica",
            10.0,
        ))
    }

    fn grid_lines(rows: usize, columns: &[(f64, f64)]) -> Vec<Line> {
        let mut chunks = Vec::new();
        for row in 0..rows {
            for &(left, width) in columns {
                chunks.push(chunk(left, row as f64 * 14.0, width));
            }
        }
        group_by_lines(chunks)
    }

    #[test]
    fn aligned_chunks_produce_one_edge_per_column() {
        let lines = grid_lines(4, &[(50.0, 40.0), (200.0, 40.0), (380.0, 40.0)]);
        let columns = column_positions(&lines);
        assert_eq!(columns, vec![90.0, 240.0, 420.0]);
    }

    #[test]
    fn edges_are_sorted_and_cover_contributing_chunks() {
        let lines = grid_lines(6, &[(10.0, 35.0), (120.0, 20.0), (300.0, 60.0)]);
        let columns = column_positions(&lines);
        for pair in columns.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        for line in &lines {
            for chunk in line.chunks() {
                assert!(columns.iter().any(|c| *c >= chunk.rect.right));
            }
        }
    }

    #[test]
    fn empty_input_yields_no_columns() {
        assert!(column_positions(&[]).is_empty());
    }
}
