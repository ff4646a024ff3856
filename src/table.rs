//! Row-major table matrix assembled by the extractors.

use std::collections::BTreeMap;

use crate::geom::{Rect, fcmp};
use crate::text::TextChunk;

/// One table cell: a rectangle plus the chunks that landed in it.
///
/// Placeholder cells mark positions covered by a spanning neighbor; they
/// carry no text of their own.
#[derive(Clone, Debug)]
pub struct Cell {
    pub rect: Rect,
    chunks: Vec<TextChunk>,
    placeholder: bool,
    ruled: bool,
}

impl Cell {
    /// A cell with a fixed, ruling-derived rectangle.
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            chunks: Vec::new(),
            placeholder: false,
            ruled: true,
        }
    }

    pub(crate) fn placeholder(rect: Rect) -> Self {
        Self {
            rect,
            chunks: Vec::new(),
            placeholder: true,
            ruled: true,
        }
    }

    fn empty() -> Self {
        Self {
            rect: Rect::new(0.0, 0.0, 0.0, 0.0),
            chunks: Vec::new(),
            placeholder: false,
            ruled: false,
        }
    }

    /// Add a chunk. Chunk-seeded cells grow to cover their content;
    /// ruling-derived rectangles stay fixed.
    pub(crate) fn add_chunk(&mut self, chunk: TextChunk) {
        if !self.ruled {
            if self.chunks.is_empty() {
                self.rect = chunk.rect;
            } else {
                self.rect.merge(&chunk.rect);
            }
        }
        self.chunks.push(chunk);
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn chunks(&self) -> &[TextChunk] {
        &self.chunks
    }

    /// Cell text in natural reading order: top-to-bottom, left-to-right,
    /// rows joined by a newline, same-row chunks by a space.
    pub fn text(&self) -> String {
        let mut sorted: Vec<&TextChunk> = self.chunks.iter().collect();
        sorted.sort_by(|a, b| fcmp(a.rect.top, b.rect.top).then(fcmp(a.rect.left, b.rect.left)));

        let mut out = String::new();
        let mut row: Option<Rect> = None;
        for chunk in sorted {
            match row {
                Some(r) if r.vertically_overlaps(&chunk.rect) => out.push(' '),
                Some(_) => out.push('\n'),
                None => {}
            }
            out.push_str(chunk.text());
            row = Some(match row {
                Some(mut r) if r.vertically_overlaps(&chunk.rect) => {
                    r.merge(&chunk.rect);
                    r
                }
                _ => chunk.rect,
            });
        }
        out
    }
}

/// A row-major matrix of cells. Storage is sparse; `rows()` materializes a
/// rectangular grid (every row padded to the same column count).
#[derive(Clone, Debug)]
pub struct Table {
    extraction_method: &'static str,
    rect: Option<Rect>,
    cells: BTreeMap<(usize, usize), Cell>,
    row_count: usize,
    col_count: usize,
}

impl Table {
    pub fn new(extraction_method: &'static str) -> Self {
        Self {
            extraction_method,
            rect: None,
            cells: BTreeMap::new(),
            row_count: 0,
            col_count: 0,
        }
    }

    /// An empty table: what extraction yields for a page with no text.
    pub fn empty(extraction_method: &'static str) -> Self {
        Self::new(extraction_method)
    }

    pub fn with_rect(extraction_method: &'static str, rect: Rect) -> Self {
        let mut table = Self::new(extraction_method);
        table.rect = Some(rect);
        table
    }

    pub fn extraction_method(&self) -> &'static str {
        self.extraction_method
    }

    /// Bounding rectangle; encloses every placed element by construction.
    pub fn rect(&self) -> Rect {
        self.rect.unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0))
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn col_count(&self) -> usize {
        self.col_count
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn grow(&mut self, row: usize, col: usize) {
        self.row_count = self.row_count.max(row + 1);
        self.col_count = self.col_count.max(col + 1);
    }

    /// Place a chunk at (row, col), merging with anything already there.
    pub fn add(&mut self, chunk: TextChunk, row: usize, col: usize) {
        self.grow(row, col);
        match self.rect.as_mut() {
            Some(r) => r.merge(&chunk.rect),
            None => self.rect = Some(chunk.rect),
        }
        self.cells
            .entry((row, col))
            .or_insert_with(Cell::empty)
            .add_chunk(chunk);
    }

    /// Place a prebuilt cell at (row, col); used by lattice extraction.
    pub fn put_cell(&mut self, row: usize, col: usize, cell: Cell) {
        self.grow(row, col);
        match self.rect.as_mut() {
            Some(r) => r.merge(&cell.rect),
            None => self.rect = Some(cell.rect),
        }
        self.cells.insert((row, col), cell);
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// The rectangular matrix: every row has `col_count` cells, missing
    /// positions filled with empty cells.
    pub fn rows(&self) -> Vec<Vec<Cell>> {
        (0..self.row_count)
            .map(|r| {
                (0..self.col_count)
                    .map(|c| self.cells.get(&(r, c)).cloned().unwrap_or_else(Cell::empty))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TextElement;

    fn chunk(left: f64, top: f64, text: &str) -> TextChunk {
        TextChunk::from_element(TextElement::new(
            Rect::from_size(left, top, 30.0, 10.0),
            text,
            "Helvetica",
            10.0,
        ))
    }

    #[test]
    fn rows_are_rectangular() {
        let mut table = Table::new("stream");
        table.add(chunk(0.0, 0.0, "a"), 0, 0);
        table.add(chunk(100.0, 30.0, "b"), 2, 3);
        let rows = table.rows();
        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert_eq!(row.len(), 4);
        }
    }

    #[test]
    fn rect_encloses_placed_chunks() {
        let mut table = Table::new("stream");
        table.add(chunk(0.0, 0.0, "a"), 0, 0);
        table.add(chunk(200.0, 90.0, "b"), 1, 1);
        let rect = table.rect();
        assert!(rect.contains(&Rect::from_size(0.0, 0.0, 30.0, 10.0)));
        assert!(rect.contains(&Rect::from_size(200.0, 90.0, 30.0, 10.0)));
    }

    #[test]
    fn same_cell_chunks_concatenate_in_reading_order() {
        let mut table = Table::new("stream");
        table.add(chunk(40.0, 0.0, "world"), 0, 0);
        table.add(chunk(0.0, 0.0, "hello"), 0, 0);
        table.add(chunk(0.0, 20.0, "below"), 0, 0);
        let cell = table.cell(0, 0).unwrap();
        assert_eq!(cell.text(), "hello world\nbelow");
    }
}
