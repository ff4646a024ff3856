//! Grouping of chunks into text lines by Y band.

use crate::geom::{Rect, fcmp};

use super::LINE_OVERLAP_RATIO;
use super::chunk::TextChunk;

/// An ordered run of chunks sharing a baseline band.
#[derive(Clone, Debug)]
pub struct Line {
    pub rect: Rect,
    chunks: Vec<TextChunk>,
}

impl Line {
    fn from_chunk(chunk: TextChunk) -> Self {
        Self {
            rect: chunk.rect,
            chunks: vec![chunk],
        }
    }

    fn add(&mut self, chunk: TextChunk) {
        self.rect.merge(&chunk.rect);
        self.chunks.push(chunk);
    }

    /// Chunks in left-to-right order.
    pub fn chunks(&self) -> &[TextChunk] {
        &self.chunks
    }

    pub fn top(&self) -> f64 {
        self.rect.top
    }

    pub fn bottom(&self) -> f64 {
        self.rect.bottom
    }
}

/// Group chunks into lines sorted by top. Two chunks share a line when
/// their vertical projections overlap by at least a tenth of the smaller
/// height.
pub fn group_by_lines(chunks: Vec<TextChunk>) -> Vec<Line> {
    let mut sorted = chunks;
    sorted.sort_by(|a, b| fcmp(a.rect.top, b.rect.top).then(fcmp(a.rect.left, b.rect.left)));

    let mut lines: Vec<Line> = Vec::new();
    for chunk in sorted {
        match lines.last_mut() {
            Some(line) if line.rect.vertical_overlap_ratio(&chunk.rect) >= LINE_OVERLAP_RATIO => {
                line.add(chunk);
            }
            _ => lines.push(Line::from_chunk(chunk)),
        }
    }
    for line in &mut lines {
        line.chunks
            .sort_by(|a, b| fcmp(a.rect.left, b.rect.left));
    }
    lines
}
