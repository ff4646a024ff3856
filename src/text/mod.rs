//! Text assembly: glyphs into word chunks, chunks into lines, lines into
//! inferred column boundaries.

mod chunk;
mod columns;
mod element;
mod line;

pub use chunk::TextChunk;
pub use columns::column_positions;
pub use element::{TextElement, merge_words};
pub use line::{Line, group_by_lines};

/// Horizontal gap above which two glyphs no longer belong to one chunk.
pub(crate) const X_TOLERANCE: f64 = 3.0;

/// Baseline band tolerance when sorting glyphs into rows for merging.
pub(crate) const Y_TOLERANCE: f64 = 3.0;

/// Two chunks share a text line when their vertical projections overlap by
/// at least this fraction of the smaller height.
pub(crate) const LINE_OVERLAP_RATIO: f64 = 0.1;
