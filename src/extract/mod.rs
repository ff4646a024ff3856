//! Table extraction algorithms and the page-parallel driver.

mod cells;
mod spreadsheet;
mod stream;

pub use cells::find_cells;
pub use spreadsheet::SpreadsheetExtractor;
pub use stream::StreamExtractor;

use rayon::prelude::*;

use crate::page::Page;
use crate::table::Table;

/// Meaningful horizontal rulings per text line above which the stream
/// extractor hands the page to the spreadsheet extractor (mixed mode).
pub(crate) const MIXED_MODE_RULING_RATIO: f64 = 0.33;

/// A table extraction strategy applied to one page at a time.
pub trait ExtractionAlgorithm {
    fn extract(&self, page: &Page) -> Vec<Table>;

    /// Short name recorded on produced tables ("stream" / "lattice").
    fn label(&self) -> &'static str;
}

/// Run an extraction algorithm over independent pages in parallel. Pages
/// share no mutable state, so this is the one bulk parallelism
/// opportunity; everything within a page stays single-threaded.
pub fn extract_pages<A>(algorithm: &A, pages: &[Page]) -> Vec<Vec<Table>>
where
    A: ExtractionAlgorithm + Sync,
{
    pages.par_iter().map(|p| algorithm.extract(p)).collect()
}
