//! Page-level table-area detection: pixel-derived rulings, cell grids,
//! and persistent text-edge alignments combined into table rectangles.

mod areas;
mod edges;
mod pixels;

pub use areas::{DetectionContext, Detector};
pub use edges::{EdgeKind, TextEdge};
pub use pixels::{horizontal_rulings, vertical_rulings};

/// Grayscale jump that marks a candidate ruling edge in the raster.
pub(crate) const INTENSITY_THRESHOLD: i32 = 25;

/// Minimum pixel run for a horizontal ruling.
pub(crate) const H_MIN_WIDTH: u32 = 50;

/// Minimum pixel run for a vertical ruling.
pub(crate) const V_MIN_HEIGHT: u32 = 10;

/// Corner distance under which two cells belong to one table cluster.
pub(crate) const CELL_CORNER_DISTANCE: f64 = 10.0;

/// Endpoint snap tolerance applied to pixel-derived rulings.
pub(crate) const POINT_SNAP: f64 = 8.0;

/// Padding added around accepted table areas.
pub(crate) const PADDING: f64 = 1.0;

/// Text chunks must align at least this often to form a text edge.
pub(crate) const REQUIRED_LINES_FOR_EDGE: usize = 4;

/// Cell clusters smaller than this never become a table area.
pub(crate) const REQUIRED_CELLS_FOR_TABLE: usize = 4;

/// Overlap ratio at which two areas count as the same table.
pub(crate) const IDENTICAL_OVERLAP: f64 = 0.9;

/// Row-height multiples for pulling nearby horizontal rulings into a
/// text-derived table, below and above.
pub(crate) const ROW_HEIGHT_MULT_BOTTOM: f64 = 1.5;
pub(crate) const ROW_HEIGHT_MULT_TOP: f64 = 2.0;

/// Chunks wider than this fraction of the page are justified paragraph
/// text, not table content.
pub(crate) const WIDE_CHUNK_PAGE_FRACTION: f64 = 0.38;

/// Pixel expansion used when collapsing raster-derived rulings; bridges
/// gaps left by edge detection and snapping.
pub(crate) const RULING_COLLAPSE_EXPANSION: f64 = 5.0;

/// Raster density the pixel thresholds are tuned for: two image pixels
/// per page unit.
pub(crate) const DEFAULT_DPI: u32 = 144;
