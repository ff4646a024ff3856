//! Stream extraction: column structure inferred from text geometry, rows
//! binned by line.

use tracing::debug;

use crate::geom::{Ruling, fcmp};
use crate::page::Page;
use crate::table::Table;
use crate::text::{Line, column_positions, group_by_lines, merge_words};

use super::spreadsheet::SpreadsheetExtractor;
use super::{ExtractionAlgorithm, MIXED_MODE_RULING_RATIO};

const LABEL: &str = "stream";

/// Text-only extractor. Columns come from `column_positions` unless the
/// caller supplies explicit vertical ruling X positions. With mixed mode
/// enabled, a page whose horizontal rulings are dense relative to its text
/// lines is reinterpreted as a spreadsheet on synthesized column rulings.
#[derive(Default)]
pub struct StreamExtractor {
    mixed_mode: bool,
}

impl StreamExtractor {
    pub fn new() -> Self {
        Self { mixed_mode: false }
    }

    pub fn with_mixed_mode(mut self, enabled: bool) -> Self {
        self.mixed_mode = enabled;
        self
    }

    pub fn extract(&self, page: &Page) -> Vec<Table> {
        self.extract_inner(page, None)
    }

    /// Extract with caller-supplied column positions overriding inference.
    pub fn extract_with_columns(&self, page: &Page, column_xs: &[f64]) -> Vec<Table> {
        self.extract_inner(page, Some(column_xs.to_vec()))
    }

    fn extract_inner(&self, page: &Page, explicit_columns: Option<Vec<f64>>) -> Vec<Table> {
        if page.text().is_empty() {
            return vec![Table::empty(LABEL)];
        }

        // explicit columns double as chunk split barriers
        let barriers: Vec<Ruling> = explicit_columns
            .as_deref()
            .map(|xs| {
                xs.iter()
                    .map(|&x| Ruling::vertical_at(x, page.top(), page.bottom()))
                    .collect()
            })
            .unwrap_or_default();

        let chunks = merge_words(page.text(), &barriers);
        let lines = group_by_lines(chunks);

        let columns = match explicit_columns {
            Some(mut xs) => {
                xs.sort_by(|a, b| fcmp(*a, *b));
                xs
            }
            None => column_positions(&lines),
        };

        if self.mixed_mode {
            if let Some(tables) = self.mixed_extraction(page, &lines, &columns) {
                return tables;
            }
        }

        let mut table = Table::with_rect(LABEL, page.bounds());
        for (row, line) in lines.iter().enumerate() {
            for chunk in line.chunks() {
                if chunk.is_whitespace() {
                    continue;
                }
                let col = columns
                    .iter()
                    .position(|&edge| chunk.rect.left <= edge)
                    .unwrap_or(columns.len());
                table.add(chunk.clone(), row, col);
            }
        }
        vec![table]
    }

    /// Decide and perform the spreadsheet handoff. Horizontal rulings are
    /// collapsed, clipped to the page, and discounted when they lie
    /// entirely above or below all text; the survivors drive the ratio
    /// test against the line count.
    fn mixed_extraction(
        &self,
        page: &Page,
        lines: &[Line],
        columns: &[f64],
    ) -> Option<Vec<Table>> {
        if lines.is_empty() {
            return None;
        }
        let content_top = lines.first()?.top();
        let content_bottom = lines.last()?.bottom();

        let mut horizontals =
            Ruling::collapse_oriented_rulings(page.horizontal_rulings().to_vec(), 1.0);
        horizontals.retain(|r| {
            page.intersects_ruling(r)
                && r.position() >= content_top
                && r.position() <= content_bottom
        });

        let ratio = horizontals.len() as f64 / lines.len() as f64;
        if ratio <= MIXED_MODE_RULING_RATIO {
            return None;
        }
        debug!(
            rulings = horizontals.len(),
            lines = lines.len(),
            ratio,
            "mixed mode triggered, delegating to spreadsheet extraction"
        );

        let min_ruling = horizontals
            .iter()
            .map(Ruling::position)
            .fold(f64::INFINITY, f64::min);
        let max_ruling = horizontals
            .iter()
            .map(Ruling::position)
            .fold(f64::NEG_INFINITY, f64::max);

        for r in &mut horizontals {
            *r = Ruling::horizontal_at(r.position(), page.left(), page.right());
        }
        // text overhanging the outermost rulings gets page-edge rulings so
        // the first and last rows still close into cells
        if content_top < min_ruling {
            horizontals.push(Ruling::horizontal_at(page.top(), page.left(), page.right()));
        }
        if content_bottom > max_ruling {
            horizontals.push(Ruling::horizontal_at(
                page.bottom(),
                page.left(),
                page.right(),
            ));
        }

        // one extra column left of the page keeps the first column visible;
        // the +1 offset keeps column rulings off the rightmost glyphs
        let mut column_edges = columns.to_vec();
        column_edges.push(page.left() - 1.0);
        let mut combined: Vec<Ruling> = column_edges
            .iter()
            .map(|&edge| Ruling::vertical_at(edge + 1.0, page.top(), page.bottom()))
            .collect();
        combined.extend(horizontals);

        Some(SpreadsheetExtractor::new().extract_with_rulings(page, combined))
    }
}

impl ExtractionAlgorithm for StreamExtractor {
    fn extract(&self, page: &Page) -> Vec<Table> {
        StreamExtractor::extract(self, page)
    }

    fn label(&self) -> &'static str {
        LABEL
    }
}
