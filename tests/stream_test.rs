//! Tests for stream extraction, including the mixed-mode handoff.

use tablescan::{Page, Rect, Ruling, StreamExtractor, TextElement};

fn word(page: &mut Page, left: f64, top: f64, text: &str) {
    for (i, ch) in text.chars().enumerate() {
        page.add_text(TextElement::new(
            Rect::from_size(left + i as f64 * 6.0, top, 6.0, 10.0),
            ch.to_string(),
            "Helvetica",
            10.0,
        ));
    }
}

fn page_with_grid(rows: usize) -> Page {
    let mut page = Page::new(Rect::new(0.0, 0.0, 612.0, 792.0));
    for row in 0..rows {
        let top = 100.0 + row as f64 * 20.0;
        word(&mut page, 50.0, top, &format!("r{row}a"));
        word(&mut page, 200.0, top, &format!("r{row}b"));
        word(&mut page, 380.0, top, &format!("r{row}c"));
    }
    page
}

#[test]
fn test_pure_text_table_four_by_three() {
    let page = page_with_grid(4);
    let tables = StreamExtractor::new().extract(&page);
    assert_eq!(tables.len(), 1);

    let table = &tables[0];
    assert_eq!(table.extraction_method(), "stream");
    assert_eq!(table.row_count(), 4);
    assert_eq!(table.col_count(), 3);

    let rows = table.rows();
    for row in &rows {
        assert_eq!(row.len(), 3);
    }
    assert_eq!(rows[2][1].text(), "r2b");
    assert_eq!(rows[0][0].text(), "r0a");
    assert_eq!(rows[3][2].text(), "r3c");
}

#[test]
fn test_placed_chunks_stay_inside_table_rect() {
    let page = page_with_grid(5);
    let tables = StreamExtractor::new().extract(&page);
    let table = &tables[0];
    let rect = table.rect();
    for row in table.rows() {
        for cell in row {
            for chunk in cell.chunks() {
                let (cx, cy) = chunk.center();
                assert!(rect.contains_point((cx, cy)));
            }
        }
    }
}

#[test]
fn test_empty_page_yields_single_empty_table() {
    let page = Page::new(Rect::new(0.0, 0.0, 612.0, 792.0));
    let tables = StreamExtractor::new().extract(&page);
    assert_eq!(tables.len(), 1);
    assert!(tables[0].is_empty());
    assert_eq!(tables[0].row_count(), 0);
}

#[test]
fn test_explicit_columns_override_inference() {
    let page = page_with_grid(4);
    let tables = StreamExtractor::new().extract_with_columns(&page, &[120.0, 300.0, 500.0]);
    let table = &tables[0];
    assert_eq!(table.col_count(), 3);
    // chunk at left 50 falls before the 120 edge, 200 before 300, 380
    // before 500
    assert_eq!(table.rows()[1][0].text(), "r1a");
    assert_eq!(table.rows()[1][1].text(), "r1b");
    assert_eq!(table.rows()[1][2].text(), "r1c");
}

#[test]
fn test_mixed_mode_stays_off_below_ratio() {
    let mut page = page_with_grid(5);
    // one meaningful ruling over five lines: 0.2, under the threshold
    page.add_ruling(Ruling::horizontal_at(130.0, 40.0, 500.0));
    let tables = StreamExtractor::new().with_mixed_mode(true).extract(&page);
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].extraction_method(), "stream");
}

#[test]
fn test_mixed_mode_requires_the_flag() {
    let mut page = page_with_grid(5);
    page.add_ruling(Ruling::horizontal_at(130.0, 40.0, 500.0));
    page.add_ruling(Ruling::horizontal_at(150.0, 40.0, 500.0));
    let tables = StreamExtractor::new().extract(&page);
    assert_eq!(tables[0].extraction_method(), "stream");
}

#[test]
fn test_mixed_mode_delegates_to_spreadsheet() {
    let mut page = page_with_grid(5);
    // two meaningful rulings over five lines: 0.4, over the threshold
    page.add_ruling(Ruling::horizontal_at(130.0, 40.0, 500.0));
    page.add_ruling(Ruling::horizontal_at(150.0, 40.0, 500.0));

    let tables = StreamExtractor::new().with_mixed_mode(true).extract(&page);
    assert!(!tables.is_empty());
    let table = &tables[0];
    assert_eq!(table.extraction_method(), "lattice");

    // the two interior rulings plus synthesized page-edge rulings split
    // the five text lines into three row bands over three columns
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.col_count(), 3);

    let rows = table.rows();
    let band_one = rows[0][0].text();
    assert!(band_one.contains("r0a"));
    assert!(band_one.contains("r1a"));
    assert_eq!(rows[1][1].text(), "r2b");
    let band_three = rows[2][2].text();
    assert!(band_three.contains("r3c"));
    assert!(band_three.contains("r4c"));
}

#[test]
fn test_rulings_outside_text_are_discounted() {
    let mut page = page_with_grid(5);
    // both rulings sit above all text, so they are not meaningful and the
    // page must not flip to spreadsheet extraction
    page.add_ruling(Ruling::horizontal_at(20.0, 40.0, 500.0));
    page.add_ruling(Ruling::horizontal_at(40.0, 40.0, 500.0));
    let tables = StreamExtractor::new().with_mixed_mode(true).extract(&page);
    assert_eq!(tables[0].extraction_method(), "stream");
}
