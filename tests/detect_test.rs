//! Tests for page-level table-area detection.

use image::{GrayImage, Luma};
use tablescan::{Detector, Error, Page, PageRenderer, Rect, Result, TextElement};

/// Renders pages as blank rasters: no pixel rulings, text-edge path only.
struct BlankRenderer;

fn blank_raster(page: &Page, dpi: u32) -> GrayImage {
    let scale = dpi as f64 / 72.0;
    GrayImage::from_pixel(
        (page.width() * scale) as u32,
        (page.height() * scale) as u32,
        Luma([255u8]),
    )
}

impl PageRenderer for BlankRenderer {
    fn render_grayscale(&self, page: &Page, dpi: u32) -> Result<GrayImage> {
        Ok(blank_raster(page, dpi))
    }

    fn render_grayscale_without_text(&self, page: &Page, dpi: u32) -> Result<GrayImage> {
        Ok(blank_raster(page, dpi))
    }
}

/// Paints the page's own rulings into the raster, black on white.
struct RulingRenderer;

impl RulingRenderer {
    fn paint(page: &Page, dpi: u32) -> GrayImage {
        let scale = dpi as f64 / 72.0;
        let mut image = blank_raster(page, dpi);
        for r in page.horizontal_rulings() {
            let y = (r.position() * scale) as u32;
            for x in (r.left() * scale) as u32..=(r.right() * scale) as u32 {
                image.put_pixel(x, y, Luma([0u8]));
            }
        }
        for r in page.vertical_rulings() {
            let x = (r.position() * scale) as u32;
            for y in (r.top() * scale) as u32..=(r.bottom() * scale) as u32 {
                image.put_pixel(x, y, Luma([0u8]));
            }
        }
        image
    }
}

impl PageRenderer for RulingRenderer {
    fn render_grayscale(&self, page: &Page, dpi: u32) -> Result<GrayImage> {
        Ok(Self::paint(page, dpi))
    }

    fn render_grayscale_without_text(&self, page: &Page, dpi: u32) -> Result<GrayImage> {
        Ok(Self::paint(page, dpi))
    }
}

struct FailingRenderer;

impl PageRenderer for FailingRenderer {
    fn render_grayscale(&self, _page: &Page, _dpi: u32) -> Result<GrayImage> {
        Err(Error::Rasterization("no backend".to_string()))
    }

    fn render_grayscale_without_text(&self, _page: &Page, _dpi: u32) -> Result<GrayImage> {
        Err(Error::TextSuppression("no backend".to_string()))
    }
}

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

fn add_rows(page: &mut Page, first_top: f64, rows: usize, spacing: f64) {
    for row in 0..rows {
        let top = first_top + row as f64 * spacing;
        word(page, 50.0, top, "aaa");
        word(page, 200.0, top, "bbb");
        word(page, 380.0, top, "ccc");
    }
}

/// Two text-only tables separated by a paragraph line.
fn two_table_page() -> Page {
    let mut page = Page::new(Rect::new(0.0, 0.0, 612.0, 792.0));
    add_rows(&mut page, 100.0, 5, 15.0);
    page.add_text(TextElement::new(
        Rect::from_size(30.0, 250.0, 470.0, 10.0),
        "a long paragraph of prose separating the upper and lower tables",
        "Helvetica",
        10.0,
    ));
    add_rows(&mut page, 320.0, 5, 15.0);
    page
}

#[test]
fn test_two_text_tables_detected_separately() {
    let page = two_table_page();
    let context = Detector::new().detect(&page, &BlankRenderer);

    assert_eq!(context.tables.len(), 2);
    let (first, second) = (context.tables[0], context.tables[1]);
    assert!(!first.intersects(&second));
    assert!(first.bottom <= second.top);

    // the upper table covers its five rows and stops before the paragraph
    assert!(first.contains_point((200.0, 130.0)));
    assert!(first.bottom < 250.0);
    assert!(second.contains_point((200.0, 350.0)));
}

#[test]
fn test_ruled_grid_detected_from_raster() {
    let mut page = Page::new(Rect::new(0.0, 0.0, 612.0, 792.0));
    for i in 0..5 {
        page.add_ruling(tablescan::Ruling::horizontal_at(
            40.0 + i as f64 * 50.0,
            50.0,
            350.0,
        ));
    }
    for i in 0..4 {
        page.add_ruling(tablescan::Ruling::vertical_at(
            50.0 + i as f64 * 100.0,
            40.0,
            240.0,
        ));
    }
    // three text rows keep the area from being discarded as a graphic
    for row in 0..3 {
        let top = 60.0 + row as f64 * 50.0;
        word(&mut page, 60.0, top, "aaa");
        word(&mut page, 160.0, top, "bbb");
        word(&mut page, 260.0, top, "ccc");
    }

    let context = Detector::new().detect(&page, &RulingRenderer);
    assert_eq!(context.tables.len(), 1);
    assert!(context.tables[0].contains(&Rect::new(60.0, 50.0, 340.0, 230.0)));
}

#[test]
fn test_graphic_without_text_is_discarded() {
    let mut page = Page::new(Rect::new(0.0, 0.0, 612.0, 792.0));
    for i in 0..3 {
        page.add_ruling(tablescan::Ruling::horizontal_at(
            40.0 + i as f64 * 50.0,
            50.0,
            350.0,
        ));
        page.add_ruling(tablescan::Ruling::vertical_at(
            50.0 + i as f64 * 100.0,
            40.0,
            140.0,
        ));
    }
    let context = Detector::new().detect(&page, &RulingRenderer);
    assert!(context.tables.is_empty());
}

#[test]
fn test_bullet_column_is_not_a_table() {
    let mut page = Page::new(Rect::new(0.0, 0.0, 612.0, 792.0));
    for row in 0..5 {
        page.add_text(TextElement::new(
            Rect::from_size(40.0, 100.0 + row as f64 * 14.0, 3.0, 10.0),
            "\u{2022}",
            "Helvetica",
            10.0,
        ));
    }
    let context = Detector::new().detect(&page, &BlankRenderer);
    assert!(context.tables.is_empty());
}

#[test]
fn test_rasterization_failure_yields_empty_context() {
    let page = two_table_page();
    let detector = Detector::new();
    let context = detector.detect(&page, &FailingRenderer);
    assert!(context.tables.is_empty());
    assert!(detector.blunt_detect(&page, &context).is_none());
}

#[test]
fn test_blunt_detect_finds_the_biggest_table() {
    let page = two_table_page();
    let detector = Detector::new();
    let context = detector.detect(&page, &BlankRenderer);

    let blunt = detector.blunt_detect(&page, &context);
    let area = blunt.expect("blunt detection should find a table");
    assert!(area.contains_point((200.0, 130.0)));
}

#[test]
fn test_detection_is_stable_across_runs() {
    let page = two_table_page();
    let detector = Detector::new();
    let first = detector.detect(&page, &BlankRenderer);
    let second = detector.detect(&page, &BlankRenderer);
    assert_eq!(first.tables, second.tables);
}
