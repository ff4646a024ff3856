//! The page abstraction supplied by the document source, plus the
//! rasterization contract the detector consumes.

use image::GrayImage;

use crate::Result;
use crate::geom::{Rect, Ruling};
use crate::text::TextElement;

/// One logical page: positioned text elements plus any vector rulings the
/// document carried. Pages own their data by value; sub-page views are
/// clipped copies, never aliases.
#[derive(Clone, Debug)]
pub struct Page {
    bounds: Rect,
    text: Vec<TextElement>,
    horizontal_rulings: Vec<Ruling>,
    vertical_rulings: Vec<Ruling>,
}

impl Page {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            text: Vec::new(),
            horizontal_rulings: Vec::new(),
            vertical_rulings: Vec::new(),
        }
    }

    pub fn add_text(&mut self, element: TextElement) {
        self.text.push(element);
    }

    /// Add a ruling; it is normalized on the way in and silently dropped
    /// when it stays oblique or degenerate (zero-length or NaN span).
    pub fn add_ruling(&mut self, mut ruling: Ruling) {
        ruling.normalize();
        if !(ruling.length() > 0.0) {
            return;
        }
        if ruling.horizontal() {
            self.horizontal_rulings.push(ruling);
        } else if ruling.vertical() {
            self.vertical_rulings.push(ruling);
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn left(&self) -> f64 {
        self.bounds.left
    }

    pub fn top(&self) -> f64 {
        self.bounds.top
    }

    pub fn right(&self) -> f64 {
        self.bounds.right
    }

    pub fn bottom(&self) -> f64 {
        self.bounds.bottom
    }

    pub fn width(&self) -> f64 {
        self.bounds.width()
    }

    pub fn height(&self) -> f64 {
        self.bounds.height()
    }

    pub fn text(&self) -> &[TextElement] {
        &self.text
    }

    pub fn horizontal_rulings(&self) -> &[Ruling] {
        &self.horizontal_rulings
    }

    pub fn vertical_rulings(&self) -> &[Ruling] {
        &self.vertical_rulings
    }

    pub fn rulings(&self) -> Vec<Ruling> {
        let mut all = self.horizontal_rulings.clone();
        all.extend_from_slice(&self.vertical_rulings);
        all
    }

    /// Bounding box of all text on the page, or None when there is none.
    pub fn text_bounds(&self) -> Option<Rect> {
        Rect::bounding_box_of(self.text.iter().map(|e| &e.rect))
    }

    /// A clipped sub-page view: bounds intersected with `rect`, keeping
    /// the text elements and rulings that touch it.
    pub fn area(&self, rect: Rect) -> Page {
        let clipped = Rect::new(
            rect.left.max(self.bounds.left),
            rect.top.max(self.bounds.top),
            rect.right.min(self.bounds.right),
            rect.bottom.min(self.bounds.bottom),
        );
        Page {
            bounds: clipped,
            text: self
                .text
                .iter()
                .filter(|e| clipped.intersects(&e.rect))
                .cloned()
                .collect(),
            horizontal_rulings: self
                .horizontal_rulings
                .iter()
                .filter(|r| clipped.intersects_ruling(r))
                .cloned()
                .collect(),
            vertical_rulings: self
                .vertical_rulings
                .iter()
                .filter(|r| clipped.intersects_ruling(r))
                .cloned()
                .collect(),
        }
    }

    pub fn intersects_ruling(&self, ruling: &Ruling) -> bool {
        self.bounds.intersects_ruling(ruling)
    }
}

/// Rasterization contract. At the default 144 DPI the raster carries two
/// image pixels per page unit along each axis. The text-suppressed variant
/// models the content-stream rewrite that strips glyph operators before
/// vertical ruling detection.
pub trait PageRenderer {
    fn render_grayscale(&self, page: &Page, dpi: u32) -> Result<GrayImage>;

    fn render_grayscale_without_text(&self, page: &Page, dpi: u32) -> Result<GrayImage>;
}
