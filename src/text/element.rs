//! Positioned glyph fragments and their merge into word chunks.

use crate::geom::{Rect, Ruling, cluster_objects};

use super::chunk::TextChunk;
use super::{X_TOLERANCE, Y_TOLERANCE};

/// A glyph or glyph fragment with absolute position, font, and text
/// (often a single character).
#[derive(Clone, Debug, PartialEq)]
pub struct TextElement {
    pub rect: Rect,
    pub text: String,
    pub font: String,
    pub size: f64,
}

impl TextElement {
    pub fn new(rect: Rect, text: impl Into<String>, font: impl Into<String>, size: f64) -> Self {
        Self {
            rect,
            text: text.into(),
            font: font.into(),
            size,
        }
    }

    pub fn is_whitespace(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}

/// Merge glyphs into word chunks. Glyphs are banded by baseline, ordered
/// left-to-right, and merged while they stay on the same font with a
/// horizontal gap of at most `X_TOLERANCE`. A supplied vertical ruling
/// passing between two glyphs acts as a split barrier, so ruled column
/// boundaries never end up inside one chunk.
pub fn merge_words(elements: &[TextElement], vertical_rulings: &[Ruling]) -> Vec<TextChunk> {
    let mut chunks: Vec<TextChunk> = Vec::new();

    let bands = cluster_objects(elements.to_vec(), |e| e.rect.top, Y_TOLERANCE);
    for mut band in bands {
        band.sort_by(|a, b| crate::geom::fcmp(a.rect.left, b.rect.left));

        let mut current: Option<TextChunk> = None;
        for element in band {
            let split = match &current {
                None => true,
                Some(chunk) => {
                    let prev = chunk.rect;
                    element.font != chunk.font()
                        || element.rect.left < prev.left
                        || element.rect.left - prev.right > X_TOLERANCE
                        || ruling_between(vertical_rulings, &prev, &element.rect)
                }
            };
            if split {
                if let Some(done) = current.take() {
                    chunks.push(done);
                }
                current = Some(TextChunk::from_element(element));
            } else if let Some(chunk) = current.as_mut() {
                chunk.push(element);
            }
        }
        if let Some(done) = current.take() {
            chunks.push(done);
        }
    }
    chunks
}

/// A vertical ruling splits two glyphs when its X position falls between
/// the end of the first and the start of the second while its span overlaps
/// the incoming glyph vertically.
fn ruling_between(rulings: &[Ruling], prev: &Rect, next: &Rect) -> bool {
    rulings.iter().any(|r| {
        r.vertical()
            && r.position() >= prev.right
            && r.position() <= next.left
            && r.top() < next.bottom
            && r.bottom() > next.top
    })
}
