//! Word-like units: horizontal runs of merged glyphs.

use crate::geom::{Point, Rect};

use super::element::TextElement;

/// A contiguous horizontal merge of adjacent glyphs on one baseline.
#[derive(Clone, Debug, PartialEq)]
pub struct TextChunk {
    pub rect: Rect,
    text: String,
    elements: Vec<TextElement>,
}

impl TextChunk {
    pub fn from_element(element: TextElement) -> Self {
        Self {
            rect: element.rect,
            text: element.text.clone(),
            elements: vec![element],
        }
    }

    pub(crate) fn push(&mut self, element: TextElement) {
        self.rect.merge(&element.rect);
        self.text.push_str(&element.text);
        self.elements.push(element);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn elements(&self) -> &[TextElement] {
        &self.elements
    }

    pub fn font(&self) -> &str {
        self.elements.first().map(|e| e.font.as_str()).unwrap_or("")
    }

    /// Chunks made only of whitespace glyphs are ignored by every consumer.
    pub fn is_whitespace(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }

    pub fn center(&self) -> Point {
        self.rect.center()
    }
}
