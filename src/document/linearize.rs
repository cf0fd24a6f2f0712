//! Document linearization.
//!
//! Turns an unordered set of OCR boxes into one reading-order string: boxes
//! are sorted top-to-bottom, grouped into lines, and the rendered lines are
//! joined with `\n`.

use tracing::{debug, instrument};

use crate::document::text_box::TextBox;
use crate::document::text_line::{assemble_lines, TextLine};

/// Separator placed between rendered lines.
pub const LINE_SEPARATOR: char = '\n';

/// A document reconstructed from its boxes.
#[derive(Debug, Clone, Default)]
pub struct LinearDocument {
    lines: Vec<TextLine>,
    text: String,
}

impl LinearDocument {
    /// Sorts, assembles and renders `boxes`.
    ///
    /// The sort is stable on the top edge, so boxes sharing a top keep their
    /// input order. An empty input gives an empty document.
    #[instrument(skip_all, fields(boxes = boxes.len()))]
    pub fn from_boxes(mut boxes: Vec<TextBox>) -> Self {
        boxes.sort_by_key(TextBox::top);
        let lines = assemble_lines(boxes);
        let text = lines
            .iter()
            .map(TextLine::to_string)
            .collect::<Vec<_>>()
            .join(&LINE_SEPARATOR.to_string());

        debug!(lines = lines.len(), chars = text.chars().count(), "linearized");

        Self { lines, text }
    }

    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Linearizes `boxes` into the flat document string.
pub fn linearize(boxes: Vec<TextBox>) -> String {
    LinearDocument::from_boxes(boxes).into_text()
}

/// Replaces every tab and line break with a single space.
///
/// The replacement is one-for-one on characters (and on bytes, since all
/// three are ASCII), so offsets into the result are offsets into the input.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.chars()
        .map(|c| if matches!(c, '\t' | '\n') { ' ' } else { c })
        .collect()
}
