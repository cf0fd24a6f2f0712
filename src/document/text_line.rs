//! Line assembly.
//!
//! Boxes arrive sorted top-to-bottom. Each one either joins the line that is
//! currently open or closes it and opens a new one; [`assemble_lines`] is
//! that state machine written as a fold.

use std::fmt;

use serde::Serialize;

use crate::document::text_box::TextBox;

/// Boxes judged to sit on the same visual line, kept in left-to-right order.
///
/// The vertical extent grows to cover every member, so a slightly skewed line
/// keeps accepting boxes whose centres drift downwards along it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextLine {
    boxes: Vec<TextBox>,
    top: i32,
    bottom: i32,
}

impl TextLine {
    /// Opens a line with a single box. The first box is always accepted.
    pub fn new(text_box: TextBox) -> Self {
        Self {
            top: text_box.top(),
            bottom: text_box.bottom(),
            boxes: vec![text_box],
        }
    }

    /// Whether `text_box` belongs to this line: its vertical centre must lie
    /// within the line's current `[top, bottom]` extent.
    #[must_use]
    pub fn accepts(&self, text_box: &TextBox) -> bool {
        (self.top..=self.bottom).contains(&text_box.center_y())
    }

    /// Adds a box at the position that keeps the line sorted by left edge.
    ///
    /// Boxes with equal left edges keep their arrival order.
    pub fn insert(&mut self, text_box: TextBox) {
        let left = text_box.left();
        let position = self.boxes.partition_point(|b| b.left() <= left);
        self.top = self.top.min(text_box.top());
        self.bottom = self.bottom.max(text_box.bottom());
        self.boxes.insert(position, text_box);
    }

    pub fn boxes(&self) -> &[TextBox] {
        &self.boxes
    }

    pub fn top(&self) -> i32 {
        self.top
    }

    pub fn bottom(&self) -> i32 {
        self.bottom
    }
}

/// Renders the member texts separated by single spaces.
impl fmt::Display for TextLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, text_box) in self.boxes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&text_box.text)?;
        }
        Ok(())
    }
}

/// Groups vertically sorted boxes into lines.
///
/// Only the most recently opened line is ever considered; once a box is
/// rejected by it, that line is closed for good. No boxes yields no lines.
pub fn assemble_lines<I>(boxes: I) -> Vec<TextLine>
where
    I: IntoIterator<Item = TextBox>,
{
    boxes
        .into_iter()
        .fold(Vec::new(), |mut lines: Vec<TextLine>, text_box| {
            match lines.last_mut() {
                Some(line) if line.accepts(&text_box) => line.insert(text_box),
                _ => lines.push(TextLine::new(text_box)),
            }
            lines
        })
}
