//! OCR text box types and ingestion.
//!
//! A [`TextBox`] is one recognised piece of text together with the
//! quadrilateral it was read from. Boxes are immutable once read; line
//! assembly only ever reorders them.

use std::path::Path;

pub use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::document::bounds::Bounds;
use crate::document::error::DocumentError;

/// Number of comma-separated coordinate fields that precede the text in a
/// SROIE-style OCR line.
const COORDINATE_FIELDS: usize = 8;

/// A recognised text region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBox {
    /// Quadrilateral bounding coordinates of the text region.
    pub bounds: Bounds,
    /// Recognised text content.
    pub text: String,
}

impl TextBox {
    /// Creates a box from explicit corner geometry, rejecting flipped corners.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::GeometryInconsistency`] if the corners are not
    /// in top-left, top-right, bottom-right, bottom-left order.
    pub fn new(bounds: Bounds, text: impl Into<String>) -> Result<Self, DocumentError> {
        let text_box = Self {
            bounds,
            text: text.into(),
        };
        text_box.validate()?;
        Ok(text_box)
    }

    /// Creates an axis-aligned box from its edges.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::GeometryInconsistency`] if `top > bottom` or
    /// `left > right`.
    pub fn from_extents(
        text: impl Into<String>,
        top: i32,
        bottom: i32,
        left: i32,
        right: i32,
    ) -> Result<Self, DocumentError> {
        if top > bottom || left > right {
            return Err(DocumentError::GeometryInconsistency {
                top,
                bottom,
                left,
                right,
            });
        }
        Ok(Self {
            bounds: Bounds::from_extents(top, bottom, left, right),
            text: text.into(),
        })
    }

    /// Checks that the corners describe an upright quadrilateral.
    ///
    /// The top corners must not lie below their bottom counterparts and the
    /// left corners must not lie right of their right counterparts. Skewed
    /// boxes pass; mirrored or upside-down corner orders do not.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::GeometryInconsistency`] with the envelope of
    /// the offending box.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let [tl, tr, br, bl] = *self.bounds.coords();
        let upright = tl.y <= bl.y && tr.y <= br.y && tl.x <= tr.x && bl.x <= br.x;
        if upright {
            Ok(())
        } else {
            Err(DocumentError::GeometryInconsistency {
                top: tl.y.max(tr.y),
                bottom: bl.y.min(br.y),
                left: tl.x.max(bl.x),
                right: tr.x.min(br.x),
            })
        }
    }

    /// Parses one SROIE-style OCR line: `x1,y1,x2,y2,x3,y3,x4,y4,text`.
    ///
    /// The text is everything after the eighth comma, so it may itself
    /// contain commas. Surrounding whitespace is trimmed from the text.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::MalformedBoxLine`] if fewer than eight
    /// coordinates are present or one of them is not an integer, and
    /// [`DocumentError::GeometryInconsistency`] for flipped corners.
    pub fn parse_line(line: &str, line_number: usize) -> Result<Self, DocumentError> {
        let mut fields = line.splitn(COORDINATE_FIELDS + 1, ',');
        let mut values = [0i32; COORDINATE_FIELDS];
        for (i, value) in values.iter_mut().enumerate() {
            let raw = fields.next().ok_or_else(|| DocumentError::MalformedBoxLine {
                line_number,
                message: format!("expected {COORDINATE_FIELDS} coordinates, found {i}"),
            })?;
            *value = raw
                .trim()
                .parse()
                .map_err(|e| DocumentError::MalformedBoxLine {
                    line_number,
                    message: format!("coordinate {raw:?}: {e}"),
                })?;
        }
        let text = fields.next().unwrap_or_default().trim();

        let bounds = Bounds::new([
            Coord {
                x: values[0],
                y: values[1],
            },
            Coord {
                x: values[2],
                y: values[3],
            },
            Coord {
                x: values[4],
                y: values[5],
            },
            Coord {
                x: values[6],
                y: values[7],
            },
        ]);

        Self::new(bounds, text)
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.bounds.top()
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.bounds.bottom()
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.bounds.left()
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.bounds.right()
    }

    #[inline]
    pub fn center_y(&self) -> i32 {
        self.bounds.center_y()
    }
}

/// Parses every non-blank line of an OCR text dump into boxes.
///
/// Line numbers in errors are 1-based.
pub fn parse_boxes(content: &str) -> Result<Vec<TextBox>, DocumentError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| TextBox::parse_line(line.trim_start_matches('\u{feff}'), i + 1))
        .collect()
}

/// Reads and parses an OCR text dump from disk.
pub fn read_boxes<P: AsRef<Path>>(path: P) -> Result<Vec<TextBox>, DocumentError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_boxes(&content)
}
