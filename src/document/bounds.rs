//! Bounding box representation with utility methods.
//!
//! This module provides the [`Bounds`] type for representing the quadrilateral
//! an OCR engine reports around a piece of recognised text.

use geo::Coord;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Represents a quadrilateral bounding box with four corner coordinates.
///
/// The corners are stored in the order the OCR engine reports them, which for
/// receipt scans is normally top-left, top-right, bottom-right, bottom-left.
/// None of the accessors rely on that order: every extent is computed as a
/// min/max over all four corners, so skewed or rotated boxes still yield an
/// axis-aligned envelope.
///
/// # Coordinate System
///
/// - **X-axis**: Increases from left to right
/// - **Y-axis**: Increases from top to bottom (standard image coordinates)
///
/// ```text
/// [0] top-left -------- [1] top-right
///       |                      |
///       |                      |
/// [3] bottom-left ---- [2] bottom-right
/// ```
///
/// # Serialization
///
/// `Bounds` serializes as an array of coordinate objects:
///
/// ```json
/// [{"x": 0, "y": 0}, {"x": 100, "y": 0}, {"x": 100, "y": 50}, {"x": 0, "y": 50}]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    coords: [Coord<i32>; 4],
}

impl Bounds {
    /// Creates a new `Bounds` from four corner coordinates.
    #[inline]
    pub fn new(coords: [Coord<i32>; 4]) -> Self {
        Self { coords }
    }

    /// Creates an axis-aligned `Bounds` from its four edges.
    ///
    /// No ordering check is made here; callers that need `top <= bottom` and
    /// `left <= right` go through [`TextBox::from_extents`](crate::document::TextBox::from_extents).
    #[inline]
    pub fn from_extents(top: i32, bottom: i32, left: i32, right: i32) -> Self {
        Self {
            coords: [
                Coord { x: left, y: top },
                Coord { x: right, y: top },
                Coord { x: right, y: bottom },
                Coord { x: left, y: bottom },
            ],
        }
    }

    /// Returns a reference to the underlying coordinate array.
    #[inline]
    pub fn coords(&self) -> &[Coord<i32>; 4] {
        &self.coords
    }

    /// Returns the minimum x coordinate (left edge).
    #[inline]
    pub fn left(&self) -> i32 {
        self.coords.iter().map(|c| c.x).min().unwrap_or(0)
    }

    /// Returns the maximum x coordinate (right edge).
    #[inline]
    pub fn right(&self) -> i32 {
        self.coords.iter().map(|c| c.x).max().unwrap_or(0)
    }

    /// Returns the minimum y coordinate (top edge).
    ///
    /// In image coordinates where y increases downward, this is the topmost
    /// point among all four corners.
    #[inline]
    pub fn top(&self) -> i32 {
        self.coords.iter().map(|c| c.y).min().unwrap_or(0)
    }

    /// Returns the maximum y coordinate (bottom edge).
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.coords.iter().map(|c| c.y).max().unwrap_or(0)
    }

    /// Returns the center y coordinate.
    ///
    /// # Note
    ///
    /// Integer division rounds toward zero, so odd heights put the centre
    /// half a pixel above the true midpoint. The sum is taken in `i64`; the
    /// midpoint of two `i32` values always fits back into `i32`.
    #[inline]
    pub fn center_y(&self) -> i32 {
        ((i64::from(self.top()) + i64::from(self.bottom())) / 2) as i32
    }
}

impl std::ops::Index<usize> for Bounds {
    type Output = Coord<i32>;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.coords[index]
    }
}

impl From<[Coord<i32>; 4]> for Bounds {
    #[inline]
    fn from(coords: [Coord<i32>; 4]) -> Self {
        Self::new(coords)
    }
}

#[derive(Serialize, Deserialize)]
struct CoordHelper {
    x: i32,
    y: i32,
}

impl Serialize for Bounds {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeSeq;

        let mut seq = serializer.serialize_seq(Some(4))?;
        for coord in &self.coords {
            seq.serialize_element(&CoordHelper {
                x: coord.x,
                y: coord.y,
            })?;
        }
        seq.end()
    }
}

/// Deserializes `Bounds` from an array of coordinate objects.
///
/// # Errors
///
/// Returns an error if the input does not contain exactly 4 coordinate objects.
impl<'de> Deserialize<'de> for Bounds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let helpers: Vec<CoordHelper> = Vec::deserialize(deserializer)?;
        let coords: [Coord<i32>; 4] = helpers
            .into_iter()
            .map(|h| Coord { x: h.x, y: h.y })
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|v: Vec<Coord<i32>>| {
                <D::Error as serde::de::Error>::custom(format!(
                    "Expected 4 coordinates, got {}",
                    v.len()
                ))
            })?;
        Ok(Self::new(coords))
    }
}
