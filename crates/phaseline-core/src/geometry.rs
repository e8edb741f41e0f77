//! Layout coordinates supplied alongside process elements.
//!
//! Coordinates come from the source document's diagram section and are only
//! read, never recomputed. They serve as a left-to-right hint when ordering.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A 2D layout coordinate.
///
/// # Examples
///
/// ```
/// # use phaseline_core::geometry::Point;
/// let left = Point::new(40.0, 200.0);
/// let right = Point::new(180.0, 120.0);
///
/// assert!(left.cmp_x(right).is_lt());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Total ordering on the x-coordinate.
    ///
    /// Uses [`f32::total_cmp`], so NaN coordinates sort after every finite value
    /// instead of poisoning the comparison.
    pub fn cmp_x(self, other: Point) -> Ordering {
        self.x.total_cmp(&other.x)
    }
}
