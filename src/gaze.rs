//! Horizontal gaze estimation from iris and eye-corner landmarks.
//!
//! The iris center is located between the two horizontal eye corners and
//! normalized by the eye width, giving a relative position where 0.0 is the
//! outer corner and 1.0 the inner corner. That position is classified with
//! fixed thresholds and mapped linearly onto a gaze angle.
//!
//! The angle mapping assumes the full eye span covers ±30° of rotation. It is
//! an uncalibrated heuristic and does not account for eye geometry or the
//! camera field of view.

use crate::constants::{LEFT_THRESHOLD, MAX_GAZE_ANGLE_DEG, RIGHT_THRESHOLD};
use crate::{Error, Result};
use std::fmt;

/// A point in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point2D {
    pub x: i32,
    pub y: i32,
}

impl Point2D {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point2D {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Horizontal gaze direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GazeDirection {
    LookingLeft,
    LookingCenter,
    LookingRight,
}

impl GazeDirection {
    /// Human readable label used in overlays and logs
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::LookingLeft => "Looking Left",
            Self::LookingCenter => "Looking Center",
            Self::LookingRight => "Looking Right",
        }
    }
}

impl fmt::Display for GazeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Gaze estimate for a single eye
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazeResult {
    /// Classified direction
    pub direction: GazeDirection,
    /// Signed angle in degrees, nominally within [-30, 30]
    pub angle_degrees: f64,
    /// Normalized iris position the estimate was derived from
    pub relative_position: f64,
}

/// Compute the iris center as the floor of the component-wise mean.
///
/// # Errors
///
/// Returns `Error::InvalidInput` if `landmarks` is empty.
#[allow(clippy::cast_possible_truncation)] // Mean of i32 values fits in i32
pub fn compute_iris_center(landmarks: &[Point2D]) -> Result<Point2D> {
    if landmarks.is_empty() {
        return Err(Error::InvalidInput(
            "Cannot compute iris center of an empty landmark set".to_string(),
        ));
    }

    let n = landmarks.len() as i64;
    let (sum_x, sum_y) = landmarks
        .iter()
        .fold((0i64, 0i64), |(sx, sy), p| (sx + i64::from(p.x), sy + i64::from(p.y)));

    Ok(Point2D::new(sum_x.div_euclid(n) as i32, sum_y.div_euclid(n) as i32))
}

/// Normalized horizontal iris position between the outer and inner corner.
///
/// # Errors
///
/// Returns `Error::DegenerateGeometry` when both corners share an x coordinate.
pub fn relative_position(iris_center: Point2D, eye_corners: (Point2D, Point2D)) -> Result<f64> {
    let (outer, inner) = eye_corners;
    let eye_width = i64::from(inner.x) - i64::from(outer.x);
    if eye_width == 0 {
        return Err(Error::DegenerateGeometry(format!(
            "eye corners coincide at x = {}",
            outer.x
        )));
    }

    #[allow(clippy::cast_precision_loss)]
    let offset = (i64::from(iris_center.x) - i64::from(outer.x)) as f64;
    #[allow(clippy::cast_precision_loss)]
    let width = eye_width as f64;

    Ok(offset / width)
}

/// Linear, uncalibrated mapping of a relative position onto a gaze angle
#[must_use]
pub fn gaze_angle(relative_position: f64) -> f64 {
    (relative_position - 0.5) * (2.0 * MAX_GAZE_ANGLE_DEG)
}

/// Classify an already computed relative position.
///
/// Thresholds are strict: exactly 0.4 and exactly 0.6 are both center.
#[must_use]
pub fn classify_relative_position(relative_position: f64) -> GazeResult {
    let direction = if relative_position < LEFT_THRESHOLD {
        GazeDirection::LookingLeft
    } else if relative_position > RIGHT_THRESHOLD {
        GazeDirection::LookingRight
    } else {
        GazeDirection::LookingCenter
    };

    GazeResult {
        direction,
        angle_degrees: gaze_angle(relative_position),
        relative_position,
    }
}

/// Classify gaze direction and estimate the gaze angle for one eye.
///
/// `eye_corners` is `(outer, inner)`.
///
/// # Errors
///
/// Returns `Error::DegenerateGeometry` when the eye has zero width.
pub fn classify_gaze(iris_center: Point2D, eye_corners: (Point2D, Point2D)) -> Result<GazeResult> {
    relative_position(iris_center, eye_corners).map(classify_relative_position)
}
