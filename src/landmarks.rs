//! Face landmark types and the fixed eye/iris index tables.
//!
//! Landmarks arrive from the detector normalized to the frame (0..1) and are
//! scaled to integer pixel coordinates before any gaze math runs.

use crate::{
    constants::{LEFTMOST_CORNER, LEFT_EYE, LEFT_IRIS, RIGHTMOST_CORNER, RIGHT_EYE, RIGHT_IRIS},
    gaze::Point2D,
    utils::safe_cast::f32_to_i32,
    Error, Result,
};

/// A landmark normalized to frame width and height
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizedLandmark {
    pub x: f32,
    pub y: f32,
    /// Relative depth, unused by the gaze math
    pub z: f32,
}

impl NormalizedLandmark {
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Scale to pixel space, truncating toward zero
    ///
    /// # Errors
    ///
    /// Returns an error if the scaled value is not a finite `i32`.
    #[allow(clippy::cast_precision_loss)]
    pub fn to_pixel(&self, width: i32, height: i32) -> Result<Point2D> {
        Ok(Point2D::new(
            f32_to_i32(self.x * width as f32)?,
            f32_to_i32(self.y * height as f32)?,
        ))
    }
}

/// Which of the subject's eyes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EyeSide {
    Left,
    Right,
}

impl EyeSide {
    /// Both eyes in processing order
    pub const BOTH: [EyeSide; 2] = [EyeSide::Left, EyeSide::Right];

    /// Face mesh indices of this eye's iris ring
    #[must_use]
    pub fn iris_indices(self) -> &'static [usize; 4] {
        match self {
            Self::Left => &LEFT_IRIS,
            Self::Right => &RIGHT_IRIS,
        }
    }

    /// Face mesh indices of this eye's contour
    #[must_use]
    pub fn contour_indices(self) -> &'static [usize; 10] {
        match self {
            Self::Left => &LEFT_EYE,
            Self::Right => &RIGHT_EYE,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Pixel-space landmarks of one eye
#[derive(Debug, Clone, PartialEq)]
pub struct EyeLandmarks {
    pub side: EyeSide,
    pub iris: Vec<Point2D>,
    pub contour: Vec<Point2D>,
}

impl EyeLandmarks {
    /// Horizontal corners, image left-most first. Relative position 0 sits
    /// on the first corner for both eyes.
    #[must_use]
    pub fn corners(&self) -> (Point2D, Point2D) {
        (self.contour[LEFTMOST_CORNER], self.contour[RIGHTMOST_CORNER])
    }
}

/// Full landmark set for one detected face
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FaceLandmarks {
    pub points: Vec<NormalizedLandmark>,
}

impl FaceLandmarks {
    #[must_use]
    pub fn new(points: Vec<NormalizedLandmark>) -> Self {
        Self { points }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Gather the given indices in pixel space
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if an index is out of range.
    pub fn select_pixels(&self, indices: &[usize], width: i32, height: i32) -> Result<Vec<Point2D>> {
        indices
            .iter()
            .map(|&idx| {
                self.points
                    .get(idx)
                    .ok_or_else(|| {
                        Error::InvalidInput(format!(
                            "Landmark index {idx} out of range for {} landmarks",
                            self.points.len()
                        ))
                    })
                    .and_then(|lm| lm.to_pixel(width, height))
            })
            .collect()
    }

    /// Extract one eye's iris and contour landmarks in pixel space
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the landmark set is too short for the
    /// iris topology or a coordinate cannot be scaled.
    pub fn eye(&self, side: EyeSide, width: i32, height: i32) -> Result<EyeLandmarks> {
        Ok(EyeLandmarks {
            side,
            iris: self.select_pixels(side.iris_indices(), width, height)?,
            contour: self.select_pixels(side.contour_indices(), width, height)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NUM_FACE_MESH_LANDMARKS;

    #[test]
    fn test_to_pixel_truncates() {
        let lm = NormalizedLandmark::new(0.5049, 0.2501, 0.0);
        assert_eq!(lm.to_pixel(640, 480).unwrap(), Point2D::new(323, 120));
    }

    #[test]
    fn test_to_pixel_rejects_nan() {
        let lm = NormalizedLandmark::new(f32::NAN, 0.5, 0.0);
        assert!(lm.to_pixel(640, 480).is_err());
    }

    #[test]
    fn test_index_tables_within_topology() {
        for side in EyeSide::BOTH {
            assert!(side.iris_indices().iter().all(|&i| i < NUM_FACE_MESH_LANDMARKS));
            assert!(side.contour_indices().iter().all(|&i| i < NUM_FACE_MESH_LANDMARKS));
        }
    }

    #[test]
    fn test_eye_extraction() {
        let mut points = vec![NormalizedLandmark::default(); NUM_FACE_MESH_LANDMARKS];
        points[33] = NormalizedLandmark::new(0.25, 0.5, 0.0);
        points[133] = NormalizedLandmark::new(0.5, 0.5, 0.0);
        let face = FaceLandmarks::new(points);

        let eye = face.eye(EyeSide::Right, 400, 200).unwrap();
        assert_eq!(eye.iris.len(), 4);
        assert_eq!(eye.contour.len(), 10);
        assert_eq!(eye.corners(), (Point2D::new(100, 100), Point2D::new(200, 100)));
    }

    #[test]
    fn test_iris_and_contour_from_same_eye() {
        // Irises 468 and 473 are the ring centers; each must sit inside its own contour
        let mut points = vec![NormalizedLandmark::default(); NUM_FACE_MESH_LANDMARKS];
        for (idx, x) in [(33, 100), (133, 160), (468, 130), (362, 240), (263, 300), (473, 270)] {
            points[idx] = NormalizedLandmark::new((x as f32 + 0.5) / 400.0, 0.5, 0.0);
        }
        for idx in 469..=472 {
            points[idx] = points[468];
        }
        for idx in 474..=477 {
            points[idx] = points[473];
        }
        let face = FaceLandmarks::new(points);

        for side in EyeSide::BOTH {
            let eye = face.eye(side, 400, 200).unwrap();
            let (first, second) = eye.corners();
            assert!(first.x < eye.iris[0].x && eye.iris[0].x < second.x, "{} eye", side.name());
        }
        assert_eq!(face.eye(EyeSide::Left, 400, 200).unwrap().iris[0].x, 270);
        assert_eq!(face.eye(EyeSide::Right, 400, 200).unwrap().iris[0].x, 130);
    }

    #[test]
    fn test_short_landmark_set_rejected() {
        // 468-point meshes lack the iris refinement
        let face = FaceLandmarks::new(vec![NormalizedLandmark::default(); 468]);
        assert!(matches!(face.eye(EyeSide::Right, 640, 480), Err(Error::InvalidInput(_))));
    }
}
