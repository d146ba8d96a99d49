//! Per-frame gaze analysis and frame annotation.
//!
//! The same pure computation runs twice per face, once per eye. A degenerate
//! eye (both corners at the same x) yields no label for that eye on that
//! frame instead of an error.

use crate::{
    constants::{IRIS_RING_RADIUS, IRIS_RING_THICKNESS},
    filters::GazeSmoother,
    gaze::{classify_gaze, compute_iris_center, GazeResult, Point2D},
    landmarks::{EyeLandmarks, EyeSide, FaceLandmarks},
    Error, Result,
};
use log::{debug, warn};
use opencv::{
    core::{Mat, Point, Scalar},
    imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8},
    prelude::*,
};

/// Gaze analysis of one eye
#[derive(Debug, Clone, PartialEq)]
pub struct EyeGaze {
    pub side: EyeSide,
    pub iris_center: Point2D,
    /// Eye contour in pixel space
    pub contour: Vec<Point2D>,
    /// `None` when the eye geometry was degenerate on this frame
    pub gaze: Option<GazeResult>,
}

/// Gaze analysis of both eyes of one face
#[derive(Debug, Clone, PartialEq)]
pub struct FaceGaze {
    pub left: EyeGaze,
    pub right: EyeGaze,
}

impl FaceGaze {
    /// Iterate over both eyes
    pub fn eyes(&self) -> impl Iterator<Item = &EyeGaze> {
        [&self.left, &self.right].into_iter()
    }
}

/// Drawing options for the overlay
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    pub ring_radius: i32,
    pub ring_thickness: i32,
    /// Draw the direction label and angle next to each eye
    pub show_labels: bool,
    /// Draw the eye contour points
    pub show_contour: bool,
    /// Draw every face mesh landmark as a dot
    pub show_mesh: bool,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            ring_radius: IRIS_RING_RADIUS,
            ring_thickness: IRIS_RING_THICKNESS,
            show_labels: true,
            show_contour: false,
            show_mesh: false,
        }
    }
}

/// Analyze one eye's pixel-space landmarks
///
/// # Errors
///
/// Returns `Error::InvalidInput` if the iris set is empty.
pub fn analyze_eye(eye: &EyeLandmarks) -> Result<EyeGaze> {
    let iris_center = compute_iris_center(&eye.iris)?;

    let gaze = match classify_gaze(iris_center, eye.corners()) {
        Ok(gaze) => Some(gaze),
        Err(Error::DegenerateGeometry(reason)) => {
            debug!("Skipping {} eye gaze: {}", eye.side.name(), reason);
            None
        }
        Err(e) => return Err(e),
    };

    Ok(EyeGaze {
        side: eye.side,
        iris_center,
        contour: eye.contour.clone(),
        gaze,
    })
}

/// Analyze both eyes of a face given the frame size in pixels
///
/// # Errors
///
/// Returns an error if the landmark set does not cover the iris topology.
pub fn analyze_face(face: &FaceLandmarks, width: i32, height: i32) -> Result<FaceGaze> {
    Ok(FaceGaze {
        left: analyze_eye(&face.eye(EyeSide::Left, width, height)?)?,
        right: analyze_eye(&face.eye(EyeSide::Right, width, height)?)?,
    })
}

/// Analyze every face, optionally smooth the estimates, and draw the overlay.
/// A face whose landmarks cannot be analyzed is logged and skipped.
///
/// # Errors
///
/// Returns an error if drawing fails.
pub fn per_frame_overlay(
    frame: &mut Mat,
    faces: &[FaceLandmarks],
    style: &OverlayStyle,
    mut smoother: Option<&mut GazeSmoother>,
) -> Result<Vec<FaceGaze>> {
    let (width, height) = (frame.cols(), frame.rows());
    let mut results = Vec::with_capacity(faces.len());

    for (index, face) in faces.iter().enumerate() {
        let mut face_gaze = match analyze_face(face, width, height) {
            Ok(face_gaze) => face_gaze,
            Err(e) => {
                warn!("Skipping face {}: {}", index, e);
                continue;
            }
        };
        if style.show_mesh {
            draw_mesh(frame, face)?;
        }
        if let Some(smoother) = smoother.as_deref_mut() {
            smoother.smooth(&mut face_gaze);
        }
        draw_face_gaze(frame, &face_gaze, style)?;
        results.push(face_gaze);
    }

    Ok(results)
}

fn to_cv(point: Point2D) -> Point {
    Point::new(point.x, point.y)
}

/// Draw each landmark of the face mesh as a one-pixel dot. Points that fall
/// outside the frame are skipped.
///
/// # Errors
///
/// Returns an error if an OpenCV drawing call fails.
pub fn draw_mesh(frame: &mut Mat, face: &FaceLandmarks) -> Result<()> {
    let (width, height) = (frame.cols(), frame.rows());
    let mesh_color = Scalar::new(192.0, 192.0, 192.0, 0.0);

    for landmark in &face.points {
        let Ok(point) = landmark.to_pixel(width, height) else {
            continue;
        };
        if (0..width).contains(&point.x) && (0..height).contains(&point.y) {
            imgproc::circle(frame, to_cv(point), 1, mesh_color, -1, LINE_8, 0)?;
        }
    }

    Ok(())
}

/// Draw iris rings and, depending on `style`, labels and eye contours
///
/// # Errors
///
/// Returns an error if an OpenCV drawing call fails.
pub fn draw_face_gaze(frame: &mut Mat, face: &FaceGaze, style: &OverlayStyle) -> Result<()> {
    let ring_color = Scalar::new(0.0, 255.0, 0.0, 0.0);
    let contour_color = Scalar::new(255.0, 255.0, 0.0, 0.0);
    let label_color = Scalar::new(0.0, 255.0, 255.0, 0.0);

    for eye in face.eyes() {
        if style.show_contour {
            for point in &eye.contour {
                imgproc::circle(frame, to_cv(*point), 1, contour_color, -1, LINE_8, 0)?;
            }
        }

        imgproc::circle(
            frame,
            to_cv(eye.iris_center),
            style.ring_radius,
            ring_color,
            style.ring_thickness,
            LINE_8,
            0,
        )?;

        if style.show_labels {
            if let Some(gaze) = &eye.gaze {
                let text = format!("{} {:+.1} deg", gaze.direction, gaze.angle_degrees);
                let origin = Point::new(
                    eye.iris_center.x - 4 * style.ring_radius,
                    eye.iris_center.y - 2 * style.ring_radius,
                );
                imgproc::put_text(frame, &text, origin, FONT_HERSHEY_SIMPLEX, 0.4, label_color, 1, LINE_8, false)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gaze::GazeDirection;

    fn eye_with(side: EyeSide, iris: [(i32, i32); 4], outer: (i32, i32), inner: (i32, i32)) -> EyeLandmarks {
        let mut contour = vec![Point2D::from(outer), Point2D::from(inner)];
        contour.extend(std::iter::repeat(Point2D::new(0, 0)).take(8));
        EyeLandmarks {
            side,
            iris: iris.iter().copied().map(Point2D::from).collect(),
            contour,
        }
    }

    #[test]
    fn test_analyze_eye() {
        let eye = eye_with(EyeSide::Left, [(128, 53), (132, 57), (130, 55), (130, 55)], (100, 50), (200, 50));
        let result = analyze_eye(&eye).unwrap();
        assert_eq!(result.iris_center, Point2D::new(130, 55));
        assert_eq!(result.gaze.unwrap().direction, GazeDirection::LookingLeft);
    }

    #[test]
    fn test_degenerate_eye_has_no_label() {
        let eye = eye_with(EyeSide::Right, [(150, 50); 4], (150, 40), (150, 60));
        let result = analyze_eye(&eye).unwrap();
        assert_eq!(result.iris_center, Point2D::new(150, 50));
        assert!(result.gaze.is_none());
    }

    #[test]
    fn test_default_style_matches_ring() {
        let style = OverlayStyle::default();
        assert_eq!(style.ring_radius, 10);
        assert_eq!(style.ring_thickness, 2);
    }
}
