//! Face mesh landmark detection with refined iris points.
//!
//! Each detected face box is expanded, squared and cropped, then the face
//! landmark model (478 points, 192×192 input) runs on the crop. Landmarks are
//! mapped back to coordinates normalized by the full frame size, which is the
//! contract the gaze math consumes.

use crate::{
    constants::{FACE_MESH_INPUT_SIZE, NUM_FACE_MESH_LANDMARKS},
    face_detection::FaceDetector,
    landmarks::{FaceLandmarks, NormalizedLandmark},
    utils::{
        image_conversion::{bgr_mat_to_tensor, square_size, TensorLayout},
        refine_box,
    },
    Error, Result,
};
use ndarray::CowArray;
use opencv::core::{Mat, Rect, Size};
use opencv::prelude::*;
use ort::{Environment, Session, Value};
use std::path::Path;
use std::sync::Arc;

/// Source of per-face landmarks for a frame
pub trait LandmarkDetector {
    /// Detect landmarks of every face in a BGR frame. An empty result means
    /// no face was found.
    ///
    /// # Errors
    ///
    /// Returns an error if inference fails.
    fn detect(&mut self, frame: &Mat) -> Result<Vec<FaceLandmarks>>;
}

/// Face landmark model on ONNX Runtime
pub struct FaceMeshDetector {
    session: Session,
    input_size: Size,
}

impl FaceMeshDetector {
    /// Load the face landmark model
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be loaded.
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        log::info!("Loading face mesh model: {}", model_path.as_ref().display());
        let environment = Arc::new(
            Environment::builder()
                .with_name("face_mesh")
                .with_log_level(ort::LoggingLevel::Warning)
                .build()?,
        );

        let session = ort::SessionBuilder::new(&environment)?
            .with_optimization_level(ort::GraphOptimizationLevel::Level3)?
            .with_model_from_file(model_path)?;

        let input = session
            .inputs
            .first()
            .ok_or_else(|| Error::ModelInputError("Face mesh model has no inputs".to_string()))?;

        // [batch, height, width, channels]
        let side = input
            .dimensions
            .get(1)
            .copied()
            .flatten()
            .map_or(FACE_MESH_INPUT_SIZE, |d| d as usize);
        let input_size = square_size(side)?;

        Ok(Self { session, input_size })
    }

    /// Run the model on the `crop` region of `frame`
    ///
    /// # Errors
    ///
    /// Returns an error if inference fails or the output is too short.
    pub fn detect_in(&self, frame: &Mat, crop: Rect) -> Result<FaceLandmarks> {
        let face = Mat::roi(frame, crop)?.try_clone()?;
        let input = bgr_mat_to_tensor(
            &face,
            self.input_size,
            1.0 / 255.0,
            0.0,
            TensorLayout::Nhwc,
        )?;

        let cow = CowArray::from(input.into_dyn());
        let tensor = Value::from_array(self.session.allocator(), &cow)?;
        let outputs = self.session.run(vec![tensor])?;

        let raw: Vec<f32> = outputs
            .first()
            .ok_or_else(|| Error::ModelOutputError("Face mesh produced no output".to_string()))?
            .try_extract::<f32>()?
            .view()
            .iter()
            .copied()
            .collect();

        mesh_to_normalized(&raw, self.input_size.width, crop, frame.cols(), frame.rows())
    }
}

/// Map raw `[x, y, z] * N` mesh output, in model input pixels, to landmarks
/// normalized by the full frame.
///
/// # Errors
///
/// Returns `Error::ModelOutputError` if fewer than 478 points are present.
#[allow(clippy::cast_precision_loss)]
pub fn mesh_to_normalized(raw: &[f32], input_size: i32, crop: Rect, frame_width: i32, frame_height: i32) -> Result<FaceLandmarks> {
    let needed = NUM_FACE_MESH_LANDMARKS * 3;
    if raw.len() < needed {
        return Err(Error::ModelOutputError(format!(
            "Expected {needed} mesh values, got {}",
            raw.len()
        )));
    }

    let scale_x = crop.width as f32 / input_size as f32;
    let scale_y = crop.height as f32 / input_size as f32;
    let (fw, fh) = (frame_width as f32, frame_height as f32);

    let points = raw[..needed]
        .chunks_exact(3)
        .map(|p| {
            NormalizedLandmark::new(
                (crop.x as f32 + p[0] * scale_x) / fw,
                (crop.y as f32 + p[1] * scale_y) / fh,
                p[2] / input_size as f32,
            )
        })
        .collect();

    Ok(FaceLandmarks::new(points))
}

/// Face detector followed by the face mesh model
pub struct OnnxLandmarkDetector {
    face_detector: FaceDetector,
    face_mesh: FaceMeshDetector,
    bbox_expansion: f32,
}

impl OnnxLandmarkDetector {
    #[must_use]
    pub fn new(face_detector: FaceDetector, face_mesh: FaceMeshDetector, bbox_expansion: f32) -> Self {
        Self {
            face_detector,
            face_mesh,
            bbox_expansion,
        }
    }
}

impl LandmarkDetector for OnnxLandmarkDetector {
    fn detect(&mut self, frame: &Mat) -> Result<Vec<FaceLandmarks>> {
        let faces = self.face_detector.detect(frame)?;

        let mut landmarks = Vec::with_capacity(faces.len());
        for face in faces {
            let crop = refine_box(face.bbox, frame.cols(), frame.rows(), self.bbox_expansion);
            if crop.width <= 0 || crop.height <= 0 {
                continue;
            }
            landmarks.push(self.face_mesh.detect_in(frame, crop)?);
        }

        Ok(landmarks)
    }
}
