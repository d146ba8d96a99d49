//! SCRFD face detector running on ONNX Runtime.
//!
//! The frame is letterboxed into the model input, per-stride scores and
//! box distances are decoded against anchor centers, and overlapping boxes
//! are merged with non-maximum suppression.

use crate::{
    constants::{IMAGE_NORMALIZATION_OFFSET, IMAGE_NORMALIZATION_SCALE},
    utils::image_conversion::{bgr_mat_to_tensor, TensorLayout},
    Error, Result,
};
use ndarray::CowArray;
use opencv::core::{Mat, Rect, Scalar, Size, CV_8UC3};
use opencv::imgproc::{self, InterpolationFlags};
use opencv::prelude::*;
use ort::{Environment, Session, Value};
use std::path::Path;
use std::sync::Arc;

/// Default SCRFD input side
const DEFAULT_INPUT_SIZE: i32 = 640;

/// Face detection result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceDetection {
    /// Bounding box in frame pixels
    pub bbox: Rect,
    /// Confidence score
    pub score: f32,
}

/// Output layout of a SCRFD model variant
#[derive(Debug, Clone, PartialEq)]
struct HeadLayout {
    strides: Vec<i32>,
    anchors_per_cell: usize,
}

impl HeadLayout {
    fn from_output_count(count: usize) -> Self {
        match count {
            10 | 15 => Self {
                strides: vec![8, 16, 32, 64, 128],
                anchors_per_cell: 1,
            },
            6 | 9 => Self {
                strides: vec![8, 16, 32],
                anchors_per_cell: 2,
            },
            other => {
                log::warn!("Unknown SCRFD layout with {} outputs, assuming 3 strides", other);
                Self {
                    strides: vec![8, 16, 32],
                    anchors_per_cell: 2,
                }
            }
        }
    }
}

/// SCRFD face detector
pub struct FaceDetector {
    session: Session,
    input_size: (i32, i32),
    layout: HeadLayout,
    conf_threshold: f32,
    nms_threshold: f32,
    max_faces: usize,
}

impl FaceDetector {
    /// Load a SCRFD model
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be loaded or has no inputs.
    pub fn new<P: AsRef<Path>>(model_path: P, conf_threshold: f32, nms_threshold: f32, max_faces: usize) -> Result<Self> {
        log::info!("Loading face detector: {}", model_path.as_ref().display());
        let environment = Arc::new(
            Environment::builder()
                .with_name("face_detector")
                .with_log_level(ort::LoggingLevel::Warning)
                .build()?,
        );

        let session = ort::SessionBuilder::new(&environment)?
            .with_optimization_level(ort::GraphOptimizationLevel::Level3)?
            .with_model_from_file(model_path)?;

        let input = session
            .inputs
            .first()
            .ok_or_else(|| Error::ModelInputError("Face detector has no inputs".to_string()))?;

        // [batch, channels, height, width], dynamic axes fall back to the default
        #[allow(clippy::cast_possible_truncation)]
        let dim = |i: usize| {
            input
                .dimensions
                .get(i)
                .copied()
                .flatten()
                .map_or(DEFAULT_INPUT_SIZE, |d| d as i32)
        };
        let input_size = (dim(3), dim(2));
        let layout = HeadLayout::from_output_count(session.outputs.len());

        Ok(Self {
            session,
            input_size,
            layout,
            conf_threshold,
            nms_threshold,
            max_faces,
        })
    }

    /// Detect faces, highest score first
    ///
    /// # Errors
    ///
    /// Returns an error if preprocessing or inference fails.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn detect(&self, image: &Mat) -> Result<Vec<FaceDetection>> {
        let (input_width, input_height) = self.input_size;
        let (img_width, img_height) = (image.cols(), image.rows());
        if img_width <= 0 || img_height <= 0 {
            return Ok(Vec::new());
        }

        // Letterbox: keep the aspect ratio, pad bottom/right
        let ratio_img = img_height as f32 / img_width as f32;
        let ratio_model = input_height as f32 / input_width as f32;
        let (new_width, new_height) = if ratio_img > ratio_model {
            ((input_height as f32 / ratio_img) as i32, input_height)
        } else {
            (input_width, (input_width as f32 * ratio_img) as i32)
        };
        let det_scale = new_height as f32 / img_height as f32;

        let mut resized = Mat::default();
        imgproc::resize(
            image,
            &mut resized,
            Size::new(new_width, new_height),
            0.0,
            0.0,
            InterpolationFlags::INTER_LINEAR as i32,
        )?;
        let mut padded = Mat::new_rows_cols_with_default(input_height, input_width, CV_8UC3, Scalar::all(0.0))?;
        let mut roi = padded.roi_mut(Rect::new(0, 0, new_width, new_height))?;
        resized.copy_to(&mut roi)?;

        let input = bgr_mat_to_tensor(
            &padded,
            Size::new(input_width, input_height),
            f64::from(1.0 / IMAGE_NORMALIZATION_SCALE),
            f64::from(-IMAGE_NORMALIZATION_OFFSET / IMAGE_NORMALIZATION_SCALE),
            TensorLayout::Nchw,
        )?;

        let cow = CowArray::from(input.into_dyn());
        let tensor = Value::from_array(self.session.allocator(), &cow)?;
        let outputs = self.session.run(vec![tensor])?;

        let stride_count = self.layout.strides.len();
        if outputs.len() < stride_count * 2 {
            return Err(Error::ModelOutputError(format!(
                "Expected at least {} outputs, got {}",
                stride_count * 2,
                outputs.len()
            )));
        }

        let mut candidates = Vec::new();
        for (idx, &stride) in self.layout.strides.iter().enumerate() {
            let scores: Vec<f32> = outputs[idx].try_extract::<f32>()?.view().iter().copied().collect();
            let distances: Vec<f32> = outputs[idx + stride_count]
                .try_extract::<f32>()?
                .view()
                .iter()
                .copied()
                .collect();

            let centers = anchor_centers(input_height / stride, input_width / stride, stride, self.layout.anchors_per_cell);
            for (anchor, &score) in scores.iter().enumerate() {
                if score < self.conf_threshold {
                    continue;
                }
                let (Some(&(cx, cy)), Some(d)) = (centers.get(anchor), distances.get(anchor * 4..anchor * 4 + 4)) else {
                    continue;
                };
                let s = stride as f32;
                let bbox = [
                    (cx - d[0] * s) / det_scale,
                    (cy - d[1] * s) / det_scale,
                    (cx + d[2] * s) / det_scale,
                    (cy + d[3] * s) / det_scale,
                ];
                candidates.push((bbox, score));
            }
        }

        let kept = non_max_suppression(candidates, self.nms_threshold);
        Ok(kept
            .into_iter()
            .take(self.max_faces)
            .map(|([x1, y1, x2, y2], score)| FaceDetection {
                bbox: clip_box(x1, y1, x2, y2, img_width, img_height),
                score,
            })
            .filter(|det| det.bbox.width > 0 && det.bbox.height > 0)
            .collect())
    }
}

/// Anchor centers in row-major order, repeated per anchor
#[allow(clippy::cast_precision_loss)]
fn anchor_centers(height: i32, width: i32, stride: i32, anchors_per_cell: usize) -> Vec<(f32, f32)> {
    let mut centers = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let center = ((x * stride) as f32, (y * stride) as f32);
            centers.extend(std::iter::repeat(center).take(anchors_per_cell));
        }
    }
    centers
}

fn iou(a: &[f32; 4], b: &[f32; 4]) -> f32 {
    let inter_w = (a[2].min(b[2]) - a[0].max(b[0]) + 1.0).max(0.0);
    let inter_h = (a[3].min(b[3]) - a[1].max(b[1]) + 1.0).max(0.0);
    let inter = inter_w * inter_h;
    let area = |r: &[f32; 4]| (r[2] - r[0] + 1.0) * (r[3] - r[1] + 1.0);
    inter / (area(a) + area(b) - inter)
}

/// Greedy NMS over `(box, score)` pairs, highest score first
fn non_max_suppression(mut candidates: Vec<([f32; 4], f32)>, threshold: f32) -> Vec<([f32; 4], f32)> {
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut kept: Vec<([f32; 4], f32)> = Vec::new();
    for candidate in candidates {
        if kept.iter().all(|k| iou(&k.0, &candidate.0) <= threshold) {
            kept.push(candidate);
        }
    }
    kept
}

#[allow(clippy::cast_possible_truncation)]
fn clip_box(x1: f32, y1: f32, x2: f32, y2: f32, width: i32, height: i32) -> Rect {
    let left = (x1.max(0.0) as i32).min(width);
    let top = (y1.max(0.0) as i32).min(height);
    let right = (x2.max(0.0) as i32).min(width);
    let bottom = (y2.max(0.0) as i32).min(height);
    Rect::new(left, top, (right - left).max(0), (bottom - top).max(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_layout() {
        assert_eq!(HeadLayout::from_output_count(9).strides, vec![8, 16, 32]);
        assert_eq!(HeadLayout::from_output_count(15).anchors_per_cell, 1);
    }

    #[test]
    fn test_anchor_centers() {
        let centers = anchor_centers(2, 2, 8, 2);
        assert_eq!(centers.len(), 8);
        assert_eq!(centers[0], (0.0, 0.0));
        assert_eq!(centers[1], (0.0, 0.0));
        assert_eq!(centers[2], (8.0, 0.0));
        assert_eq!(centers[4], (0.0, 8.0));
    }

    #[test]
    fn test_nms_suppresses_overlap() {
        let kept = non_max_suppression(
            vec![
                ([10.0, 10.0, 50.0, 50.0], 0.8),
                ([12.0, 12.0, 52.0, 52.0], 0.9),
                ([100.0, 100.0, 140.0, 140.0], 0.7),
            ],
            0.4,
        );
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].1, 0.9);
        assert_eq!(kept[1].1, 0.7);
    }

    #[test]
    fn test_clip_box() {
        assert_eq!(clip_box(-5.0, -5.0, 30.0, 40.0, 20, 100), Rect::new(0, 0, 20, 40));
    }
}
