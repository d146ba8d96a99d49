//! Main application module: the per-frame loop and its two entry points.

use crate::{
    capture::{FrameSink, FrameSource, HeadlessSink, VideoFrameSource, WindowSink},
    config::Config,
    face_detection::FaceDetector,
    face_mesh::{FaceMeshDetector, LandmarkDetector, OnnxLandmarkDetector},
    file_select::select_video_file,
    filters::GazeSmoother,
    overlay::{per_frame_overlay, FaceGaze, OverlayStyle},
    Result,
};
use log::{debug, info, warn};
use opencv::{core::Mat, prelude::*};
use std::path::{Path, PathBuf};

/// Video source type
#[derive(Debug, Clone, PartialEq)]
pub enum VideoSource {
    /// Camera index
    Camera(i32),
    /// Video file path
    File(PathBuf),
}

/// Why the loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No more frames, or a frame read failed
    EndOfStream,
    /// The exit key was pressed
    UserRequested,
}

/// Outcome of one run over a frame source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames read from the source
    pub frames_processed: usize,
    /// Frames on which at least one face was analyzed
    pub frames_with_faces: usize,
    pub stop_reason: StopReason,
}

/// Per-frame gaze pipeline: detection, analysis, optional smoothing, overlay
pub struct GazeTracker {
    detector: Box<dyn LandmarkDetector>,
    smoother: Option<GazeSmoother>,
    style: OverlayStyle,
    mirror: bool,
}

impl GazeTracker {
    #[must_use]
    pub fn new(detector: Box<dyn LandmarkDetector>, style: OverlayStyle) -> Self {
        Self {
            detector,
            smoother: None,
            style,
            mirror: false,
        }
    }

    /// Smooth relative positions across frames with the given filter spec.
    /// `none` disables smoothing.
    ///
    /// # Errors
    ///
    /// Returns `Error::FilterError` if the spec is invalid.
    pub fn with_smoothing(mut self, spec: &str) -> Result<Self> {
        let smoother = GazeSmoother::new(spec)?;
        self.smoother = if smoother.name() == "NoFilter" { None } else { Some(smoother) };
        Ok(self)
    }

    #[must_use]
    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// Build the tracker described by `config`, loading both ONNX models
    ///
    /// # Errors
    ///
    /// Returns an error if a model fails to load or the smoothing spec is invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        let face_detector = FaceDetector::new(
            &config.models.face_detector,
            config.face_detection.confidence_threshold,
            config.face_detection.nms_threshold,
            config.face_detection.max_faces,
        )?;
        let face_mesh = FaceMeshDetector::new(&config.models.face_mesh)?;
        let detector = OnnxLandmarkDetector::new(face_detector, face_mesh, config.face_detection.bbox_expansion);

        Self::new(Box::new(detector), config.display.overlay_style())
            .with_smoothing(&config.smoothing.filter)
            .map(|tracker| tracker.with_mirror(config.display.mirror))
    }

    /// Annotate one frame in place and return the per-face gaze estimates.
    /// An empty result means no face was found and the frame is untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if detection, analysis or drawing fails.
    pub fn process_frame(&mut self, frame: &mut Mat) -> Result<Vec<FaceGaze>> {
        if self.mirror {
            let source = frame.try_clone()?;
            opencv::core::flip(&source, frame, 1)?;
        }

        let faces = self.detector.detect(frame)?;
        if faces.is_empty() {
            if let Some(smoother) = self.smoother.as_mut() {
                smoother.reset();
            }
            return Ok(Vec::new());
        }

        per_frame_overlay(frame, &faces, &self.style, self.smoother.as_mut())
    }

    /// Run the loop until the source ends or the sink requests exit.
    ///
    /// Failures inside a frame are logged and the frame is shown as is.
    ///
    /// # Errors
    ///
    /// Returns an error only if the sink fails.
    pub fn run(&mut self, source: &mut dyn FrameSource, sink: &mut dyn FrameSink) -> Result<RunSummary> {
        let mut summary = RunSummary {
            frames_processed: 0,
            frames_with_faces: 0,
            stop_reason: StopReason::EndOfStream,
        };

        while let Some(mut frame) = source.next_frame() {
            summary.frames_processed += 1;

            match self.process_frame(&mut frame) {
                Ok(results) if results.is_empty() => {
                    debug!("Frame {}: no face detected", summary.frames_processed);
                }
                Ok(results) => {
                    summary.frames_with_faces += 1;
                    log_gaze(summary.frames_processed, &results);
                }
                Err(e) => warn!("Frame {} skipped: {}", summary.frames_processed, e),
            }

            sink.show(&frame)?;
            if sink.poll_exit()? {
                info!("Exit requested by user");
                summary.stop_reason = StopReason::UserRequested;
                break;
            }
        }

        info!(
            "Processed {} frames ({} with faces), stopped: {:?}",
            summary.frames_processed, summary.frames_with_faces, summary.stop_reason
        );
        Ok(summary)
    }
}

fn log_gaze(frame_number: usize, results: &[FaceGaze]) {
    for face in results {
        for eye in face.eyes() {
            match &eye.gaze {
                Some(gaze) => debug!(
                    "Frame {}: {} eye {} ({:+.1} deg)",
                    frame_number,
                    eye.side.name(),
                    gaze.direction,
                    gaze.angle_degrees
                ),
                None => debug!("Frame {}: {} eye degenerate, no label", frame_number, eye.side.name()),
            }
        }
    }
}

/// Open `source`, run the tracker over it and release everything on return
///
/// # Errors
///
/// Returns an error if the source, window or models cannot be acquired.
pub fn run_source(source: &VideoSource, config: &Config) -> Result<RunSummary> {
    let mut frames = match source {
        VideoSource::Camera(index) => VideoFrameSource::open_camera(*index)?,
        VideoSource::File(path) => VideoFrameSource::open_file(path)?,
    };
    let mut tracker = GazeTracker::from_config(config)?;

    if config.display.headless {
        let mut sink = HeadlessSink::default();
        tracker.run(&mut frames, &mut sink)
    } else {
        let mut sink = WindowSink::new(&config.display.window_name)?;
        tracker.run(&mut frames, &mut sink)
    }
}

/// Track gaze on the configured live camera
///
/// # Errors
///
/// Returns an error if the camera, window or models cannot be acquired.
pub fn start_live_capture(config: &Config) -> Result<RunSummary> {
    run_source(&VideoSource::Camera(config.capture.camera_index), config)
}

/// Track gaze on a video file. `None` means the user chose nothing.
///
/// # Errors
///
/// Returns `Error::NoFileSelected` when `path` is `None`, `Error::InvalidInput`
/// for a disallowed or missing file, or an acquisition error.
pub fn process_video_file(path: Option<&Path>, config: &Config) -> Result<RunSummary> {
    let path = select_video_file(path, &config.capture.video_extensions)?;
    run_source(&VideoSource::File(path), config)
}
