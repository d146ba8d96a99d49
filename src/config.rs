//! Configuration management for the iris gaze tracker

use crate::{
    constants::{
        DEFAULT_CAMERA_INDEX, DEFAULT_VIDEO_EXTENSIONS, DEFAULT_WINDOW_NAME, IRIS_RING_RADIUS, IRIS_RING_THICKNESS,
    },
    filters::create_filter,
    overlay::OverlayStyle,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model configuration
    pub models: ModelConfig,

    /// Face detection configuration
    pub face_detection: FaceDetectionConfig,

    /// Frame source configuration
    pub capture: CaptureConfig,

    /// Display configuration
    pub display: DisplayConfig,

    /// Smoothing configuration
    pub smoothing: SmoothingConfig,
}

/// Model file paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the SCRFD face detection model
    pub face_detector: PathBuf,

    /// Path to the face landmark model with iris refinement
    pub face_mesh: PathBuf,
}

/// Face detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceDetectionConfig {
    /// Confidence threshold (0.0-1.0)
    pub confidence_threshold: f32,

    /// IOU threshold for non-maximum suppression (0.0-1.0)
    pub nms_threshold: f32,

    /// Maximum number of faces to track
    pub max_faces: usize,

    /// Fraction of the face box added on each side before cropping
    pub bbox_expansion: f32,
}

/// Frame source parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Camera device index for live capture
    pub camera_index: i32,

    /// Accepted video file extensions
    pub video_extensions: Vec<String>,
}

/// Display parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Run without a window
    pub headless: bool,

    /// Window title
    pub window_name: String,

    /// Iris ring radius in pixels
    pub ring_radius: i32,

    /// Iris ring thickness in pixels
    pub ring_thickness: i32,

    /// Draw direction labels
    pub show_labels: bool,

    /// Draw eye contour points
    pub show_contour: bool,

    /// Draw every face mesh landmark
    pub show_mesh: bool,

    /// Mirror frames horizontally before processing
    pub mirror: bool,
}

/// Smoothing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Filter spec, for example `none`, `exponential:0.4` or `median:5`
    pub filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models: ModelConfig::default(),
            face_detection: FaceDetectionConfig::default(),
            capture: CaptureConfig::default(),
            display: DisplayConfig::default(),
            smoothing: SmoothingConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            face_detector: PathBuf::from("assets/face_detector.onnx"),
            face_mesh: PathBuf::from("assets/face_landmarks_with_iris.onnx"),
        }
    }
}

impl Default for FaceDetectionConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            nms_threshold: 0.4,
            max_faces: 1,
            bbox_expansion: 0.25,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            camera_index: DEFAULT_CAMERA_INDEX,
            video_extensions: DEFAULT_VIDEO_EXTENSIONS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            headless: false,
            window_name: DEFAULT_WINDOW_NAME.to_string(),
            ring_radius: IRIS_RING_RADIUS,
            ring_thickness: IRIS_RING_THICKNESS,
            show_labels: true,
            show_contour: false,
            show_mesh: false,
            mirror: false,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            filter: "none".to_string(),
        }
    }
}

impl DisplayConfig {
    /// Overlay drawing options derived from this configuration
    #[must_use]
    pub fn overlay_style(&self) -> OverlayStyle {
        OverlayStyle {
            ring_radius: self.ring_radius,
            ring_thickness: self.ring_thickness,
            show_labels: self.show_labels,
            show_contour: self.show_contour,
            show_mesh: self.show_mesh,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate value ranges. Model paths are checked when the models load.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.face_detection.confidence_threshold) {
            return Err(Error::ConfigError(
                "Confidence threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.face_detection.nms_threshold) {
            return Err(Error::ConfigError(
                "NMS threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.face_detection.max_faces == 0 {
            return Err(Error::ConfigError("max_faces must be greater than 0".to_string()));
        }
        if !(0.0..=1.0).contains(&self.face_detection.bbox_expansion) {
            return Err(Error::ConfigError(
                "Bounding box expansion must be between 0.0 and 1.0".to_string(),
            ));
        }

        if self.capture.camera_index < 0 {
            return Err(Error::ConfigError("Camera index must not be negative".to_string()));
        }
        if self.capture.video_extensions.is_empty() {
            return Err(Error::ConfigError(
                "At least one video extension must be allowed".to_string(),
            ));
        }

        if self.display.ring_radius <= 0 || self.display.ring_thickness <= 0 {
            return Err(Error::ConfigError(
                "Ring radius and thickness must be greater than 0".to_string(),
            ));
        }
        if self.display.window_name.is_empty() {
            return Err(Error::ConfigError("Window name must not be empty".to_string()));
        }

        create_filter(&self.smoothing.filter)
            .map_err(|e| Error::ConfigError(format!("Invalid smoothing filter: {e}")))?;

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Iris Gaze Tracker Configuration

# Model paths
models:
  face_detector: "assets/face_detector.onnx"
  face_mesh: "assets/face_landmarks_with_iris.onnx"

# Face detection parameters
face_detection:
  confidence_threshold: 0.5
  nms_threshold: 0.4
  max_faces: 1
  bbox_expansion: 0.25

# Frame source
capture:
  camera_index: 1
  video_extensions: ["mp4", "avi"]

# Display settings
display:
  headless: false
  window_name: "Iris Tracker"
  ring_radius: 10
  ring_thickness: 2
  show_labels: true
  show_contour: false
  show_mesh: false
  mirror: false

# Temporal smoothing of the relative iris position
smoothing:
  filter: "none"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_matches_defaults() {
        let parsed: Config = serde_yaml::from_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Config = serde_yaml::from_str("smoothing:\n  filter: \"exponential:0.3\"\n").unwrap();
        assert_eq!(parsed.smoothing.filter, "exponential:0.3");
        assert_eq!(parsed.capture.camera_index, 1);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.face_detection.confidence_threshold = 1.5;
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));

        let mut config = Config::default();
        config.smoothing.filter = "median:4".to_string();
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));

        let mut config = Config::default();
        config.capture.video_extensions.clear();
        assert!(config.validate().is_err());
    }
}
