//! Horizontal gaze estimation from iris landmarks.
//!
//! The pipeline per frame:
//! 1. Face detection (SCRFD on ONNX Runtime)
//! 2. Face mesh landmarks with refined iris points (478 points)
//! 3. Iris center and eye corners for each eye
//! 4. Relative iris position → "Looking Left/Center/Right" and a gaze angle
//! 5. Optional temporal smoothing and the frame overlay
//!
//! The angle is an uncalibrated linear estimate: the full eye width is assumed
//! to span ±30° of horizontal rotation.
//!
//! # Examples
//!
//! ## Gaze from known landmarks
//!
//! ```
//! use iris_gaze_tracker::gaze::{classify_gaze, compute_iris_center, GazeDirection, Point2D};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let iris = [
//!     Point2D::new(128, 54),
//!     Point2D::new(132, 56),
//!     Point2D::new(130, 53),
//!     Point2D::new(130, 57),
//! ];
//! let center = compute_iris_center(&iris)?;
//! let gaze = classify_gaze(center, (Point2D::new(100, 50), Point2D::new(200, 50)))?;
//!
//! assert_eq!(gaze.direction, GazeDirection::LookingLeft);
//! assert!((gaze.angle_degrees + 12.0).abs() < 1e-9);
//! # Ok(())
//! # }
//! ```
//!
//! ## Live capture
//!
//! ```no_run
//! use iris_gaze_tracker::{app::start_live_capture, config::Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let summary = start_live_capture(&Config::default())?;
//! println!("{} frames, {} with a face", summary.frames_processed, summary.frames_with_faces);
//! # Ok(())
//! # }
//! ```

/// Iris center and gaze classification
pub mod gaze;

/// Landmark types and eye index tables
pub mod landmarks;

/// Per-frame analysis and overlay drawing
pub mod overlay;

/// Temporal smoothing of gaze estimates
pub mod filters;

/// Face detection module for finding faces in images
pub mod face_detection;

/// Face mesh landmark detection
pub mod face_mesh;

/// Frame sources and display sinks
pub mod capture;

/// Video file selection
pub mod file_select;

/// Utility functions for image processing and coordinate transformations
pub mod utils;

/// Error types and result handling
pub mod error;

/// Main application module
pub mod app;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
