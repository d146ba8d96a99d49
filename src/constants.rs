//! Constants used throughout the application

/// Number of landmarks produced by the face mesh model with refined iris points
pub const NUM_FACE_MESH_LANDMARKS: usize = 478;

/// Iris landmarks of the subject's left eye (face mesh indexing). It appears
/// on the image right of an unmirrored frame.
pub const LEFT_IRIS: [usize; 4] = [474, 475, 476, 477];

/// Iris landmarks of the subject's right eye
pub const RIGHT_IRIS: [usize; 4] = [469, 470, 471, 472];

/// Contour of the subject's left eye. Entries 0 and 1 are the horizontal
/// corners, left-most first in image coordinates (362 inner, 263 outer).
pub const LEFT_EYE: [usize; 10] = [362, 263, 387, 386, 385, 373, 380, 381, 382, 466];

/// Contour of the subject's right eye, left-most corner first (33 outer, 133 inner)
pub const RIGHT_EYE: [usize; 10] = [33, 133, 160, 159, 158, 144, 153, 154, 155, 246];

/// Position of the image left-most corner inside an eye contour table
pub const LEFTMOST_CORNER: usize = 0;

/// Position of the image right-most corner inside an eye contour table
pub const RIGHTMOST_CORNER: usize = 1;

/// Relative positions below this are classified as looking left
pub const LEFT_THRESHOLD: f64 = 0.4;

/// Relative positions above this are classified as looking right
pub const RIGHT_THRESHOLD: f64 = 0.6;

/// Half of the angular span mapped onto the eye width.
/// Uncalibrated: the full eye span is assumed to cover ±30° of rotation.
pub const MAX_GAZE_ANGLE_DEG: f64 = 30.0;

/// Face mesh model input side, used when the model reports a dynamic shape
pub const FACE_MESH_INPUT_SIZE: usize = 192;

/// Default camera device. Index 1 matches the usual external webcam setup.
pub const DEFAULT_CAMERA_INDEX: i32 = 1;

/// Default display window title
pub const DEFAULT_WINDOW_NAME: &str = "Iris Tracker";

/// Video container extensions accepted for file processing
pub const DEFAULT_VIDEO_EXTENSIONS: [&str; 2] = ["mp4", "avi"];

/// Iris ring overlay radius in pixels
pub const IRIS_RING_RADIUS: i32 = 10;

/// Iris ring overlay thickness in pixels
pub const IRIS_RING_THICKNESS: i32 = 2;

/// Keypress poll timeout in milliseconds
pub const KEY_POLL_MS: i32 = 1;

/// Image normalization constants for face detection
pub const IMAGE_NORMALIZATION_OFFSET: f32 = 127.5;
pub const IMAGE_NORMALIZATION_SCALE: f32 = 128.0;

/// Default filter parameters
pub const DEFAULT_EXPONENTIAL_ALPHA: f64 = 0.5;
pub const DEFAULT_MOVING_AVERAGE_WINDOW: usize = 5;
pub const DEFAULT_MEDIAN_WINDOW: usize = 5;
