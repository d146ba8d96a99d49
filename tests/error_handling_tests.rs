//! Error handling tests across modules

use iris_gaze_tracker::{
    app::process_video_file,
    config::Config,
    filters::create_filter,
    gaze::{classify_gaze, compute_iris_center, Point2D},
    landmarks::{EyeSide, FaceLandmarks, NormalizedLandmark},
    overlay::analyze_face,
    Error,
};
use std::path::Path;

#[test]
fn test_filter_creation_errors() {
    match create_filter("movingaverage:0") {
        Err(Error::FilterError(msg)) => assert!(msg.contains("Window size")),
        _ => panic!("Expected FilterError"),
    }

    match create_filter("exponential:2.0") {
        Err(Error::FilterError(msg)) => assert!(msg.contains("Alpha")),
        _ => panic!("Expected FilterError"),
    }

    assert!(create_filter("exponential:-0.1").is_err());
    assert!(create_filter("median:2").is_err());
    assert!(create_filter("invalid_filter").is_err());
}

#[test]
fn test_gaze_errors() {
    assert!(matches!(compute_iris_center(&[]), Err(Error::InvalidInput(_))));

    let corner = Point2D::new(10, 10);
    match classify_gaze(Point2D::new(12, 10), (corner, corner)) {
        Err(Error::DegenerateGeometry(msg)) => assert!(msg.contains("x = 10")),
        other => panic!("Expected DegenerateGeometry, got {other:?}"),
    }
}

#[test]
fn test_landmark_set_without_iris() {
    let face = FaceLandmarks::new(vec![NormalizedLandmark::new(0.5, 0.5, 0.0); 468]);
    assert!(matches!(analyze_face(&face, 640, 480), Err(Error::InvalidInput(_))));
    assert!(face.eye(EyeSide::Left, 640, 480).is_err());
}

#[test]
fn test_video_file_not_selected() {
    let result = process_video_file(None, &Config::default());
    assert!(matches!(result, Err(Error::NoFileSelected)));
}

#[test]
fn test_video_file_wrong_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clip.mkv");
    std::fs::write(&path, b"not a video").unwrap();

    let result = process_video_file(Some(path.as_path()), &Config::default());
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[test]
fn test_video_file_missing() {
    let result = process_video_file(Some(Path::new("/nonexistent/clip.avi")), &Config::default());
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[test]
fn test_error_display() {
    assert_eq!(Error::NoFileSelected.to_string(), "No file selected");
    assert_eq!(
        Error::AcquisitionFailure("Could not open camera 1".to_string()).to_string(),
        "Frame acquisition failed: Could not open camera 1"
    );
}
