//! Configuration file loading and saving

use iris_gaze_tracker::{
    config::{Config, EXAMPLE_CONFIG},
    Error,
};
use std::io::Write;

#[test]
fn test_round_trip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tracker.yaml");

    let mut config = Config::default();
    config.capture.camera_index = 0;
    config.display.headless = true;
    config.smoothing.filter = "median:5".to_string();
    config.to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded, config);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_example_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(EXAMPLE_CONFIG.as_bytes()).unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.display.window_name, "Iris Tracker");
    assert_eq!(config.capture.video_extensions, vec!["mp4", "avi"]);
    assert_eq!(config.display.ring_radius, 10);
}

#[test]
fn test_missing_file() {
    assert!(matches!(Config::from_file("/nonexistent/tracker.yaml"), Err(Error::Io(_))));
}

#[test]
fn test_malformed_yaml() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"display: [unclosed").unwrap();

    assert!(matches!(Config::from_file(file.path()), Err(Error::ConfigError(_))));
}

#[test]
fn test_overlay_style_from_display() {
    let mut config = Config::default();
    config.display.ring_radius = 6;
    config.display.show_contour = true;

    let style = config.display.overlay_style();
    assert_eq!(style.ring_radius, 6);
    assert!(style.show_contour);
    assert!(style.show_labels);
}
