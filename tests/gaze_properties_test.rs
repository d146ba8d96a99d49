//! Property tests for the gaze estimator

use iris_gaze_tracker::{
    gaze::{classify_gaze, classify_relative_position, compute_iris_center, gaze_angle, GazeDirection, Point2D},
    Error,
};
use proptest::prelude::*;

fn rank(direction: GazeDirection) -> u8 {
    match direction {
        GazeDirection::LookingLeft => 0,
        GazeDirection::LookingCenter => 1,
        GazeDirection::LookingRight => 2,
    }
}

fn point() -> impl Strategy<Value = Point2D> {
    (0..4000i32, 0..4000i32).prop_map(|(x, y)| Point2D::new(x, y))
}

proptest! {
    #[test]
    fn prop_iris_center_is_floor_of_mean(points in prop::collection::vec(point(), 4)) {
        let center = compute_iris_center(&points).unwrap();
        let sum_x: i32 = points.iter().map(|p| p.x).sum();
        let sum_y: i32 = points.iter().map(|p| p.y).sum();
        prop_assert_eq!(center.x, sum_x.div_euclid(4));
        prop_assert_eq!(center.y, sum_y.div_euclid(4));
    }

    #[test]
    fn prop_classification_monotonic_in_iris_x(
        outer_x in 0..1000i32,
        width in 1..500i32,
        a in -200..800i32,
        b in -200..800i32,
    ) {
        let corners = (Point2D::new(outer_x, 0), Point2D::new(outer_x + width, 0));
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let left = classify_gaze(Point2D::new(outer_x + lo, 0), corners).unwrap();
        let right = classify_gaze(Point2D::new(outer_x + hi, 0), corners).unwrap();
        prop_assert!(rank(left.direction) <= rank(right.direction));
        prop_assert!(left.angle_degrees <= right.angle_degrees);
    }

    #[test]
    fn prop_angle_within_bounds_inside_eye(rp in 0.0f64..=1.0) {
        let angle = classify_relative_position(rp).angle_degrees;
        prop_assert!((-30.0..=30.0).contains(&angle));
    }

    #[test]
    fn prop_zero_width_never_nan(x in -1000..1000i32, y in -1000..1000i32, iris_x in -1000..1000i32) {
        let corner = Point2D::new(x, y);
        let result = classify_gaze(Point2D::new(iris_x, y), (corner, Point2D::new(x, y + 7)));
        prop_assert!(matches!(result, Err(Error::DegenerateGeometry(_))));
    }
}

#[test]
fn test_reference_scenarios() {
    let corners = (Point2D::new(100, 50), Point2D::new(200, 50));

    let left = classify_gaze(Point2D::new(130, 55), corners).unwrap();
    assert_eq!(left.direction, GazeDirection::LookingLeft);
    assert!((left.angle_degrees + 12.0).abs() < 1e-9);

    let right = classify_gaze(Point2D::new(170, 50), corners).unwrap();
    assert_eq!(right.direction, GazeDirection::LookingRight);
    assert!((right.angle_degrees - 12.0).abs() < 1e-9);

    let center = classify_gaze(Point2D::new(150, 50), corners).unwrap();
    assert_eq!(center.direction, GazeDirection::LookingCenter);
    assert_eq!(center.angle_degrees, 0.0);
}

#[test]
fn test_boundaries_exact() {
    let corners = (Point2D::new(0, 0), Point2D::new(10, 0));
    assert_eq!(classify_gaze(Point2D::new(4, 0), corners).unwrap().direction, GazeDirection::LookingCenter);
    assert_eq!(classify_gaze(Point2D::new(6, 0), corners).unwrap().direction, GazeDirection::LookingCenter);
    assert_eq!(classify_gaze(Point2D::new(3, 0), corners).unwrap().direction, GazeDirection::LookingLeft);
    assert_eq!(classify_gaze(Point2D::new(7, 0), corners).unwrap().direction, GazeDirection::LookingRight);
}

#[test]
fn test_angle_reference_points() {
    assert_eq!(gaze_angle(0.5), 0.0);
    assert_eq!(gaze_angle(0.0), -30.0);
    assert_eq!(gaze_angle(1.0), 30.0);
}

#[test]
fn test_iris_outside_eye_extrapolates() {
    // Detector noise can put the iris past a corner; the angle is not clamped
    let result = classify_gaze(Point2D::new(90, 0), (Point2D::new(100, 0), Point2D::new(200, 0))).unwrap();
    assert_eq!(result.direction, GazeDirection::LookingLeft);
    assert!(result.angle_degrees < -30.0);
}
