//! Optional temporal smoothing of the relative iris position.
//!
//! The gaze classifier is a pure per-frame function, so raw estimates jitter
//! from frame to frame. Filters here smooth the relative position before it
//! is classified again. They are a separate stage and never change the
//! classifier itself.

/// Exponential moving average
pub mod exponential;

/// Sliding window mean
pub mod moving_average;

/// Sliding window median for outlier rejection
pub mod median;

use crate::{
    constants::{DEFAULT_EXPONENTIAL_ALPHA, DEFAULT_MEDIAN_WINDOW, DEFAULT_MOVING_AVERAGE_WINDOW},
    gaze::classify_relative_position,
    overlay::FaceGaze,
    Error, Result,
};

/// Trait for all relative position filters
pub trait GazeFilter: Send + Sync {
    /// Feed one relative position and return the smoothed value
    fn apply(&mut self, relative_position: f64) -> f64;

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes values through unchanged
pub struct NoFilter;

impl GazeFilter for NoFilter {
    fn apply(&mut self, relative_position: f64) -> f64 {
        relative_position
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

fn parse_param<T: std::str::FromStr>(filter: &str, raw: Option<&str>, default: T) -> Result<T> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| Error::FilterError(format!("Invalid parameter '{value}' for {filter} filter"))),
    }
}

/// Create a filter from a spec such as `exponential:0.3` or `median:5`.
///
/// # Errors
///
/// Returns `Error::FilterError` for unknown names or invalid parameters.
pub fn create_filter(spec: &str) -> Result<Box<dyn GazeFilter>> {
    let spec = spec.trim().to_lowercase();
    let mut parts = spec.splitn(2, ':');
    let name = parts.next().unwrap_or_default();
    let param = parts.next();

    match name {
        "none" | "nofilter" => Ok(Box::new(NoFilter)),
        "exponential" | "ema" => {
            let alpha = parse_param(name, param, DEFAULT_EXPONENTIAL_ALPHA)?;
            Ok(Box::new(exponential::ExponentialFilter::new(alpha)?))
        }
        "moving_average" | "movingaverage" => {
            let window = parse_param(name, param, DEFAULT_MOVING_AVERAGE_WINDOW)?;
            Ok(Box::new(moving_average::MovingAverageFilter::new(window)?))
        }
        "median" => {
            let window = parse_param(name, param, DEFAULT_MEDIAN_WINDOW)?;
            Ok(Box::new(median::MedianFilter::new(window)?))
        }
        _ => Err(Error::FilterError(format!("Unknown filter type: {spec}"))),
    }
}

/// Per-eye smoothing of a face's gaze estimates
pub struct GazeSmoother {
    left: Box<dyn GazeFilter>,
    right: Box<dyn GazeFilter>,
}

impl GazeSmoother {
    /// Build one filter per eye from the same spec
    ///
    /// # Errors
    ///
    /// Returns `Error::FilterError` if the spec is invalid.
    pub fn new(spec: &str) -> Result<Self> {
        Ok(Self {
            left: create_filter(spec)?,
            right: create_filter(spec)?,
        })
    }

    /// Replace each eye's estimate with one classified from the smoothed
    /// relative position. Eyes without an estimate leave their filter untouched.
    pub fn smooth(&mut self, face: &mut FaceGaze) {
        for (eye, filter) in [(&mut face.left, &mut self.left), (&mut face.right, &mut self.right)] {
            if let Some(gaze) = eye.gaze.as_mut() {
                *gaze = classify_relative_position(filter.apply(gaze.relative_position));
            }
        }
    }

    /// Forget history, for example when the face is lost
    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.left.name()
    }
}
