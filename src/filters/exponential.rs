use super::GazeFilter;
use crate::{Error, Result};

/// Exponential smoothing filter
pub struct ExponentialFilter {
    alpha: f64,
    last: Option<f64>,
}

impl ExponentialFilter {
    /// # Errors
    ///
    /// Returns `Error::FilterError` unless `alpha` is in (0, 1].
    pub fn new(alpha: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(Error::FilterError(format!("Alpha must be in (0, 1], got {alpha}")));
        }
        Ok(Self { alpha, last: None })
    }
}

impl GazeFilter for ExponentialFilter {
    fn apply(&mut self, relative_position: f64) -> f64 {
        let filtered = match self.last {
            Some(last) => self.alpha * relative_position + (1.0 - self.alpha) * last,
            None => relative_position,
        };
        self.last = Some(filtered);
        filtered
    }

    fn reset(&mut self) {
        self.last = None;
    }

    fn name(&self) -> &str {
        "ExponentialFilter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_filter() {
        let mut filter = ExponentialFilter::new(0.5).unwrap();

        // First value passes through
        assert_eq!(filter.apply(0.2), 0.2);
        // 0.5 * 0.6 + 0.5 * 0.2
        assert!((filter.apply(0.6) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_alpha_bounds() {
        assert!(ExponentialFilter::new(0.0).is_err());
        assert!(ExponentialFilter::new(1.5).is_err());
        assert!(ExponentialFilter::new(f64::NAN).is_err());

        let mut passthrough = ExponentialFilter::new(1.0).unwrap();
        passthrough.apply(0.1);
        assert_eq!(passthrough.apply(0.9), 0.9);
    }

    #[test]
    fn test_reset() {
        let mut filter = ExponentialFilter::new(0.1).unwrap();
        filter.apply(0.0);
        filter.reset();
        assert_eq!(filter.apply(0.7), 0.7);
    }
}
