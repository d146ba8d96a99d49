use super::GazeFilter;
use crate::{Error, Result};
use std::collections::VecDeque;

/// Median filter
pub struct MedianFilter {
    window_size: usize,
    buffer: VecDeque<f64>,
}

impl MedianFilter {
    /// # Errors
    ///
    /// Returns `Error::FilterError` unless `window_size` is odd and non-zero.
    pub fn new(window_size: usize) -> Result<Self> {
        if window_size == 0 || window_size % 2 == 0 {
            return Err(Error::FilterError(format!(
                "Window size must be odd and greater than 0, got {window_size}"
            )));
        }
        Ok(Self {
            window_size,
            buffer: VecDeque::with_capacity(window_size),
        })
    }

    fn median(values: &VecDeque<f64>) -> f64 {
        let mut sorted: Vec<f64> = values.iter().copied().collect();
        sorted.sort_by(f64::total_cmp);

        let len = sorted.len();
        if len % 2 == 0 {
            (sorted[len / 2 - 1] + sorted[len / 2]) / 2.0
        } else {
            sorted[len / 2]
        }
    }
}

impl GazeFilter for MedianFilter {
    fn apply(&mut self, relative_position: f64) -> f64 {
        if self.buffer.len() >= self.window_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back(relative_position);

        Self::median(&self.buffer)
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }

    fn name(&self) -> &str {
        "MedianFilter"
    }
}
