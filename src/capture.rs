//! Frame sources and display surfaces.
//!
//! Both the capture handle and the window are owned by values that release
//! them in `Drop`, so every exit path of the processing loop closes them:
//! end of stream, a user stop, or an error propagated with `?`.

use crate::{constants::KEY_POLL_MS, Error, Result};
use log::{info, warn};
use opencv::{
    core::Mat,
    highgui::{self, WINDOW_AUTOSIZE},
    prelude::*,
    videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE},
};
use std::path::Path;

/// Keys that stop the loop
const EXIT_KEYS: [i32; 2] = [b'q' as i32, 27];

/// Blocking source of frames
pub trait FrameSource {
    /// Next frame, or `None` at end of stream. Read failures end the stream.
    fn next_frame(&mut self) -> Option<Mat>;
}

/// Destination of annotated frames
pub trait FrameSink {
    /// Present a frame
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be displayed.
    fn show(&mut self, frame: &Mat) -> Result<()>;

    /// Poll for an exit request with a bounded wait
    ///
    /// # Errors
    ///
    /// Returns an error if polling the window system fails.
    fn poll_exit(&mut self) -> Result<bool>;
}

/// Camera or video file read through OpenCV
pub struct VideoFrameSource {
    capture: VideoCapture,
    description: String,
}

impl VideoFrameSource {
    /// Open a camera device
    ///
    /// # Errors
    ///
    /// Returns `Error::AcquisitionFailure` if the device cannot be opened.
    pub fn open_camera(index: i32) -> Result<Self> {
        info!("Opening camera {}", index);
        let mut capture = VideoCapture::new(index, videoio::CAP_ANY)?;
        Self::ensure_opened(&capture, &format!("camera {index}"))?;

        // Lower latency for live input
        if !capture.set(CAP_PROP_BUFFERSIZE, 1.0)? {
            warn!("Camera {} ignored buffer size request", index);
        }

        Ok(Self {
            capture,
            description: format!("camera {index}"),
        })
    }

    /// Open a video file
    ///
    /// # Errors
    ///
    /// Returns `Error::AcquisitionFailure` if the file cannot be opened.
    pub fn open_file(path: &Path) -> Result<Self> {
        info!("Opening video file: {}", path.display());
        let name = path
            .to_str()
            .ok_or_else(|| Error::InvalidInput(format!("Path is not valid UTF-8: {}", path.display())))?;
        let capture = VideoCapture::from_file(name, videoio::CAP_ANY)?;
        Self::ensure_opened(&capture, name)?;

        Ok(Self {
            capture,
            description: name.to_string(),
        })
    }

    fn ensure_opened(capture: &VideoCapture, what: &str) -> Result<()> {
        if capture.is_opened()? {
            Ok(())
        } else {
            Err(Error::AcquisitionFailure(format!("Could not open {what}")))
        }
    }
}

impl FrameSource for VideoFrameSource {
    fn next_frame(&mut self) -> Option<Mat> {
        let mut frame = Mat::default();
        match self.capture.read(&mut frame) {
            Ok(true) if !frame.empty() => Some(frame),
            Ok(_) => None,
            Err(e) => {
                warn!("Frame read from {} failed: {}", self.description, e);
                None
            }
        }
    }
}

impl Drop for VideoFrameSource {
    fn drop(&mut self) {
        if let Err(e) = self.capture.release() {
            warn!("Failed to release {}: {}", self.description, e);
        } else {
            info!("Released {}", self.description);
        }
    }
}

/// Named OpenCV window
pub struct WindowSink {
    name: String,
}

impl WindowSink {
    /// Create the window
    ///
    /// # Errors
    ///
    /// Returns an error if the window cannot be created.
    pub fn new(name: &str) -> Result<Self> {
        highgui::named_window(name, WINDOW_AUTOSIZE)?;
        Ok(Self { name: name.to_string() })
    }
}

impl FrameSink for WindowSink {
    fn show(&mut self, frame: &Mat) -> Result<()> {
        highgui::imshow(&self.name, frame)?;
        Ok(())
    }

    fn poll_exit(&mut self) -> Result<bool> {
        let key = highgui::wait_key(KEY_POLL_MS)?;
        Ok(key >= 0 && EXIT_KEYS.contains(&(key & 0xFF)))
    }
}

impl Drop for WindowSink {
    fn drop(&mut self) {
        if let Err(e) = highgui::destroy_window(&self.name) {
            warn!("Failed to destroy window {}: {}", self.name, e);
        }
    }
}

/// Sink for runs without a display; never requests exit
#[derive(Debug, Default)]
pub struct HeadlessSink {
    frames_shown: usize,
}

impl HeadlessSink {
    #[must_use]
    pub fn frames_shown(&self) -> usize {
        self.frames_shown
    }
}

impl FrameSink for HeadlessSink {
    fn show(&mut self, _frame: &Mat) -> Result<()> {
        self.frames_shown += 1;
        Ok(())
    }

    fn poll_exit(&mut self) -> Result<bool> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_sink_counts_frames() {
        let mut sink = HeadlessSink::default();
        sink.show(&Mat::default()).unwrap();
        sink.show(&Mat::default()).unwrap();
        assert_eq!(sink.frames_shown(), 2);
        assert!(!sink.poll_exit().unwrap());
    }

    #[test]
    fn test_missing_file_is_acquisition_failure() {
        let result = VideoFrameSource::open_file(Path::new("/nonexistent/clip.mp4"));
        assert!(matches!(result, Err(Error::AcquisitionFailure(_)) | Err(Error::OpenCV(_))));
    }
}
