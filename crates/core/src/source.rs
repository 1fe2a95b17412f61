//! Video sources feeding the frame driver.

use crate::types::Frame;

/// A non-blocking supplier of video frames.
pub trait VideoSource {
    /// Newest frame since the last poll, if any. Must not block.
    fn poll_frame(&mut self) -> Option<Frame>;

    /// Capture size, once known
    fn native_resolution(&self) -> Option<(u32, u32)>;

    fn name(&self) -> &str {
        "video source"
    }
}

/// Never yields a frame. Stands in when the camera can't be opened so the
/// render loop keeps running.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSource;

impl VideoSource for NullSource {
    fn poll_frame(&mut self) -> Option<Frame> {
        None
    }

    fn native_resolution(&self) -> Option<(u32, u32)> {
        None
    }

    fn name(&self) -> &str {
        "no source"
    }
}

/// Yields one fixed image on the first poll, then nothing.
#[derive(Debug, Clone)]
pub struct StillSource {
    frame: Frame,
    delivered: bool,
}

impl StillSource {
    pub fn new(frame: Frame) -> Self {
        Self {
            frame,
            delivered: false,
        }
    }
}

impl VideoSource for StillSource {
    fn poll_frame(&mut self) -> Option<Frame> {
        if self.delivered {
            return None;
        }
        self.delivered = true;
        Some(self.frame.clone())
    }

    fn native_resolution(&self) -> Option<(u32, u32)> {
        Some((self.frame.width, self.frame.height))
    }

    fn name(&self) -> &str {
        "still image"
    }
}
