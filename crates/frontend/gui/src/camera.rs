//! Live camera capture on a background thread.
//!
//! nokhwa's `frame()` blocks until the device delivers, so the camera lives
//! on its own thread and hands decoded frames to the render thread over a
//! bounded channel. [`CameraFeed::poll_frame`] drains the channel without
//! waiting and keeps only the newest frame.

use crate::settings::CameraSettings;
use halftone_core::logging::{log, LogCategory, LogLevel};
use halftone_core::types::Frame;
use halftone_core::{HalftoneError, VideoSource};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use nokhwa::Camera;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{sync_channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Frames in flight between the capture and render threads
const FRAME_QUEUE_DEPTH: usize = 2;

/// Failed captures in a row before the device is treated as gone
const MAX_CONSECUTIVE_FAILURES: u32 = 30;
const FAILURE_BACKOFF_BASE: Duration = Duration::from_millis(10);
const FAILURE_BACKOFF_MAX: Duration = Duration::from_millis(500);

/// Paces retries after failed captures. The delay doubles with each
/// failure in a row up to [`FAILURE_BACKOFF_MAX`].
#[derive(Debug, Default)]
pub struct FailureBackoff {
    consecutive: u32,
}

impl FailureBackoff {
    /// Count a failure. Returns how long to wait before retrying, or `None`
    /// once the limit is reached.
    pub fn record_failure(&mut self) -> Option<Duration> {
        self.consecutive += 1;
        if self.consecutive >= MAX_CONSECUTIVE_FAILURES {
            return None;
        }
        let shift = (self.consecutive - 1).min(16);
        Some((FAILURE_BACKOFF_BASE * (1u32 << shift)).min(FAILURE_BACKOFF_MAX))
    }

    pub fn reset(&mut self) {
        self.consecutive = 0;
    }

    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }
}

pub struct CameraFeed {
    frames: Option<Receiver<Frame>>,
    resolution: (u32, u32),
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    name: String,
}

impl CameraFeed {
    /// Open the camera and start streaming. Fails if the device can't be
    /// opened or refuses to stream.
    pub fn open(settings: &CameraSettings) -> Result<Self, HalftoneError> {
        let (frame_tx, frame_rx) = sync_channel::<Frame>(FRAME_QUEUE_DEPTH);
        let (ready_tx, ready_rx) = sync_channel::<Result<(u32, u32), String>>(1);
        let running = Arc::new(AtomicBool::new(true));

        let request = settings.clone();
        let thread_running = running.clone();
        let thread = thread::Builder::new()
            .name("camera".to_string())
            .spawn(move || {
                // The device handle stays on this thread
                let mut cam = match open_camera(&request) {
                    Ok(cam) => cam,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let actual = cam.resolution();
                let _ = ready_tx.send(Ok((actual.width(), actual.height())));

                let mut backoff = FailureBackoff::default();
                while thread_running.load(Ordering::Relaxed) {
                    match capture_frame(&mut cam) {
                        Ok(frame) => {
                            backoff.reset();
                            // Render side gone
                            if frame_tx.send(frame).is_err() {
                                break;
                            }
                        }
                        Err(e) => match backoff.record_failure() {
                            Some(delay) => {
                                log(LogCategory::Camera, LogLevel::Warn, || e);
                                thread::sleep(delay);
                            }
                            None => {
                                log(LogCategory::Camera, LogLevel::Error, || {
                                    format!(
                                        "giving up after {} failed captures: {}",
                                        backoff.consecutive(),
                                        e
                                    )
                                });
                                break;
                            }
                        },
                    }
                }
                // Dropping the sender reports the disconnect to poll_frame
                drop(frame_tx);
                let _ = cam.stop_stream();
                log(LogCategory::Camera, LogLevel::Info, || {
                    "capture thread stopped".to_string()
                });
            })
            .map_err(|e| HalftoneError::Source(format!("spawn capture thread: {}", e)))?;

        let resolution = match ready_rx.recv() {
            Ok(Ok(resolution)) => resolution,
            Ok(Err(e)) => {
                let _ = thread.join();
                return Err(HalftoneError::Source(e));
            }
            Err(_) => {
                let _ = thread.join();
                return Err(HalftoneError::Source(
                    "capture thread exited during start-up".to_string(),
                ));
            }
        };

        log(LogCategory::Camera, LogLevel::Info, || {
            format!(
                "camera {} streaming at {}x{}",
                settings.index, resolution.0, resolution.1
            )
        });

        Ok(Self {
            frames: Some(frame_rx),
            resolution,
            running,
            thread: Some(thread),
            name: format!("camera {}", settings.index),
        })
    }
}

fn open_camera(settings: &CameraSettings) -> Result<Camera, String> {
    let format = CameraFormat::new(
        Resolution::new(settings.width, settings.height),
        FrameFormat::YUYV,
        settings.fps,
    );
    let request = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(format));

    let mut cam = Camera::new(CameraIndex::Index(settings.index), request)
        .map_err(|e| format!("create camera {}: {}", settings.index, e))?;
    cam.open_stream()
        .map_err(|e| format!("open stream: {}", e))?;
    Ok(cam)
}

/// Block for the next frame and convert it to 0xFFRRGGBB pixels.
fn capture_frame(cam: &mut Camera) -> Result<Frame, String> {
    let raw = cam.frame().map_err(|e| format!("fetch frame: {}", e))?;
    let rgb = raw
        .decode_image::<RgbFormat>()
        .map_err(|e| format!("decode frame: {}", e))?;
    let (width, height) = rgb.dimensions();
    Ok(Frame {
        width,
        height,
        pixels: pack_rgb(rgb.as_raw()),
    })
}

/// Tightly packed RGB bytes to opaque ARGB pixels.
pub fn pack_rgb(rgb: &[u8]) -> Vec<u32> {
    rgb.chunks_exact(3)
        .map(|p| 0xFF00_0000 | (p[0] as u32) << 16 | (p[1] as u32) << 8 | p[2] as u32)
        .collect()
}

impl VideoSource for CameraFeed {
    fn poll_frame(&mut self) -> Option<Frame> {
        let frames = self.frames.as_ref()?;
        let mut newest = None;
        loop {
            match frames.try_recv() {
                Ok(frame) => newest = Some(frame),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log(LogCategory::Camera, LogLevel::Error, || {
                        "camera disconnected".to_string()
                    });
                    self.frames = None;
                    break;
                }
            }
        }
        if let Some(frame) = &newest {
            self.resolution = (frame.width, frame.height);
        }
        newest
    }

    fn native_resolution(&self) -> Option<(u32, u32)> {
        Some(self.resolution)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for CameraFeed {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        // Unblocks a pending send so the thread can see the flag
        self.frames = None;
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
