//! The frame loop.
//!
//! One tick does, in order: resync uniforms if the store is dirty, poll the
//! video source, upload a new frame if there is one, draw. When the upload
//! changes the source size, the host refits the surface before the draw so
//! the frame is never drawn at the old shape. Nothing in a tick
//! blocks; when the source has nothing new the draw reuses the bound
//! texture, which is blank until the first frame arrives.
//!
//! [`FrameDriver::run`] repeats ticks until its [`StopHandle`] fires or the
//! host reports teardown. Window events, input and presentation belong to
//! the host; see [`FrameHost`].

use crate::error::RenderResult;
use crate::fit::fit_to_aspect;
use crate::logging::{log, LogCategory, LogLevel};
use crate::renderer::HalftoneRenderer;
use crate::source::VideoSource;
use crate::store::ParameterStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// No frame received yet
    Idle,
    /// At least one frame uploaded
    Running,
}

/// Cancels a running [`FrameDriver`]. Clones share the same flag and may be
/// triggered from any thread.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What a host may touch between ticks.
pub struct HostContext<'a> {
    pub store: &'a mut ParameterStore,
    pub renderer: &'a mut dyn HalftoneRenderer,
    /// Size of the last frame the source delivered
    pub source_size: Option<(u32, u32)>,
}

impl HostContext<'_> {
    /// Resize the render surface to the largest source-shaped rectangle
    /// inside `window`, and record it as the shader resolution. Without a
    /// known source size the surface fills the window.
    pub fn refit(&mut self, window: (u32, u32)) -> RenderResult<(u32, u32)> {
        let size = self
            .source_size
            .map(|s| fit_to_aspect(window, s))
            .unwrap_or(window);
        self.renderer.set_window_size(window.0, window.1);
        if size != self.renderer.size() {
            self.renderer.resize(size.0, size.1)?;
            log(LogCategory::Render, LogLevel::Info, || {
                format!("surface {}x{} in window {}x{}", size.0, size.1, window.0, window.1)
            });
        }
        self.store.set_resolution(size.0, size.1);
        Ok(size)
    }
}

/// The window side of the loop.
pub trait FrameHost {
    /// Handle pending window and input events. Returns `false` once the
    /// window is gone.
    fn pump(&mut self, ctx: &mut HostContext<'_>) -> bool;

    /// Show what the renderer just drew.
    fn present(&mut self, renderer: &dyn HalftoneRenderer) -> RenderResult<()>;

    /// The source started delivering frames of a new size.
    fn on_source_resized(&mut self, _ctx: &mut HostContext<'_>) {}
}

/// What one tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub synced: bool,
    pub uploaded: bool,
    /// Set when the uploaded frame's size differs from the previous one
    pub source_resized: Option<(u32, u32)>,
}

pub struct FrameDriver {
    source: Box<dyn VideoSource>,
    renderer: Box<dyn HalftoneRenderer>,
    store: ParameterStore,
    state: DriverState,
    stop: StopHandle,
    source_size: Option<(u32, u32)>,
    frames_drawn: u64,
    frames_uploaded: u64,
}

impl FrameDriver {
    pub fn new(
        source: Box<dyn VideoSource>,
        renderer: Box<dyn HalftoneRenderer>,
        store: ParameterStore,
    ) -> Self {
        log(LogCategory::Driver, LogLevel::Info, || {
            format!(
                "driver: {} -> {}{}",
                source.name(),
                renderer.name(),
                if renderer.is_hardware_accelerated() {
                    " (hardware)"
                } else {
                    ""
                }
            )
        });
        Self {
            source,
            renderer,
            store,
            state: DriverState::Idle,
            stop: StopHandle::new(),
            source_size: None,
            frames_drawn: 0,
            frames_uploaded: 0,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn store(&self) -> &ParameterStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ParameterStore {
        &mut self.store
    }

    pub fn renderer(&self) -> &dyn HalftoneRenderer {
        self.renderer.as_ref()
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn frames_uploaded(&self) -> u64 {
        self.frames_uploaded
    }

    pub fn source_size(&self) -> Option<(u32, u32)> {
        self.source_size
    }

    pub fn context(&mut self) -> HostContext<'_> {
        HostContext {
            store: &mut self.store,
            renderer: self.renderer.as_mut(),
            source_size: self.source_size,
        }
    }

    /// One frame: sync, poll, upload, draw.
    pub fn tick(&mut self) -> RenderResult<TickReport> {
        self.step(None)
    }

    fn step(&mut self, host: Option<&mut dyn FrameHost>) -> RenderResult<TickReport> {
        let mut report = TickReport::default();

        if self.store.is_dirty() {
            self.renderer.sync_parameters(&mut self.store);
            report.synced = true;
        }

        if let Some(frame) = self.source.poll_frame() {
            let size = (frame.width, frame.height);
            if self.source_size != Some(size) {
                self.source_size = Some(size);
                report.source_resized = Some(size);
                log(LogCategory::Camera, LogLevel::Info, || {
                    format!("source frames are {}x{}", size.0, size.1)
                });
            }
            self.renderer.upload_frame(&frame)?;
            self.frames_uploaded += 1;
            report.uploaded = true;

            if self.state == DriverState::Idle {
                self.state = DriverState::Running;
                log(LogCategory::Driver, LogLevel::Info, || {
                    "first frame received, running".to_string()
                });
            }
        }

        if let (Some(_), Some(host)) = (report.source_resized, host) {
            host.on_source_resized(&mut self.context());
            // Refit moved the resolution uniform
            if self.store.is_dirty() {
                self.renderer.sync_parameters(&mut self.store);
                report.synced = true;
            }
        }

        self.renderer.draw()?;
        self.frames_drawn += 1;
        log(LogCategory::Driver, LogLevel::Trace, || {
            format!(
                "tick {} (synced: {}, uploaded: {})",
                self.frames_drawn, report.synced, report.uploaded
            )
        });
        Ok(report)
    }

    /// Run until stopped or the host tears down. Errors inside a frame are
    /// logged and the loop carries on with the next one. Returns the number
    /// of frames drawn during this run.
    pub fn run(&mut self, host: &mut dyn FrameHost) -> u64 {
        let started = self.frames_drawn;
        let mut fps = FpsCounter::new();

        log(LogCategory::Driver, LogLevel::Info, || "frame loop started".to_string());
        while !self.stop.is_stopped() {
            if !host.pump(&mut self.context()) {
                break;
            }
            // Pump may have stopped us
            if self.stop.is_stopped() {
                break;
            }

            if let Err(e) = self.step(Some(&mut *host)) {
                log(LogCategory::Render, LogLevel::Error, || {
                    format!("frame {} failed: {}", self.frames_drawn + 1, e)
                });
            }

            if let Err(e) = host.present(self.renderer.as_ref()) {
                log(LogCategory::Render, LogLevel::Error, || {
                    format!("present failed: {}", e)
                });
            }

            if let Some(rate) = fps.frame() {
                log(LogCategory::Driver, LogLevel::Info, || {
                    format!("{:.1} fps ({:?})", rate, self.state)
                });
            }
        }

        let drawn = self.frames_drawn - started;
        log(LogCategory::Driver, LogLevel::Info, || {
            format!("frame loop stopped after {} frames", drawn)
        });
        drawn
    }
}

/// Frames per second over one second windows.
struct FpsCounter {
    window_start: Instant,
    frames: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            window_start: Instant::now(),
            frames: 0,
        }
    }

    /// Count a frame; returns the rate when a window closes
    fn frame(&mut self) -> Option<f64> {
        self.frames += 1;
        let elapsed = self.window_start.elapsed();
        if elapsed < Duration::from_secs(1) {
            return None;
        }
        let rate = self.frames as f64 / elapsed.as_secs_f64();
        self.window_start = Instant::now();
        self.frames = 0;
        Some(rate)
    }
}
