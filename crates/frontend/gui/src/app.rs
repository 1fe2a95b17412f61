//! The windowed host for the frame loop.

use crate::controls::{report, ControlAction, ControlPanel};
use crate::window_backend::WindowBackend;
use halftone_core::logging::{log, LogCategory, LogLevel};
use halftone_core::{FrameHost, HalftoneError, HalftoneRenderer, HostContext, RenderResult, StopHandle};

/// Ties a window to the frame driver: forwards key presses to the control
/// panel, keeps the render surface fitted to the window and presents each
/// drawn frame.
pub struct App<W: WindowBackend> {
    window: W,
    panel: ControlPanel,
    stop: StopHandle,
    /// Window size the surface was last fitted to
    fitted_to: Option<(u32, u32)>,
    title: String,
}

impl<W: WindowBackend> App<W> {
    pub fn new(window: W, stop: StopHandle) -> Self {
        Self {
            window,
            panel: ControlPanel::new(),
            stop,
            fitted_to: None,
            title: String::new(),
        }
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut W {
        &mut self.window
    }

    pub fn panel(&self) -> &ControlPanel {
        &self.panel
    }

    fn refit(&mut self, ctx: &mut HostContext<'_>, window: (u32, u32)) {
        match ctx.refit(window) {
            Ok(_) => self.fitted_to = Some(window),
            Err(e) => log(LogCategory::Render, LogLevel::Error, || {
                format!("resize to {}x{} failed: {}", window.0, window.1, e)
            }),
        }
    }

    fn update_title(&mut self, ctx: &HostContext<'_>) {
        let title = self.panel.title(&*ctx.store);
        if title == self.title {
            return;
        }
        if let Err(e) = self.window.set_title(&title) {
            log(LogCategory::Render, LogLevel::Warn, || {
                format!("set title failed: {}", e)
            });
        }
        self.title = title;
    }
}

impl<W: WindowBackend> FrameHost for App<W> {
    fn pump(&mut self, ctx: &mut HostContext<'_>) -> bool {
        self.window.poll_events();
        if !self.window.is_open() {
            return false;
        }

        let shift = self.window.is_shift_down();
        let keys = self.window.keys_pressed().to_vec();
        for key in keys {
            match self.panel.handle_key(key, shift, ctx.store) {
                ControlAction::Quit => {
                    log(LogCategory::Driver, LogLevel::Info, || {
                        "escape pressed, stopping".to_string()
                    });
                    self.stop.stop();
                    return false;
                }
                ControlAction::Report => println!("{}", report(&*ctx.store)),
                ControlAction::Changed | ControlAction::Selected | ControlAction::None => {}
            }
        }

        let size = self.window.get_size();
        if self.fitted_to != Some(size) {
            self.refit(ctx, size);
        }

        self.update_title(ctx);
        true
    }

    fn present(&mut self, renderer: &dyn HalftoneRenderer) -> RenderResult<()> {
        self.window
            .present(renderer)
            .map_err(|e| HalftoneError::render(e.to_string()))
    }

    fn on_source_resized(&mut self, ctx: &mut HostContext<'_>) {
        if let Some(window) = self.fitted_to {
            self.refit(ctx, window);
        }
    }
}
