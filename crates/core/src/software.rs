//! CPU reference renderer.
//!
//! Runs the halftone program from [`crate::shader`] once per output pixel.
//! Parameters arrive through the same uniform protocol a GL program uses,
//! and texture sampling mirrors NEAREST/CLAMP_TO_EDGE, so the output is what
//! the GPU path draws up to float rounding.

use crate::error::RenderResult;
use crate::logging::{log, LogCategory, LogLevel};
use crate::params::EffectParameters;
use crate::renderer::HalftoneRenderer;
use crate::shader::{pixel_uv, shade_fragment, FrameConstants};
use crate::types::{Frame, Rgb};
use crate::uniforms::UniformSink;

/// Clear color behind the dots
pub const CLEAR_COLOR: Rgb = Rgb::BLACK;

pub struct SoftwareRenderer {
    texture: Frame,
    uniforms: EffectParameters,
    output: Frame,
}

impl SoftwareRenderer {
    pub fn new() -> Self {
        Self {
            texture: Frame::new(0, 0),
            uniforms: EffectParameters::default(),
            output: Frame::new(0, 0),
        }
    }

    /// Parameters as last received through the uniform sink
    pub fn uniform_state(&self) -> &EffectParameters {
        &self.uniforms
    }

    pub fn texture(&self) -> &Frame {
        &self.texture
    }

    /// Render one row of the output into `row`.
    fn shade_row(&self, consts: &FrameConstants, y: u32, row: &mut [u32]) {
        let (w, h) = (self.output.width, self.output.height);
        for (x, px) in row.iter_mut().enumerate() {
            let uv = pixel_uv(x as u32, y, w, h);
            *px = shade_fragment(&self.texture, uv, consts)
                .over(CLEAR_COLOR)
                .to_argb();
        }
    }
}

impl Default for SoftwareRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HalftoneRenderer for SoftwareRenderer {
    fn init(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.output = Frame::filled(width, height, CLEAR_COLOR.to_argb());
        Ok(())
    }

    fn upload_frame(&mut self, frame: &Frame) -> RenderResult<()> {
        frame.validate()?;
        if frame.width != self.texture.width || frame.height != self.texture.height {
            log(LogCategory::Render, LogLevel::Debug, || {
                format!("texture now {}x{}", frame.width, frame.height)
            });
        }
        self.texture.clone_from(frame);
        Ok(())
    }

    fn uniforms(&mut self) -> &mut dyn UniformSink {
        &mut self.uniforms
    }

    fn draw(&mut self) -> RenderResult<()> {
        if self.output.is_empty() {
            return Ok(());
        }
        let consts = FrameConstants::new(&self.uniforms);
        let width = self.output.width as usize;
        let mut pixels = std::mem::take(&mut self.output.pixels);
        for (y, row) in pixels.chunks_exact_mut(width).enumerate() {
            self.shade_row(&consts, y as u32, row);
        }
        self.output.pixels = pixels;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        if (width, height) != self.size() {
            self.output = Frame::filled(width, height, CLEAR_COLOR.to_argb());
        }
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        (self.output.width, self.output.height)
    }

    fn output(&self) -> Option<&Frame> {
        Some(&self.output)
    }

    fn name(&self) -> &str {
        "Software Renderer"
    }
}
