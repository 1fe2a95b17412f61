//! Renderer trait for halftone backends
//!
//! A backend owns a texture holding the latest video frame, a uniform slot
//! per effect parameter and an output surface. The frame driver calls it in
//! a fixed order every tick:
//!
//! ```text
//! sync_parameters (when dirty) -> upload_frame (when new) -> draw
//! ```
//!
//! Two implementations exist: the CPU reference [`crate::SoftwareRenderer`]
//! here and the OpenGL processor in the GUI crate. Both consume parameters
//! through the same [`UniformSink`] protocol, so they stay interchangeable.

use crate::error::RenderResult;
use crate::store::ParameterStore;
use crate::types::Frame;
use crate::uniforms::UniformSink;

pub trait HalftoneRenderer {
    /// Prepare the output surface. Called once before the first draw.
    fn init(&mut self, width: u32, height: u32) -> RenderResult<()>;

    /// Replace the bound texture with `frame`.
    fn upload_frame(&mut self, frame: &Frame) -> RenderResult<()>;

    /// Where uniforms go; the parameter store pushes the full set into it.
    fn uniforms(&mut self) -> &mut dyn UniformSink;

    /// Push the full uniform set from `store`. Returns how many were written.
    fn sync_parameters(&mut self, store: &mut ParameterStore) -> usize {
        store.sync(self.uniforms())
    }

    /// Clear to opaque black and draw one full-surface quad with the
    /// halftone program, blending `SRC_ALPHA, ONE_MINUS_SRC_ALPHA`.
    fn draw(&mut self) -> RenderResult<()>;

    /// Resize the output surface.
    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()>;

    fn size(&self) -> (u32, u32);

    /// Size of the surface the output is presented in. Backends drawing
    /// straight to the window use it to center their viewport.
    fn set_window_size(&mut self, _width: u32, _height: u32) {}

    /// Last drawn image, for backends that render into CPU memory.
    fn output(&self) -> Option<&Frame> {
        None
    }

    /// Name of this renderer (for debugging/UI)
    fn name(&self) -> &str;

    fn is_hardware_accelerated(&self) -> bool {
        false
    }
}
