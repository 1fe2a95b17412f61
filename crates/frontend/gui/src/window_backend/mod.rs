//! Window backend abstraction
//!
//! A backend owns the OS window: it collects keyboard events and shows what
//! the halftone renderer drew. SDL2 is the only implementation; it runs
//! either a plain software canvas or an OpenGL context.

use halftone_core::HalftoneRenderer;
use std::error::Error;

mod sdl2_backend;

pub use sdl2_backend::Sdl2Backend;

/// Keys the halftone controls react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    F1,
    Up,
    Down,
    Left,
    Right,
    Escape,
    Enter,
    Space,
    Tab,
    LeftShift,
    RightShift,
    LeftBracket,
    RightBracket,
}

/// Window backend trait
pub trait WindowBackend {
    /// Check if window is still open
    fn is_open(&self) -> bool;

    /// Check if a key is currently held
    fn is_key_down(&self, key: Key) -> bool;

    /// Keys pressed since the last [`poll_events`](Self::poll_events), in
    /// order, repeats excluded
    fn keys_pressed(&self) -> &[Key];

    /// Show the renderer's latest draw
    fn present(&mut self, renderer: &dyn HalftoneRenderer) -> Result<(), Box<dyn Error>>;

    /// Drawable size in pixels
    fn get_size(&self) -> (u32, u32);

    /// Process pending window events
    fn poll_events(&mut self);

    fn set_title(&mut self, title: &str) -> Result<(), Box<dyn Error>>;

    /// Get the backend name (for debugging)
    fn name(&self) -> &str;

    fn is_shift_down(&self) -> bool {
        self.is_key_down(Key::LeftShift) || self.is_key_down(Key::RightShift)
    }
}
