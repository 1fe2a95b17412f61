//! Halftone GUI library
//!
//! The windowed frontend: camera capture, SDL2 window backends, the OpenGL
//! halftone renderer and the keyboard control panel. The frame loop itself
//! lives in `halftone_core`.

pub mod app;
pub mod camera;
pub mod controls;
pub mod settings;
pub mod video_processor;
pub mod window_backend;
