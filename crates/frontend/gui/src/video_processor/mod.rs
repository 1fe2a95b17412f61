//! Video backend selection
//!
//! Two renderers implement [`halftone_core::HalftoneRenderer`]:
//!
//! - **Software**: the CPU reference renderer from the core crate, shown
//!   through an SDL2 streaming texture. Always available.
//! - **OpenGL**: the GLSL program drawn straight into the window. Needs the
//!   `opengl` feature and a GL 3.3 core context.
//!
//! Both take the same uniform set, so switching backends does not change
//! the picture beyond floating point noise.

#[cfg(feature = "opengl")]
mod opengl;
#[cfg(feature = "opengl")]
pub use opengl::{argb_to_rgba, OpenGLProcessor};

/// Which renderer to create for the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoBackend {
    Software,
    OpenGL,
}

impl VideoBackend {
    /// Parse a settings or command-line value. Unknown names give `None`.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "software" | "cpu" => Some(VideoBackend::Software),
            "opengl" | "gl" => Some(VideoBackend::OpenGL),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoBackend::Software => "software",
            VideoBackend::OpenGL => "opengl",
        }
    }

    /// Whether this build can create the backend
    pub fn is_available(&self) -> bool {
        match self {
            VideoBackend::Software => true,
            VideoBackend::OpenGL => cfg!(feature = "opengl"),
        }
    }
}

impl Default for VideoBackend {
    fn default() -> Self {
        if VideoBackend::OpenGL.is_available() {
            VideoBackend::OpenGL
        } else {
            VideoBackend::Software
        }
    }
}
