//! Core halftone primitives and traits.
//!
//! Everything in this crate is independent of any GPU or windowing API: the
//! shader stages are plain functions, so the same math drives the CPU
//! reference renderer and documents what the GLSL program does.

pub mod error;
pub mod fit;
pub mod frame_driver;
pub mod logging;
pub mod params;
pub mod renderer;
pub mod shader;
pub mod software;
pub mod source;
pub mod store;
pub mod uniforms;

pub mod types {
    use serde::{Deserialize, Serialize};
    use std::ops::{Add, Mul, Sub};

    /// A decoded video frame, pixels in 0xAARRGGBB.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Frame {
        pub width: u32,
        pub height: u32,
        pub pixels: Vec<u32>,
    }

    impl Frame {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                pixels: vec![0; (width * height) as usize],
            }
        }

        /// A frame filled with one color.
        pub fn filled(width: u32, height: u32, argb: u32) -> Self {
            Self {
                width,
                height,
                pixels: vec![argb; (width * height) as usize],
            }
        }

        pub fn is_empty(&self) -> bool {
            self.width == 0 || self.height == 0
        }

        /// Fails when the pixel buffer does not hold exactly
        /// `width * height` pixels.
        pub fn validate(&self) -> crate::RenderResult<()> {
            let expected = self.width as usize * self.height as usize;
            if self.pixels.len() != expected {
                return Err(crate::HalftoneError::render(format!(
                    "frame {}x{} carries {} pixels, expected {}",
                    self.width,
                    self.height,
                    self.pixels.len(),
                    expected
                )));
            }
            Ok(())
        }

        #[inline]
        pub fn pixel(&self, x: u32, y: u32) -> u32 {
            self.pixels[(y * self.width + x) as usize]
        }
    }

    /// Linear RGB triple, nominally in [0,1] per channel.
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct Rgb {
        pub r: f32,
        pub g: f32,
        pub b: f32,
    }

    impl Rgb {
        pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
        pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

        pub const fn new(r: f32, g: f32, b: f32) -> Self {
            Self { r, g, b }
        }

        pub const fn splat(v: f32) -> Self {
            Self { r: v, g: v, b: v }
        }

        /// Unpack the RGB channels of a 0xAARRGGBB pixel; alpha is ignored.
        #[inline]
        pub fn from_argb(pixel: u32) -> Self {
            Self {
                r: ((pixel >> 16) & 0xFF) as f32 / 255.0,
                g: ((pixel >> 8) & 0xFF) as f32 / 255.0,
                b: (pixel & 0xFF) as f32 / 255.0,
            }
        }

        /// Pack into an opaque 0xFFRRGGBB pixel, clamping each channel.
        #[inline]
        pub fn to_argb(self) -> u32 {
            let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
            0xFF00_0000 | (q(self.r) << 16) | (q(self.g) << 8) | q(self.b)
        }

        #[inline]
        pub fn dot(self, other: Rgb) -> f32 {
            self.r * other.r + self.g * other.g + self.b * other.b
        }

        #[inline]
        pub fn map(self, f: impl Fn(f32) -> f32) -> Self {
            Self::new(f(self.r), f(self.g), f(self.b))
        }

        #[inline]
        pub fn zip(self, other: Rgb, f: impl Fn(f32, f32) -> f32) -> Self {
            Self::new(f(self.r, other.r), f(self.g, other.g), f(self.b, other.b))
        }

        pub fn to_array(self) -> [f32; 3] {
            [self.r, self.g, self.b]
        }
    }

    impl Add for Rgb {
        type Output = Rgb;
        fn add(self, rhs: Rgb) -> Rgb {
            self.zip(rhs, |a, b| a + b)
        }
    }

    impl Sub for Rgb {
        type Output = Rgb;
        fn sub(self, rhs: Rgb) -> Rgb {
            self.zip(rhs, |a, b| a - b)
        }
    }

    impl Mul<f32> for Rgb {
        type Output = Rgb;
        fn mul(self, rhs: f32) -> Rgb {
            self.map(|c| c * rhs)
        }
    }

    /// 2D vector for UV coordinates and cell offsets.
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct Vec2 {
        pub x: f32,
        pub y: f32,
    }

    impl Vec2 {
        pub const fn new(x: f32, y: f32) -> Self {
            Self { x, y }
        }

        #[inline]
        pub fn length(self) -> f32 {
            (self.x * self.x + self.y * self.y).sqrt()
        }
    }
}

pub use error::{HalftoneError, RenderResult};
pub use fit::fit_to_aspect;
pub use frame_driver::{DriverState, FrameDriver, FrameHost, HostContext, StopHandle, TickReport};
pub use params::{EffectParameters, ParamId};
pub use renderer::HalftoneRenderer;
pub use software::SoftwareRenderer;
pub use source::{NullSource, StillSource, VideoSource};
pub use store::{DensityRange, ParameterStore};
pub use uniforms::{UniformSink, UniformValue};
