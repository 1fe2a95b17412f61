//! Texture lookups for the CPU reference path.
//!
//! The GPU texture is configured with NEAREST filtering and CLAMP_TO_EDGE
//! wrapping; [`Frame`] samples the same way so both paths agree.

use crate::types::{Frame, Rgb, Vec2};

pub trait TextureSampler {
    /// Color at `uv`, with (0,0) the first pixel of the first row.
    fn sample(&self, uv: Vec2) -> Rgb;
}

impl TextureSampler for Frame {
    #[inline]
    fn sample(&self, uv: Vec2) -> Rgb {
        // Nothing uploaded yet reads as black, like an unbound GL texture
        if self.is_empty() {
            return Rgb::BLACK;
        }
        let x = texel(uv.x, self.width);
        let y = texel(uv.y, self.height);
        Rgb::from_argb(self.pixel(x, y))
    }
}

/// A texture of one color, handy for tests and previews.
#[derive(Debug, Clone, Copy)]
pub struct Solid(pub Rgb);

impl TextureSampler for Solid {
    fn sample(&self, _uv: Vec2) -> Rgb {
        self.0
    }
}

#[inline]
fn texel(coord: f32, extent: u32) -> u32 {
    let i = (coord * extent as f32).floor();
    if i.is_nan() || i < 0.0 {
        0
    } else {
        (i as u32).min(extent - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Frame {
        // 2x2: red, green / blue, white
        Frame {
            width: 2,
            height: 2,
            pixels: vec![0xFFFF0000, 0xFF00FF00, 0xFF0000FF, 0xFFFFFFFF],
        }
    }

    #[test]
    fn test_nearest_lookup() {
        let f = checker();
        assert_eq!(f.sample(Vec2::new(0.25, 0.25)), Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(f.sample(Vec2::new(0.75, 0.25)), Rgb::new(0.0, 1.0, 0.0));
        assert_eq!(f.sample(Vec2::new(0.25, 0.75)), Rgb::new(0.0, 0.0, 1.0));
        assert_eq!(f.sample(Vec2::new(0.75, 0.75)), Rgb::WHITE);
    }

    #[test]
    fn test_clamp_to_edge() {
        let f = checker();
        assert_eq!(f.sample(Vec2::new(-3.0, -0.1)), Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(f.sample(Vec2::new(1.0, 1.0)), Rgb::WHITE);
        assert_eq!(f.sample(Vec2::new(7.5, 0.1)), Rgb::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_empty_texture_is_black() {
        assert_eq!(Frame::new(0, 0).sample(Vec2::new(0.5, 0.5)), Rgb::BLACK);
    }
}
