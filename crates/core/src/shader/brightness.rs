//! Perceptual brightness of a texture sample.

use super::math::smoothstep;
use crate::params::EffectParameters;
use crate::types::Rgb;

/// Rec. 601 luma weights
pub const LUMA_WEIGHTS: Rgb = Rgb::new(0.299, 0.587, 0.114);

#[inline]
pub fn luma(color: Rgb) -> f32 {
    color.dot(LUMA_WEIGHTS)
}

/// Gamma plus S-curve applied to luma.
///
/// `gamma` must be positive. Luma at or below `min` maps to 0, at or above
/// `max` maps to 1, with cubic smoothing in between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrightnessCurve {
    pub gamma: f32,
    pub min: f32,
    pub max: f32,
}

impl BrightnessCurve {
    pub fn from_params(params: &EffectParameters) -> Self {
        Self {
            gamma: params.gamma,
            min: params.brightness_min,
            max: params.brightness_max,
        }
    }

    #[inline]
    pub fn brightness(&self, color: Rgb) -> f32 {
        self.shape(luma(color))
    }

    /// Curve applied to an already computed luma value.
    #[inline]
    pub fn shape(&self, luma: f32) -> f32 {
        smoothstep(self.min, self.max, luma.powf(self.gamma))
    }
}

impl Default for BrightnessCurve {
    fn default() -> Self {
        Self::from_params(&EffectParameters::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(gamma: f32, min: f32, max: f32) -> BrightnessCurve {
        BrightnessCurve { gamma, min, max }
    }

    #[test]
    fn test_luma_weights_sum_to_one() {
        assert!((luma(Rgb::WHITE) - 1.0).abs() < 1e-6);
        assert_eq!(luma(Rgb::BLACK), 0.0);
        assert!(luma(Rgb::new(0.0, 1.0, 0.0)) > luma(Rgb::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_curve_clamps_outside_window() {
        let c = curve(1.0, 0.2, 0.8);
        assert_eq!(c.shape(0.1), 0.0);
        assert_eq!(c.shape(0.2), 0.0);
        assert_eq!(c.shape(0.8), 1.0);
        assert_eq!(c.shape(0.95), 1.0);
        assert!((c.shape(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_gamma_darkens_midtones() {
        let linear = curve(1.0, 0.0, 1.0);
        let gamma = curve(2.2, 0.0, 1.0);
        assert!(gamma.shape(0.5) < linear.shape(0.5));
        assert_eq!(gamma.shape(1.0), 1.0);
        assert_eq!(gamma.shape(0.0), 0.0);
    }

    #[test]
    fn test_brightness_is_monotonic_in_input() {
        for &gamma in &[0.25_f32, 0.5, 1.0, 1.8, 3.0] {
            for &(min, max) in &[(0.0_f32, 1.0_f32), (0.1, 0.9), (0.4, 0.6)] {
                let c = curve(gamma, min, max);
                let mut prev = c.brightness(Rgb::BLACK);
                for i in 1..=256 {
                    let v = i as f32 / 256.0;
                    let b = c.brightness(Rgb::splat(v));
                    assert!(
                        b >= prev,
                        "not monotonic at {} (gamma {}, window {}..{})",
                        v,
                        gamma,
                        min,
                        max
                    );
                    assert!((0.0..=1.0).contains(&b));
                    prev = b;
                }
            }
        }
    }
}
