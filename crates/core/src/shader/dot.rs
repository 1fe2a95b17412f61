//! Dot shape, glow falloff and the blend helpers used when compositing.

use super::math::smoothstep;
use crate::types::Rgb;

/// Width of the antialiased rim of a dot, in normalized cell distance
pub const DOT_RIM: f32 = 0.01;

/// Inner glow reaches this fraction of the outer glow radius
pub const INNER_GLOW_SCALE: f32 = 0.7;

/// Outer glow is emitted at this fraction of the glow intensity
pub const OUTER_GLOW_INTENSITY: f32 = 0.5;

/// Dot radius in normalized cell distance.
#[inline]
pub fn dot_radius(dot_size: f32, dot_spacing: f32) -> f32 {
    (dot_size / dot_spacing) * 0.5
}

/// Coverage of the hard-edged disk: 1 inside, 0 outside, thin smooth rim.
#[inline]
pub fn dot_coverage(dist: f32, radius: f32) -> f32 {
    1.0 - smoothstep(radius - DOT_RIM, radius, dist)
}

/// Squared radial falloff scaled by intensity and squared brightness.
/// Zero for `dist >= radius`.
#[inline]
pub fn create_glow(dist: f32, brightness: f32, radius: f32, intensity: f32) -> f32 {
    let falloff = smoothstep(radius, 0.0, dist);
    falloff.powi(2) * intensity * brightness.powi(2)
}

/// Inner plus outer glow around a dot of `radius`.
#[inline]
pub fn two_layer_glow(
    dist: f32,
    brightness: f32,
    radius: f32,
    glow_radius: f32,
    glow_intensity: f32,
) -> f32 {
    let outer_radius = radius * glow_radius;
    let inner = create_glow(
        dist,
        brightness,
        outer_radius * INNER_GLOW_SCALE,
        glow_intensity,
    );
    let outer = create_glow(
        dist,
        brightness,
        outer_radius,
        glow_intensity * OUTER_GLOW_INTENSITY,
    );
    inner + outer
}

/// Color dodge `base / (1 - blend)`, capped at 1 per channel.
#[inline]
pub fn color_dodge(base: Rgb, blend: Rgb) -> Rgb {
    base.zip(blend, |b, s| (b / (1.0 - s)).min(1.0))
}

/// Contrast around the threshold, clamped to [0,1].
#[inline]
pub fn apply_contrast(brightness: f32, contrast: f32, threshold: f32) -> f32 {
    ((brightness - threshold) * contrast + threshold).clamp(0.0, 1.0)
}

/// Soft gate hiding dots whose brightness sits below the threshold.
#[inline]
pub fn visibility(brightness: f32, threshold: f32) -> f32 {
    smoothstep(threshold - 0.1, threshold + 0.1, brightness)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_coverage_inside_and_outside() {
        let radius = 0.4;
        for i in 0..=100 {
            let d = i as f32 / 100.0 * (radius - DOT_RIM);
            assert_eq!(dot_coverage(d, radius), 1.0, "dist {}", d);
        }
        for i in 0..=100 {
            let d = radius + i as f32 / 50.0;
            assert_eq!(dot_coverage(d, radius), 0.0, "dist {}", d);
        }
        let rim = dot_coverage(radius - DOT_RIM / 2.0, radius);
        assert!(rim > 0.0 && rim < 1.0);
    }

    #[test]
    fn test_glow_zero_beyond_radius() {
        assert_eq!(create_glow(0.5, 1.0, 0.5, 1.0), 0.0);
        assert_eq!(create_glow(0.9, 1.0, 0.5, 2.0), 0.0);
        assert_eq!(create_glow(0.0, 1.0, 0.5, 2.0), 2.0);
    }

    #[test]
    fn test_glow_monotonic_in_distance() {
        for &b in &[0.2_f32, 0.7, 1.0] {
            let mut prev = create_glow(0.0, b, 0.8, 1.3);
            for i in 1..=200 {
                let g = create_glow(i as f32 / 100.0, b, 0.8, 1.3);
                assert!(g <= prev, "glow rose at dist {}", i as f32 / 100.0);
                prev = g;
            }
        }
    }

    #[test]
    fn test_glow_monotonic_in_brightness() {
        for &d in &[0.0_f32, 0.2, 0.5, 0.79] {
            let mut prev = create_glow(d, 0.0, 0.8, 1.3);
            for i in 1..=100 {
                let g = create_glow(d, i as f32 / 100.0, 0.8, 1.3);
                assert!(g >= prev);
                prev = g;
            }
        }
    }

    #[test]
    fn test_two_layer_glow_sums_layers() {
        let r = 0.4;
        let at_center = two_layer_glow(0.0, 1.0, r, 1.5, 0.6);
        assert!((at_center - (0.6 + 0.3)).abs() < 1e-6);
        // Past the inner radius only the outer layer remains
        let d = r * 1.5 * 0.8;
        let only_outer = two_layer_glow(d, 1.0, r, 1.5, 0.6);
        assert!((only_outer - create_glow(d, 1.0, r * 1.5, 0.3)).abs() < 1e-6);
        assert_eq!(two_layer_glow(r * 1.5, 1.0, r, 1.5, 0.6), 0.0);
    }

    #[test]
    fn test_color_dodge_bounds() {
        let base = Rgb::new(0.2, 0.6, 1.0);
        assert_eq!(color_dodge(base, Rgb::BLACK), base);
        for i in 0..=20 {
            let s = i as f32 / 20.0;
            let out = color_dodge(base, Rgb::splat(s));
            assert!(out.r <= 1.0 && out.g <= 1.0 && out.b <= 1.0);
            assert!(out.r >= base.r && out.g >= base.g);
        }
        assert_eq!(color_dodge(base, Rgb::WHITE), Rgb::WHITE);
    }

    #[test]
    fn test_contrast_pivots_on_threshold() {
        assert_eq!(apply_contrast(0.5, 3.0, 0.5), 0.5);
        assert!((apply_contrast(0.6, 2.0, 0.5) - 0.7).abs() < 1e-6);
        assert_eq!(apply_contrast(2.0, 1.0, 0.5), 1.0);
        assert_eq!(apply_contrast(0.1, 4.0, 0.5), 0.0);
    }

    #[test]
    fn test_visibility_gate() {
        assert_eq!(visibility(0.0, 0.5), 0.0);
        assert_eq!(visibility(0.4, 0.5), 0.0);
        assert!((visibility(0.5, 0.5) - 0.5).abs() < 1e-6);
        assert_eq!(visibility(0.6, 0.5), 1.0);
        assert_eq!(visibility(1.0, 0.5), 1.0);
    }
}
