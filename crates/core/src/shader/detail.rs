//! Edge-aware detail boost.

use super::math::mix;

/// Sum of absolute brightness differences to the four neighbours.
#[inline]
pub fn neighbour_diff(center: f32, neighbours: [f32; 4]) -> f32 {
    neighbours.iter().map(|n| (center - n).abs()).sum()
}

/// Pushes `center` toward white by half the neighbour difference.
///
/// The blend factor is not clamped: with strong edges `diff * 0.5` exceeds 1
/// and the result overshoots past 1.0. The contrast stage clamps it later.
#[inline]
pub fn enhance(center: f32, neighbours: [f32; 4]) -> f32 {
    mix(center, 1.0, neighbour_diff(center, neighbours) * 0.5)
}
