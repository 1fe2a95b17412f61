//! GLSL built-ins the fragment program relies on, with GLSL semantics.

/// Hermite interpolation between two edges, `t*t*(3-2t)`.
///
/// Reversed edges (`edge0 > edge1`) give a falling curve, as in GLSL. Equal
/// edges are undefined in GLSL; here they behave as a hard step at the edge.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 == edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linear blend `x * (1 - a) + y * a`. `a` is not clamped.
#[inline]
pub fn mix(x: f32, y: f32, a: f32) -> f32 {
    x * (1.0 - a) + y * a
}

#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}
