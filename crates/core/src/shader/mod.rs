//! The halftone fragment program, stage by stage.
//!
//! This is the CPU twin of `fragment_halftone.glsl` in the GUI crate. Each
//! fragment goes through a fixed sequence of pure stages that read and write
//! one [`FragmentContext`]:
//!
//! ```text
//! sample (5 taps) -> detail -> contrast -> distance -> dot -> glow
//!                 -> composite -> visibility
//! ```
//!
//! The order is load-bearing: every stage consumes what the previous one
//! wrote. [`STAGES`] lists everything after sampling; [`shade_fragment`]
//! runs the whole program.

pub mod brightness;
pub mod detail;
pub mod dot;
pub mod grid;
pub mod math;
pub mod texture;

use crate::params::EffectParameters;
use crate::types::{Rgb, Vec2};
use brightness::BrightnessCurve;
use grid::{CellSample, Grid};
use math::{mix, smoothstep};
use texture::TextureSampler;

/// Everything derived from the uniforms once per frame rather than once per
/// fragment.
#[derive(Debug, Clone, Copy)]
pub struct FrameConstants {
    pub params: EffectParameters,
    pub grid: Grid,
    pub curve: BrightnessCurve,
    /// Dot radius in normalized cell distance
    pub radius: f32,
}

impl FrameConstants {
    pub fn new(params: &EffectParameters) -> Self {
        Self {
            params: *params,
            grid: Grid::from_params(params),
            curve: BrightnessCurve::from_params(params),
            radius: dot::dot_radius(params.dot_size, params.dot_spacing),
        }
    }
}

/// Per-fragment scratch record shared by the stages.
#[derive(Debug, Clone, Copy, Default)]
pub struct FragmentContext {
    pub uv: Vec2,
    pub cell: CellSample,
    /// Left, right, up, down
    pub neighbours: [f32; 4],
    pub brightness: f32,
    pub dist: f32,
    pub dot: f32,
    pub glow: f32,
    pub color: Rgb,
    pub opacity: f32,
    pub visibility: f32,
}

impl FragmentContext {
    /// Quantize `uv` and take the five brightness taps.
    pub fn sample<T: TextureSampler + ?Sized>(
        texture: &T,
        uv: Vec2,
        consts: &FrameConstants,
    ) -> Self {
        let cell = consts.grid.quantize(uv);
        let curve = &consts.curve;
        let taps = consts.grid.neighbours(cell.center);
        Self {
            uv,
            cell,
            neighbours: taps.map(|p| curve.brightness(texture.sample(p))),
            brightness: curve.brightness(texture.sample(cell.center)),
            ..Default::default()
        }
    }
}

pub type Stage = fn(&mut FragmentContext, &FrameConstants);

pub const STAGES: [(&str, Stage); 7] = [
    ("detail", enhance_detail),
    ("contrast", contrast_threshold),
    ("distance", radial_distance),
    ("dot", dot_shape),
    ("glow", glow),
    ("composite", composite),
    ("visibility", visibility_gate),
];

pub fn enhance_detail(ctx: &mut FragmentContext, _: &FrameConstants) {
    ctx.brightness = detail::enhance(ctx.brightness, ctx.neighbours);
}

pub fn contrast_threshold(ctx: &mut FragmentContext, c: &FrameConstants) {
    ctx.brightness = dot::apply_contrast(ctx.brightness, c.params.contrast, c.params.threshold);
}

pub fn radial_distance(ctx: &mut FragmentContext, _: &FrameConstants) {
    ctx.dist = ctx.cell.offset.length();
}

pub fn dot_shape(ctx: &mut FragmentContext, c: &FrameConstants) {
    ctx.dot = dot::dot_coverage(ctx.dist, c.radius);
}

pub fn glow(ctx: &mut FragmentContext, c: &FrameConstants) {
    ctx.glow = dot::two_layer_glow(
        ctx.dist,
        ctx.brightness,
        c.radius,
        c.params.glow_radius,
        c.params.glow_intensity,
    );
}

pub fn composite(ctx: &mut FragmentContext, c: &FrameConstants) {
    let base = c.params.dot_color;
    let b = ctx.brightness;
    ctx.opacity = ctx.dot + ctx.glow * (1.0 - ctx.dot);

    let glow_color = base * (b + ctx.glow * 0.5);
    let blend = smoothstep(0.0, 1.0, b * c.params.color_dodge_blend);
    let dodged = dot::color_dodge(base, glow_color);
    let color = base.zip(dodged, |x, y| mix(x, y, blend));

    ctx.color = color * (1.0 + ctx.glow * b * 0.5);
}

pub fn visibility_gate(ctx: &mut FragmentContext, c: &FrameConstants) {
    ctx.visibility = dot::visibility(ctx.brightness, c.params.threshold);
    ctx.opacity *= ctx.visibility;
}

/// Shader output for one fragment, before blending.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub color: Rgb,
    pub alpha: f32,
}

impl Fragment {
    /// `SRC_ALPHA, ONE_MINUS_SRC_ALPHA` blend over an opaque background.
    /// Color and alpha are clamped first, as a fixed-point target would.
    pub fn over(self, background: Rgb) -> Rgb {
        let a = self.alpha.clamp(0.0, 1.0);
        let src = self.color.map(|c| c.clamp(0.0, 1.0));
        src * a + background * (1.0 - a)
    }
}

/// Run the whole program for the fragment at `uv`.
pub fn shade_fragment<T: TextureSampler + ?Sized>(
    texture: &T,
    uv: Vec2,
    consts: &FrameConstants,
) -> Fragment {
    let ctx = run_stages(FragmentContext::sample(texture, uv, consts), consts);
    Fragment {
        color: ctx.color,
        alpha: ctx.opacity,
    }
}

pub fn run_stages(mut ctx: FragmentContext, consts: &FrameConstants) -> FragmentContext {
    for (_, stage) in STAGES {
        stage(&mut ctx, consts);
    }
    ctx
}

/// Vertex stage: clip-space quad corner to texture UV, rotated 180 degrees.
#[inline]
pub fn quad_uv(clip: Vec2) -> Vec2 {
    Vec2::new(1.0 - (clip.x * 0.5 + 0.5), 1.0 - (clip.y * 0.5 + 0.5))
}

/// Interpolated UV at the center of output pixel (`x`, `y`), row 0 at the
/// top of the surface.
#[inline]
pub fn pixel_uv(x: u32, y: u32, width: u32, height: u32) -> Vec2 {
    let clip = Vec2::new(
        (x as f32 + 0.5) / width as f32 * 2.0 - 1.0,
        1.0 - (y as f32 + 0.5) / height as f32 * 2.0,
    );
    quad_uv(clip)
}
