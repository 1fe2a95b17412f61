//! Maps continuous UV space onto the dot grid.

use super::math::fract;
use crate::params::{grid_size, EffectParameters};
use crate::types::Vec2;

/// Where a fragment falls on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellSample {
    /// UV of the center of the fragment's cell
    pub center: Vec2,
    /// Aspect-corrected offset from the cell center, scaled so the cell edge
    /// sits at 1.0 on the vertical axis
    pub offset: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    size: f32,
    aspect: f32,
}

impl Grid {
    /// `density / dot_spacing` cells per axis. Both the grid size and the
    /// resolution height must be positive.
    pub fn new(density: f32, dot_spacing: f32, resolution: [f32; 2]) -> Self {
        Self {
            size: grid_size(density, dot_spacing),
            aspect: resolution[0] / resolution[1],
        }
    }

    pub fn from_params(params: &EffectParameters) -> Self {
        Self::new(params.density, params.dot_spacing, params.resolution)
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// One cell in UV units, the step used to reach the neighbours.
    #[inline]
    pub fn cell_step(&self) -> f32 {
        1.0 / self.size
    }

    /// Integer (column, row) of the cell containing `uv`.
    #[inline]
    pub fn cell_of(&self, uv: Vec2) -> (i32, i32) {
        (
            (uv.x * self.size).floor() as i32,
            (uv.y * self.size).floor() as i32,
        )
    }

    #[inline]
    pub fn quantize(&self, uv: Vec2) -> CellSample {
        let sx = uv.x * self.size;
        let sy = uv.y * self.size;
        let center = Vec2::new(
            (sx.floor() + 0.5) / self.size,
            (sy.floor() + 0.5) / self.size,
        );
        let offset = Vec2::new(
            (fract(sx) - 0.5) * self.aspect * 2.0,
            (fract(sy) - 0.5) * 2.0,
        );
        CellSample { center, offset }
    }

    /// Sample points of the left, right, up and down neighbours of a cell
    /// center, in that order.
    #[inline]
    pub fn neighbours(&self, center: Vec2) -> [Vec2; 4] {
        let d = self.cell_step();
        [
            Vec2::new(center.x - d, center.y),
            Vec2::new(center.x + d, center.y),
            Vec2::new(center.x, center.y - d),
            Vec2::new(center.x, center.y + d),
        ]
    }
}
