//! The parameter store: owns the live [`EffectParameters`] and is the one
//! place controls are edited.
//!
//! Every accepted edit marks the store dirty; the frame driver then pushes
//! the full uniform set on its next tick through [`ParameterStore::sync`].

use crate::error::HalftoneError;
use crate::logging::{log, LogCategory, LogLevel};
use crate::params::{parse_hex_color, EffectParameters, ParamId};
use crate::uniforms::{sync_uniforms, UniformSink};
use serde::{Deserialize, Serialize};

/// Slider range for one scalar control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ControlRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    pub fn clamp(&self, v: f32) -> f32 {
        v.clamp(self.min, self.max)
    }

    /// Default range for `id`; `None` for the color control.
    pub fn for_param(id: ParamId) -> Option<Self> {
        let r = match id {
            ParamId::Density => DensityRange::default().as_range(),
            ParamId::DotSize | ParamId::DotSpacing => Self::new(1.0, 40.0, 1.0),
            ParamId::DotColor => return None,
            ParamId::Gamma => Self::new(0.1, 3.0, 0.1),
            ParamId::BrightnessMin | ParamId::BrightnessMax | ParamId::Threshold => {
                Self::new(0.0, 1.0, 0.01)
            }
            ParamId::Contrast => Self::new(0.0, 3.0, 0.1),
            ParamId::GlowRadius => Self::new(0.0, 4.0, 0.1),
            ParamId::GlowIntensity => Self::new(0.0, 2.0, 0.05),
            ParamId::ColorDodgeBlend => Self::new(0.0, 1.0, 0.05),
        };
        Some(r)
    }
}

/// The density slider's own bounds, editable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl Default for DensityRange {
    fn default() -> Self {
        Self {
            min: 20.0,
            max: 400.0,
            step: 10.0,
        }
    }
}

impl DensityRange {
    pub fn as_range(&self) -> ControlRange {
        ControlRange::new(self.min, self.max, self.step)
    }
}

#[derive(Debug, Clone)]
pub struct ParameterStore {
    params: EffectParameters,
    density: DensityRange,
    dirty: bool,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(EffectParameters::default())
    }
}

impl ParameterStore {
    /// A store holding `params`. Starts dirty so the first tick uploads.
    pub fn new(params: EffectParameters) -> Self {
        Self {
            params,
            density: DensityRange::default(),
            dirty: true,
        }
    }

    pub fn with_density_range(mut self, range: DensityRange) -> Self {
        self.set_density_range(range.min, range.max, range.step);
        self
    }

    pub fn params(&self) -> &EffectParameters {
        &self.params
    }

    pub fn density_range(&self) -> DensityRange {
        self.density
    }

    /// Range for a scalar control, honouring the live density bounds.
    pub fn range(&self, id: ParamId) -> Option<ControlRange> {
        match id {
            ParamId::Density => Some(self.density.as_range()),
            _ => ControlRange::for_param(id),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Parse and apply a control value.
    ///
    /// Scalars accept anything `f32` parses that is finite; the color takes
    /// `#rrggbb`. The value is not range-checked. On error the store is left
    /// untouched.
    pub fn set(&mut self, id: ParamId, value: &str) -> Result<(), HalftoneError> {
        if id.is_color() {
            self.params.dot_color = parse_hex_color(value)?;
        } else {
            let v = value
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| HalftoneError::InvalidNumber {
                    param: id.name(),
                    value: value.to_string(),
                })?;
            self.params.set_scalar(id, v);
        }
        log(LogCategory::Params, LogLevel::Debug, || {
            format!("{} = {}", id.name(), self.params.display_value(id))
        });
        self.dirty = true;
        Ok(())
    }

    /// [`set`](Self::set) by control name, as typed on a command line.
    pub fn set_by_name(&mut self, name: &str, value: &str) -> Result<(), HalftoneError> {
        let id =
            ParamId::from_str(name).ok_or_else(|| HalftoneError::UnknownParameter(name.into()))?;
        self.set(id, value)
    }

    /// Replace every control at once (config load, CLI `--params`).
    /// Resolution is kept.
    pub fn replace(&mut self, params: EffectParameters) {
        let resolution = self.params.resolution;
        self.params = EffectParameters {
            resolution,
            ..params
        };
        self.dirty = true;
    }

    /// Reshape the density slider. The current density is clamped into the
    /// new bounds. Always forces a resync, even when density is unchanged.
    pub fn set_density_range(&mut self, min: f32, max: f32, step: f32) {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.density = DensityRange { min, max, step };
        self.params.density = self.params.density.clamp(min, max);
        log(LogCategory::Params, LogLevel::Debug, || {
            format!(
                "density range {}..{} step {}, density {}",
                min, max, step, self.params.density
            )
        });
        self.dirty = true;
    }

    /// `"{g} x {g} ({density}px)"` where g is the whole number of dots per
    /// axis.
    pub fn density_label(&self) -> String {
        let g = self.params.grid_size().floor();
        format!("{} x {} ({}px)", g, g, self.params.density)
    }

    /// Step a scalar control by one slider step in `direction` (sign only),
    /// clamped to its range. Returns `false` for the color control.
    pub fn nudge(&mut self, id: ParamId, direction: i32) -> bool {
        let (Some(range), Some(current)) = (self.range(id), self.params.scalar(id)) else {
            return false;
        };
        // A zero or NaN step would poison the value
        if range.step.is_nan() || range.step <= 0.0 {
            return false;
        }
        let delta = range.step * direction.signum() as f32;
        // Snap to the step grid so repeated nudges don't accumulate error
        let stepped = ((current + delta - range.min) / range.step).round() * range.step + range.min;
        self.params.set_scalar(id, range.clamp(stepped));
        log(LogCategory::Params, LogLevel::Debug, || {
            format!("{} -> {}", id.name(), self.params.display_value(id))
        });
        self.dirty = true;
        true
    }

    /// Record the render target size.
    pub fn set_resolution(&mut self, width: u32, height: u32) {
        let res = [width as f32, height as f32];
        if self.params.resolution != res {
            self.params.resolution = res;
            self.dirty = true;
        }
    }

    /// Push the full uniform set to `sink` and clear the dirty flag.
    pub fn sync(&mut self, sink: &mut dyn UniformSink) -> usize {
        let n = sync_uniforms(&self.params, sink);
        self.dirty = false;
        log(LogCategory::Params, LogLevel::Trace, || {
            format!("synced {} uniforms", n)
        });
        n
    }
}
