//! Uniform upload protocol.
//!
//! Every sync pushes the complete set: the twelve control uniforms followed
//! by `uResolution`. There is no incremental path; the set is small and
//! changes at UI pace, not per frame.

use crate::params::{EffectParameters, ParamId};

pub const RESOLUTION_UNIFORM: &str = "uResolution";

/// Number of uniforms written by [`sync_uniforms`]
pub const UNIFORM_COUNT: usize = ParamId::ALL.len() + 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
}

/// Anything that accepts named shader uniforms.
///
/// Names the sink does not know are ignored, matching GL's behaviour for
/// uniforms the compiler optimized away.
pub trait UniformSink {
    fn set_uniform(&mut self, name: &str, value: UniformValue);
}

/// The full uniform set for `params`, in upload order.
pub fn uniform_values(params: &EffectParameters) -> [(&'static str, UniformValue); UNIFORM_COUNT] {
    let float = |id: ParamId| {
        (
            id.uniform(),
            UniformValue::Float(params.scalar(id).unwrap_or_default()),
        )
    };
    [
        float(ParamId::Density),
        float(ParamId::DotSize),
        float(ParamId::DotSpacing),
        (
            ParamId::DotColor.uniform(),
            UniformValue::Vec3(params.dot_color.to_array()),
        ),
        float(ParamId::Gamma),
        float(ParamId::BrightnessMin),
        float(ParamId::BrightnessMax),
        float(ParamId::Contrast),
        float(ParamId::Threshold),
        float(ParamId::GlowRadius),
        float(ParamId::GlowIntensity),
        float(ParamId::ColorDodgeBlend),
        (RESOLUTION_UNIFORM, UniformValue::Vec2(params.resolution)),
    ]
}

/// Push every uniform to `sink`. Returns how many were written.
pub fn sync_uniforms(params: &EffectParameters, sink: &mut dyn UniformSink) -> usize {
    let values = uniform_values(params);
    for (name, value) in values {
        sink.set_uniform(name, value);
    }
    values.len()
}

/// Receiving side for the CPU path: rebuilds parameters from uniforms, so
/// the software renderer consumes exactly what a GL program would.
impl UniformSink for EffectParameters {
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        match (name, value) {
            (RESOLUTION_UNIFORM, UniformValue::Vec2(v)) => self.resolution = v,
            (_, UniformValue::Vec3([r, g, b])) if name == ParamId::DotColor.uniform() => {
                self.dot_color = crate::types::Rgb::new(r, g, b);
            }
            (_, UniformValue::Float(v)) => {
                if let Some(id) = ParamId::ALL
                    .into_iter()
                    .find(|id| !id.is_color() && id.uniform() == name)
                {
                    self.set_scalar(id, v);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgb;

    #[derive(Default)]
    struct RecordingSink {
        writes: Vec<(String, UniformValue)>,
    }

    impl UniformSink for RecordingSink {
        fn set_uniform(&mut self, name: &str, value: UniformValue) {
            self.writes.push((name.to_string(), value));
        }
    }

    #[test]
    fn test_sync_writes_every_uniform_once() {
        let mut sink = RecordingSink::default();
        let n = sync_uniforms(&EffectParameters::default(), &mut sink);
        assert_eq!(n, 13);
        assert_eq!(sink.writes.len(), 13);

        let names: Vec<&str> = sink.writes.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            [
                "uDensity",
                "uDotSize",
                "uDotSpacing",
                "uDotColor",
                "uGamma",
                "uBrightnessMin",
                "uBrightnessMax",
                "uContrast",
                "uThreshold",
                "uGlowRadius",
                "uGlowIntensity",
                "uColorDodgeBlend",
                "uResolution",
            ]
        );
    }

    #[test]
    fn test_repeated_sync_is_full_not_incremental() {
        let mut sink = RecordingSink::default();
        let params = EffectParameters::default();
        sync_uniforms(&params, &mut sink);
        sync_uniforms(&params, &mut sink);
        assert_eq!(sink.writes.len(), 2 * UNIFORM_COUNT);
    }

    #[test]
    fn test_parameters_rebuild_from_uniforms() {
        let source = EffectParameters {
            density: 123.0,
            dot_color: Rgb::new(0.25, 0.5, 0.75),
            glow_intensity: 1.75,
            resolution: [1280.0, 720.0],
            ..Default::default()
        };
        let mut target = EffectParameters {
            density: 1.0,
            gamma: 9.0,
            ..Default::default()
        };
        sync_uniforms(&source, &mut target);
        assert_eq!(target, source);
    }

    #[test]
    fn test_unknown_uniform_is_ignored() {
        let mut p = EffectParameters::default();
        p.set_uniform("uTime", UniformValue::Float(3.0));
        p.set_uniform("uDensity", UniformValue::Vec2([1.0, 2.0]));
        assert_eq!(p, EffectParameters::default());
    }
}
