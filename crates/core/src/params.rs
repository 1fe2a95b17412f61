//! Effect parameters and the named controls that edit them.

use crate::error::HalftoneError;
use crate::types::Rgb;
use serde::{Deserialize, Serialize};

/// Everything the halftone shader reads, one value per uniform.
///
/// Nothing here is range-checked. `gamma <= 0`, `dot_spacing == 0` or
/// `brightness_min >= brightness_max` produce degenerate images rather than
/// errors; keeping values sane is the job of the control ranges in
/// [`crate::store::ParameterStore`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectParameters {
    /// Grid resolution driver, in pixels of the density slider
    pub density: f32,
    pub dot_size: f32,
    pub dot_spacing: f32,
    #[serde(with = "hex_color")]
    pub dot_color: Rgb,
    pub gamma: f32,
    pub brightness_min: f32,
    pub brightness_max: f32,
    pub contrast: f32,
    pub threshold: f32,
    pub glow_radius: f32,
    pub glow_intensity: f32,
    pub color_dodge_blend: f32,
    /// Render target size; owned by the surface, so never read from config
    #[serde(skip, default = "default_resolution")]
    pub resolution: [f32; 2],
}

fn default_resolution() -> [f32; 2] {
    [640.0, 480.0]
}

impl Default for EffectParameters {
    fn default() -> Self {
        Self {
            density: 200.0,
            dot_size: 8.0,
            dot_spacing: 10.0,
            dot_color: Rgb::new(0.0, 1.0, 136.0 / 255.0),
            gamma: 1.0,
            brightness_min: 0.0,
            brightness_max: 1.0,
            contrast: 1.2,
            threshold: 0.2,
            glow_radius: 1.5,
            glow_intensity: 0.6,
            color_dodge_blend: 0.5,
            resolution: default_resolution(),
        }
    }
}

impl EffectParameters {
    /// Dots per axis: `density / dot_spacing`.
    pub fn grid_size(&self) -> f32 {
        grid_size(self.density, self.dot_spacing)
    }

    /// Read a scalar control. Returns `None` for the color control.
    pub fn scalar(&self, id: ParamId) -> Option<f32> {
        let v = match id {
            ParamId::Density => self.density,
            ParamId::DotSize => self.dot_size,
            ParamId::DotSpacing => self.dot_spacing,
            ParamId::DotColor => return None,
            ParamId::Gamma => self.gamma,
            ParamId::BrightnessMin => self.brightness_min,
            ParamId::BrightnessMax => self.brightness_max,
            ParamId::Contrast => self.contrast,
            ParamId::Threshold => self.threshold,
            ParamId::GlowRadius => self.glow_radius,
            ParamId::GlowIntensity => self.glow_intensity,
            ParamId::ColorDodgeBlend => self.color_dodge_blend,
        };
        Some(v)
    }

    /// Write a scalar control. Writing the color control is a no-op.
    pub fn set_scalar(&mut self, id: ParamId, value: f32) {
        let slot = match id {
            ParamId::Density => &mut self.density,
            ParamId::DotSize => &mut self.dot_size,
            ParamId::DotSpacing => &mut self.dot_spacing,
            ParamId::DotColor => return,
            ParamId::Gamma => &mut self.gamma,
            ParamId::BrightnessMin => &mut self.brightness_min,
            ParamId::BrightnessMax => &mut self.brightness_max,
            ParamId::Contrast => &mut self.contrast,
            ParamId::Threshold => &mut self.threshold,
            ParamId::GlowRadius => &mut self.glow_radius,
            ParamId::GlowIntensity => &mut self.glow_intensity,
            ParamId::ColorDodgeBlend => &mut self.color_dodge_blend,
        };
        *slot = value;
    }

    /// Parse a parameter file. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, HalftoneError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, HalftoneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Human readable value of a control, as a UI would display it.
    pub fn display_value(&self, id: ParamId) -> String {
        match id {
            ParamId::DotColor => format_hex(self.dot_color),
            ParamId::Density | ParamId::DotSize | ParamId::DotSpacing => {
                format!("{}", self.scalar(id).unwrap_or_default())
            }
            _ => format!("{:.2}", self.scalar(id).unwrap_or_default()),
        }
    }
}

/// `density / dot_spacing`. Must stay positive for the grid to exist.
#[inline]
pub fn grid_size(density: f32, dot_spacing: f32) -> f32 {
    density / dot_spacing
}

/// The twelve user-facing controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamId {
    Density,
    DotSize,
    DotSpacing,
    DotColor,
    Gamma,
    BrightnessMin,
    BrightnessMax,
    Contrast,
    Threshold,
    GlowRadius,
    GlowIntensity,
    ColorDodgeBlend,
}

impl ParamId {
    pub const ALL: [ParamId; 12] = [
        ParamId::Density,
        ParamId::DotSize,
        ParamId::DotSpacing,
        ParamId::DotColor,
        ParamId::Gamma,
        ParamId::BrightnessMin,
        ParamId::BrightnessMax,
        ParamId::Contrast,
        ParamId::Threshold,
        ParamId::GlowRadius,
        ParamId::GlowIntensity,
        ParamId::ColorDodgeBlend,
    ];

    /// Control identifier, as used on the command line and in config files
    pub fn name(&self) -> &'static str {
        match self {
            ParamId::Density => "density",
            ParamId::DotSize => "dotSize",
            ParamId::DotSpacing => "dotSpacing",
            ParamId::DotColor => "dotColor",
            ParamId::Gamma => "gamma",
            ParamId::BrightnessMin => "brightnessMin",
            ParamId::BrightnessMax => "brightnessMax",
            ParamId::Contrast => "contrast",
            ParamId::Threshold => "threshold",
            ParamId::GlowRadius => "glowRadius",
            ParamId::GlowIntensity => "glowIntensity",
            ParamId::ColorDodgeBlend => "colorDodgeBlend",
        }
    }

    /// Uniform this control feeds
    pub fn uniform(&self) -> &'static str {
        match self {
            ParamId::Density => "uDensity",
            ParamId::DotSize => "uDotSize",
            ParamId::DotSpacing => "uDotSpacing",
            ParamId::DotColor => "uDotColor",
            ParamId::Gamma => "uGamma",
            ParamId::BrightnessMin => "uBrightnessMin",
            ParamId::BrightnessMax => "uBrightnessMax",
            ParamId::Contrast => "uContrast",
            ParamId::Threshold => "uThreshold",
            ParamId::GlowRadius => "uGlowRadius",
            ParamId::GlowIntensity => "uGlowIntensity",
            ParamId::ColorDodgeBlend => "uColorDodgeBlend",
        }
    }

    /// Accepts the control name (`dotSize`), its snake_case form
    /// (`dot_size`) or its uniform name (`uDotSize`).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        let folded: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        ParamId::ALL.into_iter().find(|id| {
            id.name().to_lowercase() == folded || id.uniform().to_lowercase() == folded
        })
    }

    pub fn is_color(&self) -> bool {
        matches!(self, ParamId::DotColor)
    }
}

/// Decode `#rrggbb` (leading `#` optional) into normalized RGB.
pub fn parse_hex_color(s: &str) -> Result<Rgb, HalftoneError> {
    let hex = s.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(HalftoneError::InvalidColor(s.to_string()));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map(|v| v as f32 / 255.0)
            .map_err(|_| HalftoneError::InvalidColor(s.to_string()))
    };
    Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}

pub fn format_hex(c: Rgb) -> String {
    let argb = c.to_argb();
    format!("#{:06x}", argb & 0x00FF_FFFF)
}

mod hex_color {
    use super::{format_hex, parse_hex_color};
    use crate::types::Rgb;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(c: &Rgb, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format_hex(*c))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Rgb, D::Error> {
        let s = String::deserialize(d)?;
        parse_hex_color(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_size() {
        let p = EffectParameters::default();
        assert_eq!(p.grid_size(), 20.0);
    }

    #[test]
    fn test_single_cell_grid() {
        let p = EffectParameters {
            density: 20.0,
            dot_spacing: 20.0,
            ..Default::default()
        };
        assert_eq!(p.grid_size(), 1.0);
    }

    #[test]
    fn test_hex_color_parsing() {
        let c = parse_hex_color("#ff8000").unwrap();
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);

        assert_eq!(parse_hex_color("FFFFFF").unwrap(), Rgb::WHITE);
        assert!(parse_hex_color("#fff").is_err());
        assert!(parse_hex_color("#gg0000").is_err());
        assert!(parse_hex_color("").is_err());
    }

    #[test]
    fn test_hex_color_format() {
        assert_eq!(format_hex(Rgb::new(1.0, 0.0, 0.0)), "#ff0000");
        assert_eq!(format_hex(EffectParameters::default().dot_color), "#00ff88");
    }

    #[test]
    fn test_param_lookup_by_any_name() {
        assert_eq!(ParamId::from_str("dotSize"), Some(ParamId::DotSize));
        assert_eq!(ParamId::from_str("dot_size"), Some(ParamId::DotSize));
        assert_eq!(ParamId::from_str("uDotSize"), Some(ParamId::DotSize));
        assert_eq!(
            ParamId::from_str("color-dodge-blend"),
            Some(ParamId::ColorDodgeBlend)
        );
        assert_eq!(ParamId::from_str("sharpness"), None);
    }

    #[test]
    fn test_scalar_accessors_cover_every_numeric_control() {
        let mut p = EffectParameters::default();
        for (i, id) in ParamId::ALL.into_iter().enumerate() {
            if id.is_color() {
                assert_eq!(p.scalar(id), None);
                continue;
            }
            p.set_scalar(id, i as f32 + 0.5);
            assert_eq!(p.scalar(id), Some(i as f32 + 0.5));
        }
    }

    #[test]
    fn test_serialization_uses_hex_color_and_skips_resolution() {
        let mut p = EffectParameters::default();
        p.resolution = [1920.0, 1080.0];
        let json = serde_json::to_value(p).unwrap();
        assert_eq!(json["dot_color"], "#00ff88");
        assert!(json.get("resolution").is_none());

        let back: EffectParameters = serde_json::from_value(json).unwrap();
        assert_eq!(back.resolution, [640.0, 480.0]);
        assert_eq!(back.dot_color, p.dot_color);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let p = EffectParameters::from_json(r#"{"gamma": 2.2}"#).unwrap();
        assert_eq!(p.gamma, 2.2);
        assert_eq!(p.density, 200.0);
    }

    #[test]
    fn test_bad_json_is_a_typed_error() {
        assert!(matches!(
            EffectParameters::from_json(r#"{"dot_color": "green"}"#),
            Err(HalftoneError::Json(_))
        ));
        assert!(EffectParameters::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_pretty_json_round_trips() {
        let p = EffectParameters {
            contrast: 2.5,
            ..Default::default()
        };
        let json = p.to_json_pretty().unwrap();
        assert!(json.contains("\"contrast\": 2.5"));
        assert_eq!(EffectParameters::from_json(&json).unwrap(), p);
    }
}
