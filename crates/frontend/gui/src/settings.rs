use halftone_core::logging::{log, LogCategory, LogLevel};
use halftone_core::store::DensityRange;
use halftone_core::EffectParameters;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Capture request handed to the camera. The device may pick something
/// close instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub index: u32,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            index: 0,
            width: 640,
            height: 480,
            fps: 30,
        }
    }
}

/// Start-up configuration, read from `config.json` next to the executable.
/// Never written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window_width: u32,
    pub window_height: u32,
    pub camera: CameraSettings,
    /// "software" or "opengl"
    pub video_backend: String,
    /// Control values at start-up
    pub effect: EffectParameters,
    pub density_range: DensityRange,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: 960,
            window_height: 720,
            camera: CameraSettings::default(),
            video_backend: "opengl".to_string(),
            effect: EffectParameters::default(),
            density_range: DensityRange::default(),
        }
    }
}

impl Settings {
    /// Get the config file path relative to the executable
    pub fn config_path() -> PathBuf {
        let mut path = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));
        path.push("config.json");
        path
    }

    /// Load settings from config.json, falling back to defaults on error
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    log(LogCategory::Params, LogLevel::Warn, || {
                        format!(
                            "failed to parse {}: {}. Using defaults.",
                            path.display(),
                            e
                        )
                    });
                    Self::default()
                }
            },
            // Missing file is the normal case
            Err(_) => Self::default(),
        }
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width.max(1), self.window_height.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.window_size(), (960, 720));
        assert_eq!(settings.camera.index, 0);
        assert_eq!(settings.video_backend, "opengl");
        assert_eq!(settings.effect, EffectParameters::default());
        assert_eq!(settings.density_range, DensityRange::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let json = r##"{
            "camera": { "index": 2 },
            "video_backend": "software",
            "effect": { "dot_color": "#ff00ff", "glow_intensity": 1.25 }
        }"##;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.camera.index, 2);
        assert_eq!(settings.camera.fps, 30);
        assert_eq!(settings.video_backend, "software");
        assert_eq!(settings.effect.glow_intensity, 1.25);
        assert_eq!(settings.effect.dot_color.g, 0.0);
        assert_eq!(settings.effect.density, 200.0);
        assert_eq!(settings.window_width, 960);
    }

    #[test]
    fn test_settings_load_from_file() {
        let test_dir = std::env::temp_dir().join("halftone_test_settings");
        fs::create_dir_all(&test_dir).unwrap();
        let test_config = test_dir.join("config.json");

        let settings = Settings {
            window_width: 1280,
            density_range: DensityRange {
                min: 40.0,
                max: 200.0,
                step: 20.0,
            },
            ..Default::default()
        };
        fs::write(&test_config, serde_json::to_string_pretty(&settings).unwrap()).unwrap();

        let loaded = Settings::load_from(&test_config);
        assert_eq!(loaded, settings);

        fs::remove_dir_all(&test_dir).unwrap();
    }

    #[test]
    fn test_malformed_or_missing_config_uses_defaults() {
        let test_dir = std::env::temp_dir().join("halftone_test_settings_bad");
        fs::create_dir_all(&test_dir).unwrap();
        let bad = test_dir.join("config.json");
        fs::write(&bad, "{ not json").unwrap();

        assert_eq!(Settings::load_from(&bad), Settings::default());
        assert_eq!(
            Settings::load_from(&test_dir.join("missing.json")),
            Settings::default()
        );

        fs::remove_dir_all(&test_dir).unwrap();
    }
}
