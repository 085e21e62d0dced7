//! Run configuration: pipeline options plus simulated headset settings.

use std::path::Path;

use serde::{Deserialize, Serialize};
use vrtrace_core::{Options, Result};
use vrtrace_hmd::HeadsetConfig;

/// Everything a run needs besides the mesh.
///
/// Loaded from JSON; missing fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub options: Options,
    pub headset: HeadsetConfig,
}

impl Config {
    /// Parses a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks both the pipeline options and the headset settings.
    pub fn validate(&self) -> Result<()> {
        self.options.validate()?;
        self.headset.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vrtrace_core::{CameraMode, VerticalConvention};
    use vrtrace_hmd::HeadMotion;

    #[test]
    fn test_empty_json_is_default() {
        let config = Config::from_json_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.options.render_scale, 0.7);
        assert_eq!(config.options.camera_mode, CameraMode::StereoOffAxis);
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_json_str(
            r#"{
                "options": { "camera_mode": "stereo-fixed", "vertical_convention": "standard" },
                "headset": { "motion": { "type": "sway", "amplitude_degrees": 20.0, "period_seconds": 3.0 } }
            }"#,
        )
        .unwrap();
        assert_eq!(config.options.camera_mode, CameraMode::StereoFixed);
        assert_eq!(
            config.options.vertical_convention,
            VerticalConvention::Standard
        );
        assert!(matches!(config.headset.motion, HeadMotion::Sway { .. }));
        assert_eq!(config.options.preview.width, 640);
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = Config::default();
        config.options.max_frames = Some(12);
        config.headset.quit_after_frames = Some(3);
        let text = config.to_json_string().unwrap();
        assert_eq!(Config::from_json_str(&text).unwrap(), config);
    }

    #[test]
    fn test_validate_reports_headset_errors() {
        let mut config = Config::default();
        config.headset.refresh_rate_hz = -1.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("refresh_rate_hz"));
    }

    #[test]
    fn test_bad_json() {
        assert!(Config::from_json_str("{ not json").is_err());
    }
}
