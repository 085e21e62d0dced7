//! Configuration options for the stereo pipeline.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VrTraceError};
use crate::frustum::VerticalConvention;

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// How the two eye cameras are derived from the head pose.
    pub camera_mode: CameraMode,

    /// Multiplier applied to the display's recommended per-eye resolution.
    pub render_scale: f32,

    /// Background color for rays that miss the scene (linear 0..1).
    pub background_color: Vec3,

    /// Sign convention of the display's raw vertical tangents.
    pub vertical_convention: VerticalConvention,

    /// Parameters for [`CameraMode::Mono`].
    pub mono: MonoOptions,

    /// Parameters for [`CameraMode::StereoFixed`].
    pub fixed_stereo: FixedStereoOptions,

    /// Preview image output.
    pub preview: PreviewOptions,

    /// Stop after this many frames (unlimited when `None`).
    pub max_frames: Option<u64>,

    /// Log a timing summary every this many frames (0 = never).
    pub stats_interval_frames: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            camera_mode: CameraMode::StereoOffAxis,
            render_scale: 0.7,
            background_color: Vec3::splat(0.05),
            vertical_convention: VerticalConvention::Swapped,
            mono: MonoOptions::default(),
            fixed_stereo: FixedStereoOptions::default(),
            preview: PreviewOptions::default(),
            max_frames: None,
            stats_interval_frames: 90,
        }
    }
}

impl Options {
    /// Checks that all values are in range.
    pub fn validate(&self) -> Result<()> {
        if !(self.render_scale > 0.0 && self.render_scale <= 4.0) {
            return Err(VrTraceError::InvalidOption {
                name: "render_scale",
                reason: format!("{} is outside (0, 4]", self.render_scale),
            });
        }
        for fov in [
            self.mono.fov_vertical_degrees,
            self.fixed_stereo.fov_vertical_degrees,
        ] {
            if !(fov > 0.0 && fov < 180.0) {
                return Err(VrTraceError::InvalidOption {
                    name: "fov_vertical_degrees",
                    reason: format!("{fov} is outside (0, 180)"),
                });
            }
        }
        if self.preview.enabled {
            if self.preview.width == 0 || self.preview.height == 0 {
                return Err(VrTraceError::InvalidOption {
                    name: "preview",
                    reason: "preview size must be non-zero".to_string(),
                });
            }
            if self.preview.every_n_frames == 0 {
                return Err(VrTraceError::InvalidOption {
                    name: "preview.every_n_frames",
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Selects how per-eye cameras are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CameraMode {
    /// One head-centered camera with a symmetric frustum, shown to both eyes.
    #[serde(rename = "mono")]
    Mono,
    /// Per-eye offsets and asymmetric frustums from the display intrinsics.
    #[default]
    #[serde(rename = "stereo-offaxis")]
    StereoOffAxis,
    /// Hardcoded per-eye look directions with a symmetric perspective frustum.
    #[serde(rename = "stereo-fixed")]
    StereoFixed,
}

impl CameraMode {
    /// All modes, for help text.
    pub const ALL: [CameraMode; 3] = [
        CameraMode::Mono,
        CameraMode::StereoOffAxis,
        CameraMode::StereoFixed,
    ];

    /// Returns the configuration name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            CameraMode::Mono => "mono",
            CameraMode::StereoOffAxis => "stereo-offaxis",
            CameraMode::StereoFixed => "stereo-fixed",
        }
    }
}

impl std::fmt::Display for CameraMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for CameraMode {
    type Err = VrTraceError;

    fn from_str(s: &str) -> Result<Self> {
        CameraMode::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| VrTraceError::InvalidOption {
                name: "camera_mode",
                reason: format!(
                    "unknown mode '{s}', expected one of: {}",
                    CameraMode::ALL.map(CameraMode::name).join(", ")
                ),
            })
    }
}

/// Settings for the mono camera mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonoOptions {
    /// Vertical field of view in degrees.
    pub fov_vertical_degrees: f32,
}

impl Default for MonoOptions {
    fn default() -> Self {
        Self {
            fov_vertical_degrees: 110.0,
        }
    }
}

/// Settings for the fixed-direction stereo mode.
///
/// Defaults are look directions read off a first-generation Vive's
/// projection matrices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedStereoOptions {
    /// Head-space look direction per eye (left, right).
    pub eye_dirs: [Vec3; 2],
    /// Head-to-eye offset shared by both eyes, before the IPD split.
    pub eye_offset: Vec3,
    /// Interpupillary distance in meters, split evenly along head +X.
    pub interpupillary_distance: f32,
    /// Vertical field of view in degrees.
    pub fov_vertical_degrees: f32,
}

impl Default for FixedStereoOptions {
    fn default() -> Self {
        Self {
            eye_dirs: [
                Vec3::new(1.315 * -0.057_285_6, -0.001_841_59, -1.0101),
                Vec3::new(1.315 * 0.056_089_9, -0.001_489_7, -1.0101),
            ],
            eye_offset: Vec3::new(0.0, 0.0, 0.015),
            interpupillary_distance: 0.0635,
            fov_vertical_degrees: 111.26,
        }
    }
}

/// Preview image written from the combined side-by-side texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewOptions {
    /// Whether to write preview images at all.
    pub enabled: bool,
    /// Output file (png or jpg).
    pub path: String,
    /// Preview width in pixels.
    pub width: u32,
    /// Preview height in pixels.
    pub height: u32,
    /// Write the preview every this many frames.
    pub every_n_frames: u32,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            path: "preview.png".to_string(),
            width: 640,
            height: 360,
            every_n_frames: 30,
        }
    }
}
