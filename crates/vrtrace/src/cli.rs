//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use vrtrace::{CameraMode, Config, HeadMotion, ShadeMode, VerticalConvention};

/// Ray-traced stereo rendering for head-mounted displays.
#[derive(Parser, Debug)]
#[command(name = "vrtrace", version, about)]
pub struct Cli {
    /// OBJ mesh to render
    pub mesh: PathBuf,

    /// JSON config file; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Camera mode (mono, stereo-offaxis, stereo-fixed)
    #[arg(long)]
    pub mode: Option<CameraMode>,

    /// Multiplier on the headset's recommended per-eye resolution
    #[arg(long)]
    pub render_scale: Option<f32>,

    /// Vertical sign convention of the headset's raw projection
    #[arg(long, value_enum)]
    pub vertical_convention: Option<ConventionArg>,

    /// Hit shading
    #[arg(long, value_enum, default_value = "eyelight")]
    pub shade: ShadeArg,

    /// Stop after this many frames
    #[arg(long)]
    pub frames: Option<u64>,

    /// Write a preview image of the combined texture to this file
    #[arg(long)]
    pub preview: Option<PathBuf>,

    /// Write the preview every this many frames
    #[arg(long)]
    pub preview_every: Option<u32>,

    /// Simulated head motion
    #[arg(long, value_enum)]
    pub motion: Option<MotionArg>,

    /// Pace the simulated headset to its refresh rate
    #[arg(long)]
    pub pace: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConventionArg {
    Standard,
    Swapped,
}

impl From<ConventionArg> for VerticalConvention {
    fn from(arg: ConventionArg) -> Self {
        match arg {
            ConventionArg::Standard => VerticalConvention::Standard,
            ConventionArg::Swapped => VerticalConvention::Swapped,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShadeArg {
    Normal,
    Eyelight,
}

impl From<ShadeArg> for ShadeMode {
    fn from(arg: ShadeArg) -> Self {
        match arg {
            ShadeArg::Normal => ShadeMode::Normal,
            ShadeArg::Eyelight => ShadeMode::EyeLight,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionArg {
    Static,
    Orbit,
    Sway,
}

impl From<MotionArg> for HeadMotion {
    fn from(arg: MotionArg) -> Self {
        match arg {
            MotionArg::Static => HeadMotion::Static,
            MotionArg::Orbit => HeadMotion::Orbit {
                radius: 1.0,
                period_seconds: 10.0,
            },
            MotionArg::Sway => HeadMotion::Sway {
                amplitude_degrees: 20.0,
                period_seconds: 4.0,
            },
        }
    }
}

impl Cli {
    /// Applies flag overrides on top of a loaded config.
    pub fn apply(&self, config: &mut Config) {
        let options = &mut config.options;
        if let Some(mode) = self.mode {
            options.camera_mode = mode;
        }
        if let Some(scale) = self.render_scale {
            options.render_scale = scale;
        }
        if let Some(convention) = self.vertical_convention {
            options.vertical_convention = convention.into();
        }
        if let Some(frames) = self.frames {
            options.max_frames = Some(frames);
        }
        if let Some(path) = &self.preview {
            options.preview.enabled = true;
            options.preview.path = path.display().to_string();
        }
        if let Some(every) = self.preview_every {
            options.preview.every_n_frames = every;
        }

        let headset = &mut config.headset;
        if let Some(motion) = self.motion {
            headset.motion = motion.into();
        }
        if self.pace {
            headset.pace_to_refresh = true;
        }
    }
}
