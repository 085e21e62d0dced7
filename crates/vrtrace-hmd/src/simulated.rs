//! Simulated headset.
//!
//! Stands in for a VR runtime: Vive-like optics, a scripted head motion
//! sampled at the refresh rate, optional real-time pacing, and a bounded
//! record of recently submitted eye textures.

use std::collections::VecDeque;
use std::f32::consts::TAU;
use std::time::{Duration, Instant};

use glam::{Quat, UVec2, Vec3};
use serde::{Deserialize, Serialize};
use vrtrace_core::{Eye, Pose};
use vrtrace_render::ResolveTarget;

use crate::display::{Compositor, DisplayBackend, DisplayEvent, PoseSource};
use crate::error::{HmdError, HmdResult};
use crate::intrinsics::{EyeIntrinsics, RawProjection};

/// Scripted head motion, evaluated at `frame / refresh_rate` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HeadMotion {
    /// Head stays at the start position looking down -Z.
    #[default]
    Static,
    /// Head circles the start position at `radius`, always facing it.
    Orbit { radius: f32, period_seconds: f32 },
    /// Head yaws back and forth by up to `amplitude_degrees`.
    Sway {
        amplitude_degrees: f32,
        period_seconds: f32,
    },
}

impl HeadMotion {
    /// Head pose at `time_seconds` around `center`.
    #[must_use]
    pub fn pose_at(&self, center: Vec3, time_seconds: f32) -> Pose {
        match *self {
            HeadMotion::Static => Pose::from_translation(center),
            HeadMotion::Orbit {
                radius,
                period_seconds,
            } => {
                let angle = TAU * time_seconds / period_seconds;
                let position = center + radius * Vec3::new(angle.sin(), 0.0, angle.cos());
                Pose::from_rotation_translation(Quat::from_rotation_y(angle), position)
            }
            HeadMotion::Sway {
                amplitude_degrees,
                period_seconds,
            } => {
                let yaw = amplitude_degrees.to_radians() * (TAU * time_seconds / period_seconds).sin();
                Pose::from_rotation_translation(Quat::from_rotation_y(yaw), center)
            }
        }
    }

    fn period(&self) -> Option<f32> {
        match *self {
            HeadMotion::Static => None,
            HeadMotion::Orbit { period_seconds, .. } | HeadMotion::Sway { period_seconds, .. } => {
                Some(period_seconds)
            }
        }
    }
}

/// Settings of the simulated headset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadsetConfig {
    /// Reported recommended render size per eye.
    pub render_size: UVec2,
    /// Display refresh rate, used for motion timing and pacing.
    pub refresh_rate_hz: f32,
    /// Sleep in `wait_get_pose` until the next simulated vsync.
    pub pace_to_refresh: bool,
    /// Distance between the two eye centers in meters.
    pub interpupillary_distance: f32,
    /// Left eye raw projection; the right eye uses its mirror image.
    pub projection: RawProjection,
    /// Head position at frame zero.
    pub start_position: Vec3,
    pub motion: HeadMotion,
    /// Emit [`DisplayEvent::Quit`] once this many poses have been served.
    pub quit_after_frames: Option<u64>,
    /// Number of most recent submissions kept for inspection.
    pub submission_history: usize,
}

impl Default for HeadsetConfig {
    fn default() -> Self {
        Self {
            render_size: UVec2::new(1512, 1680),
            refresh_rate_hz: 90.0,
            pace_to_refresh: false,
            interpupillary_distance: 0.0636,
            projection: RawProjection::new(-1.39, 1.25, -1.47, 1.46),
            start_position: Vec3::ZERO,
            motion: HeadMotion::Static,
            quit_after_frames: None,
            submission_history: 64,
        }
    }
}

impl HeadsetConfig {
    /// Checks that all values are in range.
    pub fn validate(&self) -> HmdResult<()> {
        if self.render_size.x == 0 || self.render_size.y == 0 {
            return Err(HmdError::InvalidConfig {
                name: "render_size",
                reason: "must be non-zero".to_string(),
            });
        }
        if !(self.refresh_rate_hz > 0.0 && self.refresh_rate_hz.is_finite()) {
            return Err(HmdError::InvalidConfig {
                name: "refresh_rate_hz",
                reason: format!("{} is not a positive rate", self.refresh_rate_hz),
            });
        }
        if self.interpupillary_distance.is_nan() || self.interpupillary_distance < 0.0 {
            return Err(HmdError::InvalidConfig {
                name: "interpupillary_distance",
                reason: format!("{} is negative", self.interpupillary_distance),
            });
        }
        if let Some(period) = self.motion.period() {
            if period.is_nan() || period <= 0.0 {
                return Err(HmdError::InvalidConfig {
                    name: "motion.period_seconds",
                    reason: format!("{period} is not positive"),
                });
            }
        }
        Ok(())
    }
}

/// One texture handed to the simulated compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    pub eye: Eye,
    /// Pose count at submit time, i.e. the frame this texture belongs to.
    pub pose_index: u64,
    /// Resolve counter of the submitted texture.
    pub texture_frame: u64,
    pub size: UVec2,
}

/// In-process headset implementing every display trait.
#[derive(Debug)]
pub struct SimulatedHmd {
    config: HeadsetConfig,
    poses_served: u64,
    tracking: bool,
    quit_sent: bool,
    pending: Vec<DisplayEvent>,
    submissions: VecDeque<Submission>,
    submitted: u64,
    next_vsync: Option<Instant>,
}

impl SimulatedHmd {
    pub fn new(config: HeadsetConfig) -> HmdResult<Self> {
        config.validate()?;
        log::info!(
            "simulated headset: {}x{} per eye at {} Hz, motion {:?}",
            config.render_size.x,
            config.render_size.y,
            config.refresh_rate_hz,
            config.motion
        );
        let history = config.submission_history;
        Ok(Self {
            config,
            poses_served: 0,
            tracking: true,
            quit_sent: false,
            pending: Vec::new(),
            submissions: VecDeque::with_capacity(history),
            submitted: 0,
            next_vsync: None,
        })
    }

    pub fn config(&self) -> &HeadsetConfig {
        &self.config
    }

    pub fn poses_served(&self) -> u64 {
        self.poses_served
    }

    /// The last `submission_history` submissions, oldest first.
    pub fn submissions(&self) -> &VecDeque<Submission> {
        &self.submissions
    }

    /// Total textures submitted since creation.
    pub fn submitted(&self) -> u64 {
        self.submitted
    }

    /// Simulates tracking loss or recovery.
    pub fn set_tracking(&mut self, tracking: bool) {
        if self.tracking != tracking {
            self.tracking = tracking;
            self.pending.push(DisplayEvent::TrackingChanged { tracking });
        }
    }

    /// Queues a quit request, as a user pressing Escape would.
    pub fn request_quit(&mut self) {
        self.pending.push(DisplayEvent::Quit);
        self.quit_sent = true;
    }

    fn frame_interval(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.config.refresh_rate_hz)
    }

    fn pace(&mut self) {
        let interval = self.frame_interval();
        let now = Instant::now();
        let deadline = *self.next_vsync.get_or_insert(now);
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
        self.next_vsync = Some(deadline.max(now) + interval);
    }
}

impl PoseSource for SimulatedHmd {
    #[allow(clippy::cast_precision_loss)]
    fn wait_get_pose(&mut self) -> HmdResult<Pose> {
        if !self.tracking {
            return Err(HmdError::NotTracking);
        }
        if self.config.pace_to_refresh {
            self.pace();
        }
        let time = self.poses_served as f32 / self.config.refresh_rate_hz;
        self.poses_served += 1;
        Ok(self.config.motion.pose_at(self.config.start_position, time))
    }
}

impl Compositor for SimulatedHmd {
    fn submit(&mut self, eye: Eye, texture: &ResolveTarget) -> HmdResult<()> {
        if texture.eye() != eye {
            return Err(HmdError::Submit {
                eye,
                reason: format!("texture belongs to the {} eye", texture.eye()),
            });
        }
        if texture.frame() == 0 {
            return Err(HmdError::Submit {
                eye,
                reason: "texture was never resolved".to_string(),
            });
        }
        self.submitted += 1;
        if self.config.submission_history == 0 {
            return Ok(());
        }
        if self.submissions.len() == self.config.submission_history {
            self.submissions.pop_front();
        }
        self.submissions.push_back(Submission {
            eye,
            pose_index: self.poses_served,
            texture_frame: texture.frame(),
            size: texture.pixels().size(),
        });
        Ok(())
    }
}

impl DisplayBackend for SimulatedHmd {
    fn name(&self) -> &str {
        "simulated"
    }

    fn recommended_render_size(&self) -> UVec2 {
        self.config.render_size
    }

    fn refresh_rate_hz(&self) -> f32 {
        self.config.refresh_rate_hz
    }

    fn eye_intrinsics(&self, eye: Eye) -> HmdResult<EyeIntrinsics> {
        let offset = Vec3::X * eye.side() * self.config.interpupillary_distance * 0.5;
        let projection = match eye {
            Eye::Left => self.config.projection,
            Eye::Right => self.config.projection.mirrored(),
        };
        Ok(EyeIntrinsics::from_offset(eye, offset, projection))
    }

    fn is_tracking(&self) -> bool {
        self.tracking
    }

    fn poll_events(&mut self) -> Vec<DisplayEvent> {
        if let Some(limit) = self.config.quit_after_frames {
            if !self.quit_sent && self.poses_served >= limit {
                log::debug!("simulated headset: quitting after {limit} frames");
                self.request_quit();
            }
        }
        std::mem::take(&mut self.pending)
    }
}
