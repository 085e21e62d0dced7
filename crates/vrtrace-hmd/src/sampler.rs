//! Pose sampler: startup intrinsics plus one head pose per frame.

use glam::UVec2;
use vrtrace_core::{Eye, EyeFrustum, Pose};

use crate::display::{DisplayBackend, PoseSource};
use crate::error::{HmdError, HmdResult};

/// Reads each eye's frustum once, then hands out the latest head pose
/// every frame.
#[derive(Debug, Clone)]
pub struct PoseSampler {
    frustums: [EyeFrustum; 2],
    recommended_size: UVec2,
    refresh_rate_hz: f32,
    samples: u64,
    last_pose: Option<Pose>,
}

impl PoseSampler {
    /// Queries static display properties.
    pub fn new<D: DisplayBackend + ?Sized>(display: &D) -> HmdResult<Self> {
        let recommended_size = display.recommended_render_size();
        if recommended_size.x == 0 || recommended_size.y == 0 {
            return Err(HmdError::Unavailable(format!(
                "{} recommends a {}x{} render size",
                display.name(),
                recommended_size.x,
                recommended_size.y
            )));
        }
        let refresh_rate_hz = display.refresh_rate_hz();
        if !(refresh_rate_hz > 0.0 && refresh_rate_hz.is_finite()) {
            return Err(HmdError::Unavailable(format!(
                "{} reports a refresh rate of {refresh_rate_hz} Hz",
                display.name()
            )));
        }
        log::info!(
            "{}: recommended render size {}x{} per eye at {refresh_rate_hz} Hz",
            display.name(),
            recommended_size.x,
            recommended_size.y
        );

        let left = display.eye_intrinsics(Eye::Left)?;
        let right = display.eye_intrinsics(Eye::Right)?;
        for intrinsics in [&left, &right] {
            let p = intrinsics.projection_raw;
            log::info!(
                "{} eye: offset {:?}, projection l={:.4} r={:.4} t={:.4} b={:.4}",
                intrinsics.eye,
                intrinsics.offset(),
                p.left,
                p.right,
                p.top,
                p.bottom
            );
            log::debug!("{} eye-to-head: {:?}", intrinsics.eye, intrinsics.eye_to_head);
        }

        Ok(Self {
            frustums: [left.frustum()?, right.frustum()?],
            recommended_size,
            refresh_rate_hz,
            samples: 0,
            last_pose: None,
        })
    }

    pub fn frustums(&self) -> &[EyeFrustum; 2] {
        &self.frustums
    }

    pub fn frustum(&self, eye: Eye) -> &EyeFrustum {
        &self.frustums[eye.index()]
    }

    pub fn recommended_size(&self) -> UVec2 {
        self.recommended_size
    }

    pub fn refresh_rate_hz(&self) -> f32 {
        self.refresh_rate_hz
    }

    /// Time available for one frame at the display's refresh rate.
    pub fn frame_budget_ms(&self) -> f64 {
        1000.0 / f64::from(self.refresh_rate_hz)
    }

    /// Number of poses sampled so far.
    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn last_pose(&self) -> Option<&Pose> {
        self.last_pose.as_ref()
    }

    /// Blocks on `source` for the next head pose.
    pub fn sample<S: PoseSource + ?Sized>(&mut self, source: &mut S) -> HmdResult<Pose> {
        let pose = source.wait_get_pose()?;
        self.samples += 1;
        self.last_pose = Some(pose);
        log::trace!("pose {}: {:?}", self.samples, pose.translation);
        Ok(pose)
    }
}
