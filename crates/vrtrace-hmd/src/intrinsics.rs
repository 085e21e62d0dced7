//! Per-eye intrinsics as reported by a runtime.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use vrtrace_core::{Eye, EyeFrustum, HmdMatrix34, Pose};

use crate::error::{HmdError, HmdResult};

/// Raw projection tangents `(left, right, top, bottom)` at unit distance,
/// in the runtime's own vertical sign convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawProjection {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl RawProjection {
    #[must_use]
    pub const fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Same projection mirrored left to right.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        Self::new(-self.right, -self.left, self.top, self.bottom)
    }
}

/// Fixed optics of one eye.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeIntrinsics {
    pub eye: Eye,
    /// Eye-to-head transform; only its translation column is used.
    pub eye_to_head: HmdMatrix34,
    pub projection_raw: RawProjection,
}

impl EyeIntrinsics {
    /// Intrinsics for an eye displaced from the head origin by `offset`.
    #[must_use]
    pub fn from_offset(eye: Eye, offset: Vec3, projection_raw: RawProjection) -> Self {
        Self {
            eye,
            eye_to_head: Pose::from_translation(offset).to_hmd_matrix34(),
            projection_raw,
        }
    }

    /// Eye optical center relative to the head origin.
    #[must_use]
    pub fn offset(&self) -> Vec3 {
        Pose::from_hmd_matrix34(&self.eye_to_head).translation
    }

    /// Converts to the frustum the stereo rig consumes.
    pub fn frustum(&self) -> HmdResult<EyeFrustum> {
        let p = &self.projection_raw;
        let values = [p.left, p.right, p.top, p.bottom];
        if values.iter().any(|v| !v.is_finite()) || !self.offset().is_finite() {
            return Err(HmdError::InvalidIntrinsics {
                eye: self.eye,
                reason: "non-finite value".to_string(),
            });
        }
        Ok(EyeFrustum::new(p.left, p.right, p.top, p.bottom, self.offset()))
    }
}
