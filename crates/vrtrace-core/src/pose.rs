//! Rigid poses reported by a tracking system.

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Row-major 3x4 matrix as reported by VR runtimes (rotation | translation).
pub type HmdMatrix34 = [[f32; 4]; 3];

/// A rigid transform from tracking space to world space.
///
/// Points are transformed as `rotation * p + translation`; directions only
/// by `rotation`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Linear part, columns are the tracked device's local axes in world space.
    pub rotation: Mat3,
    /// Device origin in world space.
    pub translation: Vec3,
}

impl Pose {
    /// The identity pose.
    pub const IDENTITY: Self = Self {
        rotation: Mat3::IDENTITY,
        translation: Vec3::ZERO,
    };

    /// Creates a pose from a rotation matrix and translation.
    #[must_use]
    pub fn new(rotation: Mat3, translation: Vec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Creates a pure translation.
    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self::new(Mat3::IDENTITY, translation)
    }

    /// Creates a pose from a unit quaternion and translation.
    #[must_use]
    pub fn from_rotation_translation(rotation: Quat, translation: Vec3) -> Self {
        Self::new(Mat3::from_quat(rotation), translation)
    }

    /// Converts a row-major 3x4 runtime matrix into a pose.
    ///
    /// The upper 3x3 block holds the axes as columns and the last column the
    /// translation.
    #[must_use]
    pub fn from_hmd_matrix34(m: &HmdMatrix34) -> Self {
        let col = |c: usize| Vec3::new(m[0][c], m[1][c], m[2][c]);
        Self::new(Mat3::from_cols(col(0), col(1), col(2)), col(3))
    }

    /// Converts back into a row-major 3x4 runtime matrix.
    #[must_use]
    pub fn to_hmd_matrix34(&self) -> HmdMatrix34 {
        let cols = [
            self.rotation.x_axis,
            self.rotation.y_axis,
            self.rotation.z_axis,
            self.translation,
        ];
        let mut m = [[0.0; 4]; 3];
        for (c, v) in cols.iter().enumerate() {
            m[0][c] = v.x;
            m[1][c] = v.y;
            m[2][c] = v.z;
        }
        m
    }

    /// Transforms a point from device space to world space.
    #[must_use]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * point + self.translation
    }

    /// Transforms a direction from device space to world space.
    #[must_use]
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.rotation * vector
    }

    /// Returns `self * other`: applies `other` first, then `self`.
    #[must_use]
    pub fn compose(&self, other: &Pose) -> Pose {
        Pose::new(
            self.rotation * other.rotation,
            self.transform_point(other.translation),
        )
    }

    /// Device forward direction (-Z) in world space.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.transform_vector(Vec3::NEG_Z)
    }

    /// Device up direction (+Y) in world space.
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.transform_vector(Vec3::Y)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}
