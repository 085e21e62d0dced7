//! Ray-generation camera models.
//!
//! A camera model turns a committed parameter set (placement, look direction,
//! image-plane bounds) into a [`CameraBasis`]: an origin plus three vectors
//! from which the ray tracer generates one primary ray per pixel as
//! `dir00 + s * du + t * dv` for `(s, t)` in `[0, 1]²`.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{Result, VrTraceError};
use crate::frustum::FrustumBounds;

/// Squared-length threshold below which `cross(dir, up)` is treated as zero.
const DEGENERATE_CROSS_EPS: f32 = 1e-12;

/// Ray-generation basis consumed by the render backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraBasis {
    /// Ray origin (eye position in world space).
    pub origin: Vec3,
    /// Un-normalized direction toward the lower-left image corner.
    pub dir00: Vec3,
    /// Image-plane horizontal span, scaled by the frustum width.
    pub du: Vec3,
    /// Image-plane vertical span, scaled by the frustum height.
    pub dv: Vec3,
}

impl CameraBasis {
    /// Builds the basis for a camera at `pos` looking along `dir`.
    ///
    /// `dir` need not be normalized and `up` need not be perpendicular to it;
    /// the frame is orthogonalized against `dir`. Fails if `dir` is zero or
    /// `up` is parallel to `dir`.
    pub fn from_frame(pos: Vec3, dir: Vec3, up: Vec3, bounds: &FrustumBounds) -> Result<Self> {
        if dir.length_squared() == 0.0 || !dir.is_finite() {
            return Err(VrTraceError::ZeroViewDirection);
        }
        let dir = dir.normalize();
        let right = dir.cross(up);
        if right.length_squared() < DEGENERATE_CROSS_EPS || !right.is_finite() {
            return Err(VrTraceError::DegenerateCameraFrame);
        }
        let du = right.normalize();
        let dv = du.cross(dir);

        let dir00 = dir + bounds.lower_left.x * du + bounds.lower_left.y * dv;
        let size = bounds.size();

        Ok(Self {
            origin: pos,
            dir00,
            du: du * size.x,
            dv: dv * size.y,
        })
    }

    /// Un-normalized ray direction toward image coordinate `(s, t)`.
    #[must_use]
    pub fn ray_direction(&self, s: f32, t: f32) -> Vec3 {
        self.dir00 + s * self.du + t * self.dv
    }
}

/// Parameter set committed to a camera model each frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraParams {
    /// Eye position in world space.
    pub pos: Vec3,
    /// Look direction in world space.
    pub dir: Vec3,
    /// Up direction in world space.
    pub up: Vec3,
    /// Image-plane bounds, read by off-axis cameras.
    pub bounds: FrustumBounds,
    /// Vertical field of view in degrees, read by perspective cameras.
    pub fov_vertical_degrees: f32,
    /// Aspect ratio (width / height), read by perspective cameras.
    pub aspect_ratio: f32,
}

impl CameraParams {
    /// Creates a parameter set with default intrinsics.
    #[must_use]
    pub fn new(pos: Vec3, dir: Vec3, up: Vec3) -> Self {
        Self {
            pos,
            dir,
            up,
            ..Self::default()
        }
    }

    /// Sets the off-axis image-plane bounds.
    #[must_use]
    pub fn with_bounds(mut self, bounds: FrustumBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Sets the off-axis bounds from two corners.
    #[must_use]
    pub fn with_corners(self, lower_left: Vec2, upper_right: Vec2) -> Self {
        self.with_bounds(FrustumBounds::new(lower_left, upper_right))
    }

    /// Sets the perspective intrinsics.
    #[must_use]
    pub fn with_perspective(mut self, fov_vertical_degrees: f32, aspect_ratio: f32) -> Self {
        self.fov_vertical_degrees = fov_vertical_degrees;
        self.aspect_ratio = aspect_ratio;
        self
    }
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            pos: Vec3::ZERO,
            dir: Vec3::NEG_Z,
            up: Vec3::Y,
            bounds: FrustumBounds::default(),
            fov_vertical_degrees: 60.0,
            aspect_ratio: 1.0,
        }
    }
}

/// A camera type that can be registered with the render pipeline.
pub trait CameraModel: Send + Sync {
    /// Registered type name.
    fn type_name(&self) -> &'static str;

    /// Computes the ray-generation basis for a committed parameter set.
    fn commit(&self, params: &CameraParams) -> Result<CameraBasis>;
}

/// Off-axis camera driven by explicit image-plane bounds (`"vr"`).
#[derive(Debug, Clone, Copy, Default)]
pub struct OffAxisCamera;

impl OffAxisCamera {
    /// Registered type name.
    pub const TYPE_NAME: &'static str = "vr";
}

impl CameraModel for OffAxisCamera {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn commit(&self, params: &CameraParams) -> Result<CameraBasis> {
        CameraBasis::from_frame(params.pos, params.dir, params.up, &params.bounds)
    }
}

/// Symmetric pinhole camera driven by field of view and aspect ratio
/// (`"perspective"`).
#[derive(Debug, Clone, Copy, Default)]
pub struct PerspectiveCamera;

impl PerspectiveCamera {
    /// Registered type name.
    pub const TYPE_NAME: &'static str = "perspective";
}

impl CameraModel for PerspectiveCamera {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn commit(&self, params: &CameraParams) -> Result<CameraBasis> {
        if !(params.fov_vertical_degrees > 0.0 && params.fov_vertical_degrees < 180.0) {
            return Err(VrTraceError::InvalidOption {
                name: "fov_vertical_degrees",
                reason: format!("{} is outside (0, 180)", params.fov_vertical_degrees),
            });
        }
        let bounds = FrustumBounds::symmetric(params.fov_vertical_degrees, params.aspect_ratio);
        CameraBasis::from_frame(params.pos, params.dir, params.up, &bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn symmetric_unit() -> FrustumBounds {
        FrustumBounds::new(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0))
    }

    #[test]
    fn test_symmetric_frustum_basis() {
        let basis =
            CameraBasis::from_frame(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, &symmetric_unit()).unwrap();
        assert!((basis.dir00 - Vec3::new(-1.0, -1.0, -1.0)).length() < 1e-6);
        assert!((basis.du - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-6);
        assert!((basis.dv - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-6);
        assert_eq!(basis.origin, Vec3::ZERO);
    }

    #[test]
    fn test_center_ray_is_view_direction_for_symmetric_frustum() {
        let basis =
            CameraBasis::from_frame(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, &symmetric_unit()).unwrap();
        let center = basis.ray_direction(0.5, 0.5);
        assert!((center - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_unnormalized_dir_and_skewed_up() {
        let bounds = symmetric_unit();
        let a = CameraBasis::from_frame(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, &bounds).unwrap();
        let b = CameraBasis::from_frame(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, -7.5),
            Vec3::new(0.0, 3.0, -2.0),
            &bounds,
        )
        .unwrap();
        assert!((a.dir00 - b.dir00).length() < 1e-6);
        assert!((a.du - b.du).length() < 1e-6);
        assert!((a.dv - b.dv).length() < 1e-6);
    }

    #[test]
    fn test_parallel_up_is_rejected() {
        let err = CameraBasis::from_frame(Vec3::ZERO, Vec3::Y, Vec3::Y * 2.0, &symmetric_unit());
        assert!(matches!(err, Err(VrTraceError::DegenerateCameraFrame)));

        let err = CameraBasis::from_frame(Vec3::ZERO, Vec3::ZERO, Vec3::Y, &symmetric_unit());
        assert!(matches!(err, Err(VrTraceError::ZeroViewDirection)));
    }

    #[test]
    fn test_zero_area_frustum_is_valid() {
        let bounds = FrustumBounds::new(Vec2::new(0.2, -1.0), Vec2::new(0.2, 1.0));
        let basis = CameraBasis::from_frame(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, &bounds).unwrap();
        assert_eq!(basis.du, Vec3::ZERO);
        assert!(basis.dv.length() > 0.0);
    }

    #[test]
    fn test_default_params_use_unit_square() {
        let basis = OffAxisCamera.commit(&CameraParams::default()).unwrap();
        assert!((basis.dir00 - Vec3::NEG_Z).length() < 1e-6);
        assert!((basis.du - Vec3::X).length() < 1e-6);
        assert!((basis.dv - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_perspective_matches_equivalent_off_axis() {
        let params = CameraParams::new(Vec3::new(1.0, 2.0, 3.0), Vec3::NEG_Z, Vec3::Y)
            .with_perspective(90.0, 1.5);
        let persp = PerspectiveCamera.commit(&params).unwrap();
        let off_axis = OffAxisCamera
            .commit(&params.with_bounds(FrustumBounds::symmetric(90.0, 1.5)))
            .unwrap();
        assert_eq!(persp, off_axis);
        assert!((persp.du.length() - 3.0).abs() < 1e-5);
        assert!((persp.dv.length() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_perspective_rejects_bad_fov() {
        let params = CameraParams::default().with_perspective(180.0, 1.0);
        assert!(PerspectiveCamera.commit(&params).is_err());
    }

    fn unit_vec() -> impl Strategy<Value = Vec3> {
        (-1.0f32..1.0, -1.0f32..1.0, -1.0f32..1.0)
            .prop_filter("non-zero", |(x, y, z)| x * x + y * y + z * z > 0.01)
            .prop_map(|(x, y, z)| Vec3::new(x, y, z).normalize())
    }

    fn corner() -> impl Strategy<Value = Vec2> {
        (-2.0f32..2.0, -2.0f32..2.0).prop_map(|(x, y)| Vec2::new(x, y))
    }

    proptest! {
        #[test]
        fn prop_frame_is_orthonormal(dir in unit_vec(), up in unit_vec()) {
            prop_assume!(dir.cross(up).length() > 0.05);
            let basis = CameraBasis::from_frame(Vec3::ZERO, dir, up, &FrustumBounds::default()).unwrap();
            // With the unit-square default, du and dv are the unscaled frame axes.
            prop_assert!((basis.du.length() - 1.0).abs() < 1e-4);
            prop_assert!((basis.dv.length() - 1.0).abs() < 1e-4);
            prop_assert!(basis.du.dot(basis.dv).abs() < 1e-4);
            prop_assert!(dir.dot(basis.du).abs() < 1e-4);
            prop_assert!(dir.dot(basis.dv).abs() < 1e-4);
            // Right-handed: du x dv = -dir.
            prop_assert!((basis.du.cross(basis.dv) + dir).length() < 1e-3);
        }

        #[test]
        fn prop_corners_are_anchored(
            dir in unit_vec(),
            up in unit_vec(),
            lower_left in corner(),
            upper_right in corner(),
        ) {
            prop_assume!(dir.cross(up).length() > 0.05);
            let bounds = FrustumBounds::new(lower_left, upper_right);
            let basis = CameraBasis::from_frame(Vec3::ONE, dir, up, &bounds).unwrap();
            prop_assert_eq!(basis.ray_direction(0.0, 0.0), basis.dir00);
            prop_assert_eq!(basis.ray_direction(1.0, 1.0), basis.dir00 + basis.du + basis.dv);
            prop_assert_eq!(basis.origin, Vec3::ONE);
        }

        #[test]
        fn prop_commit_is_pure(dir in unit_vec(), up in unit_vec(), lower_left in corner()) {
            prop_assume!(dir.cross(up).length() > 0.05);
            let params = CameraParams::new(Vec3::new(0.1, 0.2, 0.3), dir, up)
                .with_corners(lower_left, lower_left + Vec2::ONE);
            let a = OffAxisCamera.commit(&params).unwrap();
            let b = OffAxisCamera.commit(&params).unwrap();
            prop_assert_eq!(a.origin.to_array().map(f32::to_bits), b.origin.to_array().map(f32::to_bits));
            prop_assert_eq!(a.dir00.to_array().map(f32::to_bits), b.dir00.to_array().map(f32::to_bits));
            prop_assert_eq!(a.du.to_array().map(f32::to_bits), b.du.to_array().map(f32::to_bits));
            prop_assert_eq!(a.dv.to_array().map(f32::to_bits), b.dv.to_array().map(f32::to_bits));
        }
    }
}
