//! Stereo camera rig: per-eye placement relative to the tracked head.

use glam::Vec3;

use crate::camera::{CameraBasis, CameraModel, CameraParams, OffAxisCamera, PerspectiveCamera};
use crate::error::Result;
use crate::eye::Eye;
use crate::frustum::{EyeFrustum, FrustumBounds};
use crate::options::{CameraMode, Options};
use crate::pose::Pose;
use crate::registry::CameraRegistry;

/// Head-space placement and intrinsics of one eye camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeSetup {
    /// Registered camera type used for this eye.
    pub camera_type: &'static str,
    /// Optical center relative to the head origin.
    pub offset: Vec3,
    /// Look direction in head space.
    pub look: Vec3,
    /// Up direction in head space.
    pub up: Vec3,
    /// Off-axis image-plane bounds.
    pub bounds: FrustumBounds,
    /// Vertical field of view for perspective cameras, in degrees.
    pub fov_vertical_degrees: f32,
    /// Aspect ratio for perspective cameras.
    pub aspect_ratio: f32,
}

impl EyeSetup {
    /// Places this eye in the world for the given head pose.
    #[must_use]
    pub fn world_params(&self, head: &Pose) -> CameraParams {
        CameraParams {
            pos: head.transform_point(self.offset),
            dir: head.transform_vector(self.look),
            up: head.transform_vector(self.up),
            bounds: self.bounds,
            fov_vertical_degrees: self.fov_vertical_degrees,
            aspect_ratio: self.aspect_ratio,
        }
    }
}

/// Both eye cameras of a head-mounted display.
///
/// The rig is built once at startup from the display's static eye frustums
/// and is immutable afterwards; per frame it only maps a head pose to two
/// camera bases.
pub struct StereoRig {
    mode: CameraMode,
    eyes: [EyeSetup; 2],
    cameras: [Box<dyn CameraModel>; 2],
}

impl StereoRig {
    /// Builds the rig for `options.camera_mode`.
    ///
    /// `frustums` are the display's per-eye optics (left, right) and
    /// `aspect_ratio` the per-eye render target aspect, used by the
    /// perspective-based modes.
    pub fn new(
        options: &Options,
        frustums: &[EyeFrustum; 2],
        aspect_ratio: f32,
        registry: &CameraRegistry,
    ) -> Result<Self> {
        let eyes = Eye::BOTH.map(|eye| Self::eye_setup(options, frustums, aspect_ratio, eye));
        let cameras = [
            registry.create(eyes[0].camera_type)?,
            registry.create(eyes[1].camera_type)?,
        ];
        for eye in Eye::BOTH {
            let setup = &eyes[eye.index()];
            log::debug!(
                "{eye} eye: camera '{}', offset {:?}, look {:?}, bounds {:?}..{:?}",
                setup.camera_type,
                setup.offset,
                setup.look,
                setup.bounds.lower_left,
                setup.bounds.upper_right
            );
        }
        Ok(Self {
            mode: options.camera_mode,
            eyes,
            cameras,
        })
    }

    fn eye_setup(
        options: &Options,
        frustums: &[EyeFrustum; 2],
        aspect_ratio: f32,
        eye: Eye,
    ) -> EyeSetup {
        match options.camera_mode {
            CameraMode::StereoOffAxis => {
                let frustum = &frustums[eye.index()];
                EyeSetup {
                    camera_type: OffAxisCamera::TYPE_NAME,
                    offset: frustum.offset,
                    look: Vec3::NEG_Z,
                    up: Vec3::Y,
                    bounds: frustum.bounds(options.vertical_convention),
                    fov_vertical_degrees: options.mono.fov_vertical_degrees,
                    aspect_ratio,
                }
            }
            CameraMode::StereoFixed => {
                let fixed = &options.fixed_stereo;
                let half_ipd = Vec3::X * (fixed.interpupillary_distance * 0.5 * eye.side());
                EyeSetup {
                    camera_type: PerspectiveCamera::TYPE_NAME,
                    offset: fixed.eye_offset + half_ipd,
                    look: fixed.eye_dirs[eye.index()],
                    up: Vec3::Y,
                    bounds: FrustumBounds::symmetric(fixed.fov_vertical_degrees, aspect_ratio),
                    fov_vertical_degrees: fixed.fov_vertical_degrees,
                    aspect_ratio,
                }
            }
            CameraMode::Mono => EyeSetup {
                camera_type: PerspectiveCamera::TYPE_NAME,
                offset: Vec3::ZERO,
                look: Vec3::NEG_Z,
                up: Vec3::Y,
                bounds: FrustumBounds::symmetric(options.mono.fov_vertical_degrees, aspect_ratio),
                fov_vertical_degrees: options.mono.fov_vertical_degrees,
                aspect_ratio,
            },
        }
    }

    /// The mode this rig was built for.
    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Head-space setup of one eye.
    pub fn eye(&self, eye: Eye) -> &EyeSetup {
        &self.eyes[eye.index()]
    }

    /// World-space camera parameters of one eye for a head pose.
    pub fn eye_params(&self, eye: Eye, head: &Pose) -> CameraParams {
        self.eyes[eye.index()].world_params(head)
    }

    /// Ray-generation basis of one eye for a head pose.
    pub fn eye_basis(&self, eye: Eye, head: &Pose) -> Result<CameraBasis> {
        self.cameras[eye.index()].commit(&self.eye_params(eye, head))
    }
}
