//! Core abstractions for vrtrace.
//!
//! This crate holds the math that turns a tracked head pose into per-eye
//! ray-generation cameras:
//! - [`Pose`] rigid transforms and runtime matrix conversion
//! - [`EyeFrustum`] asymmetric per-eye optics and [`FrustumBounds`]
//! - [`CameraBasis`] and the [`CameraModel`] capability trait
//! - [`CameraRegistry`] named-constructor table for camera types
//! - [`StereoRig`] combining all of the above for both eyes
//! - Configuration [`Options`] and the shared error type

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Tests compare exact float outputs
#![cfg_attr(test, allow(clippy::float_cmp))]

pub mod camera;
pub mod error;
pub mod eye;
pub mod frustum;
pub mod options;
pub mod pose;
pub mod registry;
pub mod rig;

pub use camera::{CameraBasis, CameraModel, CameraParams, OffAxisCamera, PerspectiveCamera};
pub use error::{Result, VrTraceError};
pub use eye::Eye;
pub use frustum::{EyeFrustum, FrustumBounds, VerticalConvention};
pub use options::{CameraMode, FixedStereoOptions, MonoOptions, Options, PreviewOptions};
pub use pose::{HmdMatrix34, Pose};
pub use registry::{CameraConstructor, CameraRegistry};
pub use rig::{EyeSetup, StereoRig};

// Re-export glam types for convenience
pub use glam::{Mat3, Quat, UVec2, UVec3, Vec2, Vec3};
