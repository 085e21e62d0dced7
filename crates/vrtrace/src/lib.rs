//! vrtrace: ray-traced stereo rendering for head-mounted displays.
//!
//! Each frame the latest head pose is combined with each eye's offset and
//! asymmetric frustum into a ray-generation camera, both eyes are ray traced,
//! and the results are handed to the headset compositor.
//!
//! # Quick Start
//!
//! ```no_run
//! use vrtrace::*;
//!
//! fn main() -> Result<()> {
//!     let config = Config::default();
//!     let mesh = load_mesh("scene.obj")?;
//!     let display = SimulatedHmd::new(config.headset.clone())?;
//!
//!     let mut session = Session::new(&config.options, display, &mesh)?;
//!     let summary = session.run()?;
//!     println!("{} frames, {}", summary.frames, summary.timing);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`vrtrace_core`]: poses, eye frustums, the off-axis camera model and the stereo rig
//! - [`vrtrace_render`]: scenes, the [`RenderBackend`] trait and the reference ray caster
//! - [`vrtrace_hmd`]: the [`DisplayBackend`] seam and a simulated headset
//! - this crate: mesh loading, the [`FrameDriver`] loop and [`Session`] setup

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![cfg_attr(test, allow(clippy::float_cmp))]

pub mod config;
pub mod driver;
pub mod load;
pub mod session;
pub mod timing;

pub use config::Config;
pub use driver::{scaled_size, FrameDriver, FrameOutcome, FrameReport, FrameState, RunSummary};
pub use load::load_mesh;
pub use session::Session;
pub use timing::{FrameTiming, FrameTimingStats};

// Re-export core types
pub use vrtrace_core::{
    CameraBasis, CameraMode, CameraModel, CameraParams, CameraRegistry, Eye, EyeFrustum,
    FrustumBounds, Options, Pose, Result, StereoRig, VerticalConvention, VrTraceError,
};

// Re-export render types
pub use vrtrace_render::{
    PixelBuffer, RaycastRenderer, RenderBackend, Rgba8, ShadeMode, StereoTarget, TriangleMesh,
};

// Re-export display types
pub use vrtrace_hmd::{
    DisplayBackend, DisplayEvent, HeadMotion, HeadsetConfig, PoseSampler, SimulatedHmd,
};

pub use glam::{UVec2, UVec3, Vec2, Vec3};
