//! Head-mounted display seam for vrtrace.
//!
//! The frame loop talks to a VR runtime only through the traits in
//! [`display`]. This crate provides:
//! - [`PoseSource`], [`Compositor`] and [`DisplayBackend`]
//! - [`EyeIntrinsics`] as reported by a runtime, converted to eye frustums
//! - [`PoseSampler`], which reads intrinsics once and poses every frame
//! - [`SimulatedHmd`], a scripted in-process headset

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![cfg_attr(test, allow(clippy::float_cmp))]

pub mod display;
pub mod error;
pub mod intrinsics;
pub mod sampler;
pub mod simulated;

pub use display::{Compositor, DisplayBackend, DisplayEvent, PoseSource};
pub use error::{HmdError, HmdResult};
pub use intrinsics::{EyeIntrinsics, RawProjection};
pub use sampler::PoseSampler;
pub use simulated::{HeadMotion, HeadsetConfig, SimulatedHmd, Submission};
