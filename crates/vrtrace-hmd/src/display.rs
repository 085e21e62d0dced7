//! Traits the frame loop needs from a VR runtime.
//!
//! A runtime is split along the two points where the loop touches it: a
//! blocking pose fetch at the start of a frame and per-eye texture
//! submission at the end. [`DisplayBackend`] adds the static queries made
//! once at startup and non-blocking event polling.

use glam::UVec2;
use vrtrace_core::{Eye, Pose};
use vrtrace_render::ResolveTarget;

use crate::error::HmdResult;
use crate::intrinsics::EyeIntrinsics;

/// Events a display backend reports between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEvent {
    /// The user or runtime asked the application to exit.
    Quit,
    /// Tracking was lost or regained.
    TrackingChanged { tracking: bool },
}

/// Source of head poses.
pub trait PoseSource {
    /// Blocks until the runtime hands out the pose for the next frame.
    ///
    /// This is the loop's only suspension point; runtimes use it to pace
    /// the application to the display refresh.
    fn wait_get_pose(&mut self) -> HmdResult<Pose>;
}

/// Receiver of finished eye images.
pub trait Compositor {
    /// Submits one eye's resolved texture for the current frame.
    fn submit(&mut self, eye: Eye, texture: &ResolveTarget) -> HmdResult<()>;
}

/// A complete headset runtime.
pub trait DisplayBackend: PoseSource + Compositor {
    /// Short backend name, used in logs.
    fn name(&self) -> &str;

    /// Per-eye render size the runtime recommends, before render scale.
    fn recommended_render_size(&self) -> UVec2;

    /// Display refresh rate in Hz; sets the per-frame time budget.
    fn refresh_rate_hz(&self) -> f32;

    /// Fixed optics of one eye.
    fn eye_intrinsics(&self, eye: Eye) -> HmdResult<EyeIntrinsics>;

    /// Whether the headset currently reports a valid pose.
    fn is_tracking(&self) -> bool;

    /// Drains pending events without blocking.
    fn poll_events(&mut self) -> Vec<DisplayEvent>;
}
