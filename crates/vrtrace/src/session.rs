//! A rendering session: one display, one renderer, one scene.

use vrtrace_core::{CameraRegistry, Options, Result, VrTraceError};
use vrtrace_hmd::{DisplayBackend, PoseSampler};
use vrtrace_render::{RaycastRenderer, RenderBackend, TriangleMesh};

use crate::driver::{FrameDriver, RunSummary};

/// Owns the display and the frame driver for the lifetime of a run.
///
/// Fields drop in declaration order, so render resources are released
/// before the display they were set up against.
pub struct Session<D: DisplayBackend, R: RenderBackend = RaycastRenderer> {
    driver: FrameDriver<R>,
    display: D,
}

impl<D: DisplayBackend> Session<D> {
    /// Sets up a session with the reference ray caster.
    pub fn new(options: &Options, display: D, mesh: &TriangleMesh) -> Result<Self> {
        let renderer = RaycastRenderer::new(options.background_color);
        Self::with_renderer(options, display, renderer, mesh)
    }
}

impl<D: DisplayBackend, R: RenderBackend> Session<D, R> {
    /// Sets up a session with a caller-provided render backend.
    ///
    /// Fails if the headset is not tracking, its intrinsics are unusable,
    /// or the options are out of range.
    pub fn with_renderer(
        options: &Options,
        display: D,
        renderer: R,
        mesh: &TriangleMesh,
    ) -> Result<Self> {
        if !display.is_tracking() {
            return Err(VrTraceError::Display(format!(
                "{} is not tracking, check the headset connection",
                display.name()
            )));
        }
        let sampler = PoseSampler::new(&display)?;
        let registry = CameraRegistry::with_builtin();
        let driver = FrameDriver::new(options, sampler, renderer, mesh, &registry)?;
        Ok(Self { driver, display })
    }

    /// Runs the frame loop to completion.
    pub fn run(&mut self) -> Result<RunSummary> {
        self.driver.run(&mut self.display)
    }

    pub fn driver(&self) -> &FrameDriver<R> {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut FrameDriver<R> {
        &mut self.driver
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }
}
