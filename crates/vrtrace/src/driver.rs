//! The per-frame pose-to-render pipeline.
//!
//! One call to [`FrameDriver::run_frame`] is one stereo frame:
//!
//! 1. drain display events; a quit request stops the loop here and only here
//! 2. block on the display for the head pose
//! 3. for the left then the right eye: build the camera basis, render, and
//!    copy the image into that eye's half of the combined texture
//! 4. resolve both halves and submit them to the compositor
//! 5. every N frames, write the downscaled combined texture as a preview
//!
//! Any backend error ends the run.

use std::time::Instant;

use glam::UVec2;
use vrtrace_core::{
    CameraBasis, CameraRegistry, Eye, Options, Pose, PreviewOptions, Result, StereoRig,
};
use vrtrace_hmd::{DisplayBackend, DisplayEvent, PoseSampler};
use vrtrace_render::{save_image, PixelBuffer, RenderBackend, Rgba8, StereoTarget, TriangleMesh};

use crate::timing::{FrameTiming, FrameTimingStats};

/// Frames kept in the rolling timing window.
const TIMING_WINDOW: usize = 1000;

/// Where the driver is within the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// Between frames.
    Idle,
    /// Head pose sampled for this frame.
    PoseReady,
    /// The given eye has been rendered and uploaded.
    EyeRendered(Eye),
    /// Both eyes resolved and submitted.
    Composited,
    /// Preview handled; the frame is complete.
    Presented,
    /// Quit was requested or a frame failed.
    Stopped,
}

/// Result of one call to [`FrameDriver::run_frame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// A stereo frame was rendered and submitted.
    Presented(FrameReport),
    /// The display asked to quit before the frame started.
    Quit,
}

/// Timing and pose of one completed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Zero-based frame number.
    pub frame: u64,
    pub head: Pose,
    /// Wall-clock render time per eye in milliseconds (left, right).
    pub render_ms: [f64; 2],
    pub wait_ms: f64,
    pub submit_ms: f64,
    pub preview_written: bool,
}

/// Summary returned by [`FrameDriver::run`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub quit_requested: bool,
    pub timing: FrameTimingStats,
}

/// Owns the render backend, the committed scene and the stereo target, and
/// drives one display through the frame loop.
pub struct FrameDriver<R: RenderBackend> {
    rig: StereoRig,
    sampler: PoseSampler,
    renderer: R,
    scene: R::Scene,
    target: StereoTarget,
    eye_images: [PixelBuffer; 2],
    preview: PreviewOptions,
    max_frames: Option<u64>,
    stats_interval: u32,
    timing: FrameTiming,
    state: FrameState,
    frame: u64,
}

impl<R: RenderBackend> FrameDriver<R> {
    /// Sets up cameras, commits the scene and allocates render targets.
    ///
    /// Each eye renders at the display's recommended size times
    /// `options.render_scale`.
    pub fn new(
        options: &Options,
        sampler: PoseSampler,
        mut renderer: R,
        mesh: &TriangleMesh,
        registry: &CameraRegistry,
    ) -> Result<Self> {
        options.validate()?;
        let eye_size = scaled_size(sampler.recommended_size(), options.render_scale);
        #[allow(clippy::cast_precision_loss)]
        let aspect_ratio = eye_size.x as f32 / eye_size.y as f32;
        log::info!(
            "rendering {}x{} per eye ({}x{} combined) in {} mode with the {} backend",
            eye_size.x,
            eye_size.y,
            eye_size.x * 2,
            eye_size.y,
            options.camera_mode,
            renderer.name()
        );

        let timing = FrameTiming::new(TIMING_WINDOW, sampler.frame_budget_ms());
        let rig = StereoRig::new(options, sampler.frustums(), aspect_ratio, registry)?;
        let scene = renderer.commit_scene(mesh)?;
        let clear = Rgba8::from_linear(options.background_color);
        let target = StereoTarget::new(eye_size, clear)?;
        let eye_image = PixelBuffer::new(eye_size, clear)?;

        Ok(Self {
            rig,
            sampler,
            renderer,
            scene,
            target,
            eye_images: [eye_image.clone(), eye_image],
            preview: options.preview.clone(),
            max_frames: options.max_frames,
            stats_interval: options.stats_interval_frames,
            timing,
            state: FrameState::Idle,
            frame: 0,
        })
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Frames completed so far.
    pub fn frames(&self) -> u64 {
        self.frame
    }

    pub fn rig(&self) -> &StereoRig {
        &self.rig
    }

    pub fn target(&self) -> &StereoTarget {
        &self.target
    }

    pub fn timing(&self) -> &FrameTiming {
        &self.timing
    }

    /// Per-eye render size.
    pub fn eye_size(&self) -> UVec2 {
        self.target.eye_size()
    }

    /// Camera bases for both eyes at a given head pose.
    pub fn eye_bases(&self, head: &Pose) -> Result<[CameraBasis; 2]> {
        Ok([
            self.rig.eye_basis(Eye::Left, head)?,
            self.rig.eye_basis(Eye::Right, head)?,
        ])
    }

    /// Runs until the display asks to quit or `max_frames` is reached.
    pub fn run<D: DisplayBackend + ?Sized>(&mut self, display: &mut D) -> Result<RunSummary> {
        let mut quit_requested = false;
        loop {
            if self.max_frames.is_some_and(|max| self.frame >= max) {
                log::info!("reached frame limit of {}", self.frame);
                self.state = FrameState::Stopped;
                break;
            }
            if self.run_frame(display)? == FrameOutcome::Quit {
                quit_requested = true;
                break;
            }
        }

        let timing = self.timing.stats();
        log::info!("stopped after {} frames: {timing}", self.frame);
        Ok(RunSummary {
            frames: self.frame,
            quit_requested,
            timing,
        })
    }

    /// Runs one stereo frame.
    pub fn run_frame<D: DisplayBackend + ?Sized>(&mut self, display: &mut D) -> Result<FrameOutcome> {
        if self.state == FrameState::Stopped {
            return Ok(FrameOutcome::Quit);
        }
        self.state = FrameState::Idle;
        if Self::poll_quit(display) {
            self.state = FrameState::Stopped;
            return Ok(FrameOutcome::Quit);
        }

        match self.render_frame(display) {
            Ok(report) => Ok(FrameOutcome::Presented(report)),
            Err(err) => {
                log::error!("frame {} failed: {err}", self.frame);
                self.state = FrameState::Stopped;
                Err(err)
            }
        }
    }

    fn poll_quit<D: DisplayBackend + ?Sized>(display: &mut D) -> bool {
        let mut quit = false;
        for event in display.poll_events() {
            match event {
                DisplayEvent::Quit => {
                    log::info!("quit requested by {}", display.name());
                    quit = true;
                }
                DisplayEvent::TrackingChanged { tracking: false } => {
                    log::warn!("{} lost tracking", display.name());
                }
                DisplayEvent::TrackingChanged { tracking: true } => {
                    log::info!("{} regained tracking", display.name());
                }
            }
        }
        quit
    }

    fn render_frame<D: DisplayBackend + ?Sized>(&mut self, display: &mut D) -> Result<FrameReport> {
        let wait_start = Instant::now();
        let head = self.sampler.sample(display)?;
        let wait_ms = elapsed_ms(wait_start);
        self.state = FrameState::PoseReady;

        let mut render_ms = [0.0; 2];
        for eye in Eye::BOTH {
            let basis = self.rig.eye_basis(eye, &head)?;
            let image = &mut self.eye_images[eye.index()];
            let start = Instant::now();
            self.renderer.render_into(&basis, &self.scene, image)?;
            render_ms[eye.index()] = elapsed_ms(start);
            self.target.upload(eye, image)?;
            self.state = FrameState::EyeRendered(eye);
        }

        let submit_start = Instant::now();
        self.target.resolve()?;
        for eye in Eye::BOTH {
            display.submit(eye, self.target.resolve_target(eye))?;
        }
        let submit_ms = elapsed_ms(submit_start);
        self.state = FrameState::Composited;

        let preview_written = self.write_preview()?;
        self.state = FrameState::Presented;

        let report = FrameReport {
            frame: self.frame,
            head,
            render_ms,
            wait_ms,
            submit_ms,
            preview_written,
        };
        self.record(&report);
        self.frame += 1;
        Ok(report)
    }

    fn write_preview(&self) -> Result<bool> {
        let every = u64::from(self.preview.every_n_frames.max(1));
        if !self.preview.enabled || self.frame % every != 0 {
            return Ok(false);
        }
        let size = UVec2::new(self.preview.width, self.preview.height);
        let image = self.target.preview(size)?;
        save_image(&self.preview.path, &image)?;
        log::debug!("frame {}: wrote preview {}", self.frame, self.preview.path);
        Ok(true)
    }

    fn record(&mut self, report: &FrameReport) {
        let render_total = report.render_ms[0] + report.render_ms[1];
        self.timing
            .record_frame(report.wait_ms, render_total, report.submit_ms);
        log::debug!(
            "frame {}: render left {:.2} ms, right {:.2} ms ({:.2} ms both eyes)",
            report.frame,
            report.render_ms[0],
            report.render_ms[1],
            render_total
        );
        let interval = u64::from(self.stats_interval);
        if interval > 0 && (report.frame + 1) % interval == 0 {
            log::info!("frame {}: {}", report.frame + 1, self.timing.stats());
        }
    }
}

/// Recommended size times `scale`, rounded, at least one pixel per axis.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn scaled_size(recommended: UVec2, scale: f32) -> UVec2 {
    let scaled = (recommended.as_vec2() * scale).round();
    scaled.as_uvec2().max(UVec2::ONE)
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
