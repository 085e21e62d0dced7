//! Stereo render targets.
//!
//! Each eye renders into its half of one side-by-side combined buffer
//! (left eye at `x = 0`, right eye at `x = width`). Resolving copies each
//! half into that eye's own resolve target, which is what the compositor
//! receives. All buffers are allocated once and reused every frame.

use glam::UVec2;
use vrtrace_core::Eye;

use crate::error::{RenderError, RenderResult};
use crate::pixels::{blit, PixelBuffer, Rect, Rgba8};

/// One eye's resolved image, handed to the compositor.
#[derive(Debug, Clone)]
pub struct ResolveTarget {
    eye: Eye,
    pixels: PixelBuffer,
    frame: u64,
}

impl ResolveTarget {
    pub fn eye(&self) -> Eye {
        self.eye
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    /// Number of resolves so far; zero until the first frame lands.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

/// Combined side-by-side buffer plus the two per-eye resolve targets.
#[derive(Debug, Clone)]
pub struct StereoTarget {
    eye_size: UVec2,
    combined: PixelBuffer,
    resolve: [ResolveTarget; 2],
}

impl StereoTarget {
    /// Allocates a target for eye images of `eye_size`, cleared to `clear`.
    pub fn new(eye_size: UVec2, clear: Rgba8) -> RenderResult<Self> {
        let combined_width = eye_size
            .x
            .checked_mul(2)
            .ok_or(RenderError::InvalidSize {
                width: eye_size.x,
                height: eye_size.y,
            })?;
        let combined = PixelBuffer::new(UVec2::new(combined_width, eye_size.y), clear)?;
        let eye_pixels = PixelBuffer::new(eye_size, clear)?;
        let resolve = Eye::BOTH.map(|eye| ResolveTarget {
            eye,
            pixels: eye_pixels.clone(),
            frame: 0,
        });
        log::debug!(
            "allocated stereo target: {}x{} per eye, {}x{} combined",
            eye_size.x,
            eye_size.y,
            combined_width,
            eye_size.y
        );
        Ok(Self {
            eye_size,
            combined,
            resolve,
        })
    }

    pub fn eye_size(&self) -> UVec2 {
        self.eye_size
    }

    pub fn combined(&self) -> &PixelBuffer {
        &self.combined
    }

    /// The eye's region of the combined buffer.
    pub fn eye_region(&self, eye: Eye) -> Rect {
        let x = self.eye_size.x * eye.index() as u32;
        Rect::new(x, 0, self.eye_size.x, self.eye_size.y)
    }

    /// Copies a rendered eye image into its region of the combined buffer.
    pub fn upload(&mut self, eye: Eye, image: &PixelBuffer) -> RenderResult<()> {
        if image.size() != self.eye_size {
            return Err(RenderError::SizeMismatch {
                expected: (self.eye_size.x, self.eye_size.y),
                actual: (image.width(), image.height()),
            });
        }
        let region = self.eye_region(eye);
        self.combined.write_region(region.x, region.y, image)
    }

    /// Blits each eye's region of the combined buffer into its resolve target.
    pub fn resolve(&mut self) -> RenderResult<()> {
        for eye in Eye::BOTH {
            let region = self.eye_region(eye);
            let target = &mut self.resolve[eye.index()];
            blit(
                &self.combined,
                region,
                &mut target.pixels,
                Rect::full(self.eye_size),
            )?;
            target.frame += 1;
        }
        Ok(())
    }

    pub fn resolve_target(&self, eye: Eye) -> &ResolveTarget {
        &self.resolve[eye.index()]
    }

    /// Nearest-neighbor downscale of the combined buffer.
    pub fn preview(&self, size: UVec2) -> RenderResult<PixelBuffer> {
        let mut preview = PixelBuffer::new(size, Rgba8::BLACK)?;
        blit(
            &self.combined,
            Rect::full(self.combined.size()),
            &mut preview,
            Rect::full(size),
        )?;
        Ok(preview)
    }
}
