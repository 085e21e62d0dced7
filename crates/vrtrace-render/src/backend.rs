//! The render backend seam.
//!
//! The frame driver only needs two things from a renderer: turn a mesh into
//! whatever acceleration structure it traces against, and fill a pixel
//! buffer for a given camera basis.

use glam::UVec2;
use vrtrace_core::CameraBasis;

use crate::error::RenderResult;
use crate::pixels::{PixelBuffer, Rgba8};
use crate::scene::TriangleMesh;

/// A renderer that produces images from a [`CameraBasis`] and a committed scene.
pub trait RenderBackend {
    /// Backend-specific scene handle built by [`RenderBackend::commit_scene`].
    type Scene;

    /// Short backend name, used in logs.
    fn name(&self) -> &'static str;

    /// Prepares a mesh for rendering.
    fn commit_scene(&mut self, mesh: &TriangleMesh) -> RenderResult<Self::Scene>;

    /// Renders into an existing buffer, covering all of it.
    fn render_into(
        &mut self,
        camera: &CameraBasis,
        scene: &Self::Scene,
        target: &mut PixelBuffer,
    ) -> RenderResult<()>;

    /// Renders into a freshly allocated buffer of `size`.
    fn render(
        &mut self,
        camera: &CameraBasis,
        scene: &Self::Scene,
        size: UVec2,
    ) -> RenderResult<PixelBuffer> {
        let mut target = PixelBuffer::new(size, Rgba8::BLACK)?;
        self.render_into(camera, scene, &mut target)?;
        Ok(target)
    }
}
