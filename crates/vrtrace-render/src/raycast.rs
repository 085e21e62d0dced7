//! Reference CPU ray caster.
//!
//! Casts one primary ray through each pixel center and shades the closest
//! hit from its geometric normal. No lights, materials or secondary rays.
//! Rows are traced in parallel on the rayon global pool.

use std::time::Instant;

use glam::Vec3;
use rayon::prelude::*;
use vrtrace_core::CameraBasis;

use crate::backend::RenderBackend;
use crate::bvh::{Bvh, Hit};
use crate::error::RenderResult;
use crate::pixels::{PixelBuffer, Rgba8};
use crate::scene::TriangleMesh;

/// How a hit is turned into a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadeMode {
    /// Absolute geometric normal mapped to RGB.
    Normal,
    /// Grey level `|dot(n, -ray)|`, brightest where surfaces face the eye.
    #[default]
    EyeLight,
}

impl ShadeMode {
    fn shade(self, hit: &Hit, ray_dir: Vec3) -> Vec3 {
        match self {
            ShadeMode::Normal => hit.normal.abs(),
            ShadeMode::EyeLight => {
                let facing = hit.normal.dot(-ray_dir.normalize_or_zero()).abs();
                Vec3::splat(facing)
            }
        }
    }
}

/// Scene handle for [`RaycastRenderer`]: the mesh plus its hierarchy.
#[derive(Debug, Clone)]
pub struct RaycastScene {
    mesh: TriangleMesh,
    bvh: Bvh,
}

impl RaycastScene {
    pub fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    pub fn bvh(&self) -> &Bvh {
        &self.bvh
    }
}

/// Single-hit ray caster over a BVH.
#[derive(Debug, Clone)]
pub struct RaycastRenderer {
    background: Vec3,
    shade_mode: ShadeMode,
}

impl Default for RaycastRenderer {
    fn default() -> Self {
        Self::new(Vec3::splat(0.05))
    }
}

impl RaycastRenderer {
    /// Creates a renderer with the given linear background color.
    pub fn new(background: Vec3) -> Self {
        Self {
            background,
            shade_mode: ShadeMode::default(),
        }
    }

    /// Sets the shading mode.
    #[must_use]
    pub fn with_shade_mode(mut self, shade_mode: ShadeMode) -> Self {
        self.shade_mode = shade_mode;
        self
    }

    pub fn background(&self) -> Vec3 {
        self.background
    }

    pub fn shade_mode(&self) -> ShadeMode {
        self.shade_mode
    }

    /// Color seen along one ray.
    pub fn trace(&self, scene: &RaycastScene, origin: Vec3, dir: Vec3) -> Vec3 {
        match scene.bvh.intersect(&scene.mesh, origin, dir, f32::INFINITY) {
            Some(hit) => self.shade_mode.shade(&hit, dir),
            None => self.background,
        }
    }
}

impl RenderBackend for RaycastRenderer {
    type Scene = RaycastScene;

    fn name(&self) -> &'static str {
        "raycast"
    }

    fn commit_scene(&mut self, mesh: &TriangleMesh) -> RenderResult<RaycastScene> {
        let bvh = Bvh::build(mesh);
        log::info!(
            "committed scene: {} vertices, {} triangles, {} BVH nodes",
            mesh.vertex_count(),
            mesh.triangle_count(),
            bvh.stats().node_count
        );
        Ok(RaycastScene {
            mesh: mesh.clone(),
            bvh,
        })
    }

    #[allow(clippy::cast_precision_loss)]
    fn render_into(
        &mut self,
        camera: &CameraBasis,
        scene: &RaycastScene,
        target: &mut PixelBuffer,
    ) -> RenderResult<()> {
        let start = Instant::now();
        let width = target.width() as usize;
        let inv_w = 1.0 / target.width() as f32;
        let inv_h = 1.0 / target.height() as f32;
        let renderer = &*self;

        target
            .pixels_mut()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                let t = (y as f32 + 0.5) * inv_h;
                for (x, pixel) in row.iter_mut().enumerate() {
                    let s = (x as f32 + 0.5) * inv_w;
                    let color = renderer.trace(scene, camera.origin, camera.ray_direction(s, t));
                    *pixel = Rgba8::from_linear(color);
                }
            });

        log::trace!(
            "raycast {}x{} in {:.2} ms",
            target.width(),
            target.height(),
            start.elapsed().as_secs_f32() * 1000.0
        );
        Ok(())
    }
}
