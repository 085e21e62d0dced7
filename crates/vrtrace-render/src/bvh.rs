//! Median-split bounding volume hierarchy over a triangle mesh.
//!
//! Nodes are stored depth-first in one flat array: an internal node's left
//! child directly follows it, the right child index is stored explicitly.

use std::time::Instant;

use glam::Vec3;

use crate::scene::TriangleMesh;

/// Triangles per leaf before a node is split.
const MAX_LEAF_TRIANGLES: usize = 4;

/// Traversal stack depth; median splits keep trees far shallower than this.
const STACK_DEPTH: usize = 64;

/// Rays closer than this to their origin do not count as hits.
const T_MIN: f32 = 1e-6;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// An inverted box that any point expands.
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn expand_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn expand_aabb(&mut self, other: &Aabb) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Index of the longest axis (0 = x, 1 = y, 2 = z).
    pub fn largest_axis(&self) -> usize {
        let e = self.extent();
        if e.x >= e.y && e.x >= e.z {
            0
        } else if e.y >= e.z {
            1
        } else {
            2
        }
    }

    /// Slab test; returns the entry distance if the ray overlaps `[T_MIN, t_max]`.
    fn hit(&self, origin: Vec3, inv_dir: Vec3, t_max: f32) -> Option<f32> {
        let t0 = (self.min - origin) * inv_dir;
        let t1 = (self.max - origin) * inv_dir;
        let near = t0.min(t1).max_element().max(T_MIN);
        let far = t0.max(t1).min_element().min(t_max);
        (near <= far).then_some(near)
    }
}

#[derive(Debug, Clone, Copy)]
struct BvhNode {
    bounds: Aabb,
    /// First entry in `Bvh::order` for leaves.
    start: u32,
    /// Triangle count; zero marks an internal node.
    count: u32,
    /// Right child index for internal nodes.
    right: u32,
}

/// Closest intersection along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Ray parameter, in units of the (un-normalized) ray direction.
    pub t: f32,
    /// Index of the triangle that was hit.
    pub triangle: u32,
    /// Unit geometric normal, facing the side given by the winding order.
    pub normal: Vec3,
}

/// Build statistics, logged at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildStats {
    pub node_count: usize,
    pub leaf_count: usize,
    pub max_depth: usize,
    pub build_time_ms: f32,
}

/// Bounding volume hierarchy over one [`TriangleMesh`].
#[derive(Debug, Clone, Default)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    order: Vec<u32>,
    stats: BuildStats,
}

impl Bvh {
    /// Builds a hierarchy over every triangle in `mesh`.
    pub fn build(mesh: &TriangleMesh) -> Self {
        let start_time = Instant::now();
        let count = mesh.triangle_count();
        if count == 0 {
            return Self::default();
        }

        let mut bounds = Vec::with_capacity(count);
        let mut centroids = Vec::with_capacity(count);
        for i in 0..count {
            let mut aabb = Aabb::EMPTY;
            for p in mesh.triangle(i) {
                aabb.expand_point(p);
            }
            centroids.push(aabb.center());
            bounds.push(aabb);
        }

        let mut builder = Builder {
            bounds: &bounds,
            centroids: &centroids,
            order: (0..count as u32).collect(),
            nodes: Vec::with_capacity(2 * count / MAX_LEAF_TRIANGLES + 1),
            stats: BuildStats::default(),
        };
        builder.build(0, count, 1);

        let mut stats = builder.stats;
        stats.node_count = builder.nodes.len();
        stats.build_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;
        log::debug!(
            "built BVH over {count} triangles: {} nodes, {} leaves, depth {} in {:.2} ms",
            stats.node_count,
            stats.leaf_count,
            stats.max_depth,
            stats.build_time_ms
        );

        Self {
            nodes: builder.nodes,
            order: builder.order,
            stats,
        }
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// Bounds of the whole hierarchy.
    pub fn bounds(&self) -> Option<Aabb> {
        self.nodes.first().map(|n| n.bounds)
    }

    /// Finds the closest hit along `origin + t * dir` with `t < t_max`.
    pub fn intersect(&self, mesh: &TriangleMesh, origin: Vec3, dir: Vec3, t_max: f32) -> Option<Hit> {
        if self.nodes.is_empty() {
            return None;
        }
        let inv_dir = dir.recip();
        let mut closest: Option<Hit> = None;
        let mut t_limit = t_max;

        let mut stack = [0u32; STACK_DEPTH];
        let mut sp = 1;
        while sp > 0 {
            sp -= 1;
            let node_index = stack[sp];
            let node = &self.nodes[node_index as usize];
            if node.bounds.hit(origin, inv_dir, t_limit).is_none() {
                continue;
            }
            if node.count > 0 {
                let start = node.start as usize;
                for &tri in &self.order[start..start + node.count as usize] {
                    if let Some(hit) = intersect_triangle(mesh, tri, origin, dir, t_limit) {
                        t_limit = hit.t;
                        closest = Some(hit);
                    }
                }
            } else if sp + 2 <= STACK_DEPTH {
                stack[sp] = node.right;
                stack[sp + 1] = node_index + 1;
                sp += 2;
            }
        }
        closest
    }
}

struct Builder<'a> {
    bounds: &'a [Aabb],
    centroids: &'a [Vec3],
    order: Vec<u32>,
    nodes: Vec<BvhNode>,
    stats: BuildStats,
}

impl Builder<'_> {
    fn build(&mut self, start: usize, end: usize, depth: usize) -> u32 {
        self.stats.max_depth = self.stats.max_depth.max(depth);

        let mut bounds = Aabb::EMPTY;
        let mut centroid_bounds = Aabb::EMPTY;
        for &tri in &self.order[start..end] {
            bounds.expand_aabb(&self.bounds[tri as usize]);
            centroid_bounds.expand_point(self.centroids[tri as usize]);
        }

        let index = self.nodes.len() as u32;
        let count = end - start;
        let axis = centroid_bounds.largest_axis();
        if count <= MAX_LEAF_TRIANGLES || centroid_bounds.extent()[axis] <= 0.0 {
            self.stats.leaf_count += 1;
            self.nodes.push(BvhNode {
                bounds,
                start: start as u32,
                count: count as u32,
                right: 0,
            });
            return index;
        }

        let mid = count / 2;
        let centroids = self.centroids;
        self.order[start..end].select_nth_unstable_by(mid, |&a, &b| {
            centroids[a as usize][axis].total_cmp(&centroids[b as usize][axis])
        });

        self.nodes.push(BvhNode {
            bounds,
            start: 0,
            count: 0,
            right: 0,
        });
        self.build(start, start + mid, depth + 1);
        let right = self.build(start + mid, end, depth + 1);
        self.nodes[index as usize].right = right;
        index
    }
}

/// Möller–Trumbore ray/triangle test.
fn intersect_triangle(
    mesh: &TriangleMesh,
    triangle: u32,
    origin: Vec3,
    dir: Vec3,
    t_max: f32,
) -> Option<Hit> {
    let [v0, v1, v2] = mesh.triangle(triangle as usize);
    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let p = dir.cross(e2);
    let det = e1.dot(p);
    if det.abs() < 1e-12 {
        return None;
    }
    let inv_det = det.recip();
    let s = origin - v0;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = dir.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv_det;
    (t > T_MIN && t < t_max).then(|| Hit {
        t,
        triangle,
        normal: e1.cross(e2).normalize_or_zero(),
    })
}

#[cfg(test)]
#[allow(clippy::cast_precision_loss)]
mod tests {
    use super::*;
    use glam::UVec3;
    use proptest::prelude::*;

    /// A grid of unit quads in the z = 0 plane, two triangles each.
    fn quad_grid(n: u32) -> TriangleMesh {
        let mut positions = Vec::new();
        let mut indices = Vec::new();
        for j in 0..=n {
            for i in 0..=n {
                positions.push(Vec3::new(i as f32, j as f32, 0.0));
            }
        }
        let stride = n + 1;
        for j in 0..n {
            for i in 0..n {
                let a = j * stride + i;
                indices.push(UVec3::new(a, a + 1, a + stride + 1));
                indices.push(UVec3::new(a, a + stride + 1, a + stride));
            }
        }
        TriangleMesh::new(positions, indices).unwrap()
    }

    fn brute_force(mesh: &TriangleMesh, origin: Vec3, dir: Vec3) -> Option<Hit> {
        let mut best: Option<Hit> = None;
        for tri in 0..mesh.triangle_count() as u32 {
            let limit = best.map_or(f32::INFINITY, |h| h.t);
            if let Some(hit) = intersect_triangle(mesh, tri, origin, dir, limit) {
                best = Some(hit);
            }
        }
        best
    }

    #[test]
    fn test_empty_mesh() {
        let bvh = Bvh::build(&TriangleMesh::default());
        assert!(bvh.bounds().is_none());
        assert!(bvh
            .intersect(&TriangleMesh::default(), Vec3::ZERO, Vec3::NEG_Z, f32::INFINITY)
            .is_none());
    }

    #[test]
    fn test_single_triangle_hit_and_miss() {
        let mesh = TriangleMesh::new(
            vec![Vec3::new(-1.0, -1.0, -2.0), Vec3::new(1.0, -1.0, -2.0), Vec3::new(0.0, 1.0, -2.0)],
            vec![UVec3::new(0, 1, 2)],
        )
        .unwrap();
        let bvh = Bvh::build(&mesh);
        let hit = bvh.intersect(&mesh, Vec3::ZERO, Vec3::NEG_Z, f32::INFINITY).unwrap();
        assert!((hit.t - 2.0).abs() < 1e-5);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
        assert!(bvh.intersect(&mesh, Vec3::ZERO, Vec3::Z, f32::INFINITY).is_none());
        assert!(bvh.intersect(&mesh, Vec3::ZERO, Vec3::NEG_Z, 1.5).is_none());
    }

    #[test]
    fn test_build_splits_large_meshes() {
        let mesh = quad_grid(16);
        let bvh = Bvh::build(&mesh);
        let stats = bvh.stats();
        assert!(stats.leaf_count > 1);
        assert!(stats.max_depth < STACK_DEPTH / 2);
        let bounds = bvh.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::ZERO);
        assert_eq!(bounds.max, Vec3::new(16.0, 16.0, 0.0));
    }

    #[test]
    fn test_matches_brute_force() {
        let mesh = quad_grid(8);
        let bvh = Bvh::build(&mesh);
        let origin = Vec3::new(4.3, 3.7, 5.0);
        for j in 0..20 {
            for i in 0..20 {
                let dir = Vec3::new(i as f32 * 0.06 - 0.6, j as f32 * 0.06 - 0.6, -1.0);
                let expected = brute_force(&mesh, origin, dir);
                let actual = bvh.intersect(&mesh, origin, dir, f32::INFINITY);
                assert_eq!(expected.map(|h| h.t), actual.map(|h| h.t));
            }
        }
    }

    #[test]
    fn test_closest_of_stacked_triangles() {
        let mut positions = Vec::new();
        let mut indices = Vec::new();
        for layer in 0..10u32 {
            let z = -1.0 - layer as f32;
            let base = positions.len() as u32;
            positions.extend([Vec3::new(-1.0, -1.0, z), Vec3::new(1.0, -1.0, z), Vec3::new(0.0, 1.0, z)]);
            indices.push(UVec3::new(base, base + 1, base + 2));
        }
        indices.reverse();
        let mesh = TriangleMesh::new(positions, indices).unwrap();
        let bvh = Bvh::build(&mesh);
        let hit = bvh.intersect(&mesh, Vec3::ZERO, Vec3::NEG_Z, f32::INFINITY).unwrap();
        assert!((hit.t - 1.0).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_bvh_agrees_with_brute_force(
            ox in -2.0f32..10.0,
            oy in -2.0f32..10.0,
            oz in 0.5f32..8.0,
            dx in -1.0f32..1.0,
            dy in -1.0f32..1.0,
        ) {
            let mesh = quad_grid(8);
            let bvh = Bvh::build(&mesh);
            let origin = Vec3::new(ox, oy, oz);
            let dir = Vec3::new(dx, dy, -1.0);
            let expected = brute_force(&mesh, origin, dir).map(|h| h.t);
            let actual = bvh.intersect(&mesh, origin, dir, f32::INFINITY).map(|h| h.t);
            prop_assert_eq!(expected, actual);
        }
    }
}
