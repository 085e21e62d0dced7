//! Triangle mesh scenes.

use glam::{UVec3, Vec3};

use crate::error::{RenderError, RenderResult};

/// An indexed triangle mesh: shared vertex positions plus index triples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    positions: Vec<Vec3>,
    indices: Vec<UVec3>,
}

impl TriangleMesh {
    /// Creates a mesh, checking that every index refers to an existing vertex.
    pub fn new(positions: Vec<Vec3>, indices: Vec<UVec3>) -> RenderResult<Self> {
        validate_indices(&indices, positions.len(), 0)?;
        Ok(Self { positions, indices })
    }

    /// Creates a mesh from flat `xyz` floats and flat index triples.
    pub fn from_flat(positions: &[f32], indices: &[u32]) -> RenderResult<Self> {
        if positions.len() % 3 != 0 {
            return Err(RenderError::RaggedArray {
                what: "position",
                len: positions.len(),
            });
        }
        if indices.len() % 3 != 0 {
            return Err(RenderError::RaggedArray {
                what: "index",
                len: indices.len(),
            });
        }
        let positions = positions
            .chunks_exact(3)
            .map(|p| Vec3::new(p[0], p[1], p[2]))
            .collect();
        let indices = indices
            .chunks_exact(3)
            .map(|i| UVec3::new(i[0], i[1], i[2]))
            .collect();
        Self::new(positions, indices)
    }

    /// Appends another index list that refers to this mesh's vertices.
    ///
    /// On error the mesh is left unchanged.
    pub fn extend_indices(&mut self, indices: &[UVec3]) -> RenderResult<()> {
        validate_indices(indices, self.positions.len(), self.indices.len())?;
        self.indices.extend_from_slice(indices);
        Ok(())
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn indices(&self) -> &[UVec3] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Corner positions of one triangle.
    pub fn triangle(&self, index: usize) -> [Vec3; 3] {
        let tri = self.indices[index];
        [
            self.positions[tri.x as usize],
            self.positions[tri.y as usize],
            self.positions[tri.z as usize],
        ]
    }

    /// Axis-aligned bounds of all referenced vertices.
    pub fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        if self.indices.is_empty() {
            return None;
        }
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for tri in &self.indices {
            for index in tri.to_array() {
                let p = self.positions[index as usize];
                min = min.min(p);
                max = max.max(p);
            }
        }
        Some((min, max))
    }
}

fn validate_indices(indices: &[UVec3], vertex_count: usize, first_triangle: usize) -> RenderResult<()> {
    for (i, tri) in indices.iter().enumerate() {
        if let Some(index) = tri.to_array().into_iter().find(|&v| v as usize >= vertex_count) {
            return Err(RenderError::IndexOutOfRange {
                triangle: first_triangle + i,
                index,
                vertex_count,
            });
        }
    }
    Ok(())
}
