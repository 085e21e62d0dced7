//! Mesh loading from OBJ files.

use std::path::Path;

use glam::{UVec3, Vec3};
use vrtrace_core::{Result, VrTraceError};
use vrtrace_render::TriangleMesh;

/// Loads every shape of an OBJ file into one triangle mesh.
///
/// Faces are triangulated. All shapes share a single vertex array; each
/// shape's triangles index into its slice of it.
pub fn load_mesh(path: impl AsRef<Path>) -> Result<TriangleMesh> {
    let path = path.as_ref();
    let mesh_error = |reason: String| VrTraceError::MeshLoad {
        path: path.display().to_string(),
        reason,
    };

    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|e| mesh_error(e.to_string()))?;

    let vertex_total: usize = models.iter().map(|m| m.mesh.positions.len() / 3).sum();
    let mut positions = Vec::with_capacity(vertex_total);
    let mut shape_indices = Vec::with_capacity(models.len());

    for model in &models {
        let shape = &model.mesh;
        log::info!(
            "loading mesh {}, {} indices",
            if model.name.is_empty() { "<unnamed>" } else { model.name.as_str() },
            shape.indices.len()
        );
        let vertex_offset = u32::try_from(positions.len())
            .map_err(|_| mesh_error("too many vertices".to_string()))?;
        positions.extend(
            shape
                .positions
                .chunks_exact(3)
                .map(|p| Vec3::new(p[0], p[1], p[2])),
        );
        let indices: Vec<UVec3> = shape
            .indices
            .chunks_exact(3)
            .map(|i| UVec3::new(i[0], i[1], i[2]) + UVec3::splat(vertex_offset))
            .collect();
        shape_indices.push(indices);
    }

    let mut mesh =
        TriangleMesh::new(positions, Vec::new()).map_err(|e| mesh_error(e.to_string()))?;
    for indices in &shape_indices {
        mesh.extend_indices(indices)
            .map_err(|e| mesh_error(e.to_string()))?;
    }

    if mesh.is_empty() {
        log::warn!("{} contains no triangles", path.display());
    } else if let Some((min, max)) = mesh.bounding_box() {
        log::info!(
            "loaded {}: {} vertices, {} triangles, bounds {:?}..{:?}",
            path.display(),
            mesh.vertex_count(),
            mesh.triangle_count(),
            min,
            max
        );
    }
    Ok(mesh)
}
