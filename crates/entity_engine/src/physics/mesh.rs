//! Triangle mesh collision geometry
//!
//! Built once per model and shared by every body that uses the model.

use crate::foundation::math::Vec3;

/// A triangle in model space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Triangle from three corners
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }
}

/// A triangle mesh stored in model space
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    triangles: Vec<Triangle>,
}

impl TriangleMesh {
    /// Build a triangle mesh from model-space vertices and a triangle list
    ///
    /// Trailing indices that do not form a full triangle are ignored, as are
    /// triangles referring to vertices that do not exist.
    pub fn from_indexed(vertices: &[Vec3], indices: &[u32]) -> Self {
        let corner = |i: u32| vertices.get(i as usize).copied();
        let mut triangles = Vec::with_capacity(indices.len() / 3);
        let mut skipped = 0usize;

        for chunk in indices.chunks_exact(3) {
            match (corner(chunk[0]), corner(chunk[1]), corner(chunk[2])) {
                (Some(v0), Some(v1), Some(v2)) => triangles.push(Triangle::new(v0, v1, v2)),
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            log::warn!("Skipped {} triangles with out-of-range indices", skipped);
        }

        Self { triangles }
    }

    /// Triangles in model space
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_from_quad_ignores_trailing_index() {
        let vertices = [
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
        ];
        let mesh = TriangleMesh::from_indexed(&vertices, &[0, 1, 2, 0, 2, 3, 1]);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.triangles()[1].v2, vertices[3]);
    }

    #[test]
    fn test_out_of_range_triangle_is_skipped() {
        let vertices = [Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)];
        let mesh = TriangleMesh::from_indexed(&vertices, &[0, 1, 7]);
        assert_eq!(mesh.triangle_count(), 0);
    }
}
