//! Model assets
//!
//! A model holds immutable geometry plus a few pieces of lazily built or
//! temporarily swapped state that every entity using the model shares:
//! tangent vectors, the collision triangle mesh, and the vertex buffers bound
//! for the current draw call.

use std::cell::{OnceCell, Ref, RefCell};
use std::rc::Rc;

use crate::foundation::math::{Vec2, Vec3};
use crate::physics::TriangleMesh;
use super::AssetError;

/// Range of the index buffer drawn with one material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelArea {
    /// First index of the range
    pub first_index: usize,
    /// Number of indices in the range
    pub index_count: usize,
}

/// Up to four bone influences on a vertex
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VertexWeights {
    /// Bone indices
    pub bones: [u16; 4],
    /// Influence of each bone; zero entries are ignored
    pub weights: [f32; 4],
}

/// Vertex positions and normals as handed to the renderer
#[derive(Debug, Clone)]
pub struct VertexData {
    /// Positions
    pub vertices: Rc<[Vec3]>,
    /// Normals, one per position
    pub normals: Rc<[Vec3]>,
}

/// Raw geometry used to build a [`Model`]
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Positions
    pub vertices: Vec<Vec3>,
    /// Normals; empty or one per position
    pub normals: Vec<Vec3>,
    /// Texture coordinates; empty or one per position
    pub tex_coords: Vec<Vec2>,
    /// Triangle list; empty for non-indexed geometry
    pub indices: Vec<u32>,
    /// Material areas; empty means one area covering everything
    pub areas: Vec<ModelArea>,
    /// Skinning weights; empty or one per position
    pub weights: Vec<VertexWeights>,
}

/// Shared model asset
#[derive(Debug)]
pub struct Model {
    name: String,
    base: VertexData,
    tex_coords: Vec<Vec2>,
    indices: Vec<u32>,
    areas: Vec<ModelArea>,
    weights: Vec<VertexWeights>,
    bb_min: Vec3,
    bb_max: Vec3,
    radius: f32,
    bound: RefCell<VertexData>,
    tangents: OnceCell<Vec<Vec3>>,
    tri_mesh: OnceCell<Rc<TriangleMesh>>,
}

impl Model {
    /// Build a model, validating that all per-vertex arrays and index ranges agree
    pub fn from_mesh_data(name: &str, data: MeshData) -> Result<Self, AssetError> {
        let invalid = |reason: String| AssetError::InvalidMesh {
            name: name.to_string(),
            reason,
        };

        let vertex_count = data.vertices.len();
        if vertex_count == 0 {
            return Err(invalid("no vertices".to_string()));
        }
        for (what, len) in [
            ("normals", data.normals.len()),
            ("texture coordinates", data.tex_coords.len()),
            ("vertex weights", data.weights.len()),
        ] {
            if len != 0 && len != vertex_count {
                return Err(invalid(format!("{} {} for {} vertices", len, what, vertex_count)));
            }
        }
        if let Some(index) = data.indices.iter().find(|i| **i as usize >= vertex_count) {
            return Err(invalid(format!("index {} out of range", index)));
        }

        let mut areas = data.areas;
        if areas.is_empty() {
            areas.push(ModelArea {
                first_index: 0,
                index_count: data.indices.len(),
            });
        }
        if let Some(area) = areas
            .iter()
            .find(|a| a.first_index + a.index_count > data.indices.len())
        {
            return Err(invalid(format!(
                "area {}..{} exceeds {} indices",
                area.first_index,
                area.first_index + area.index_count,
                data.indices.len()
            )));
        }

        let mut bb_min = data.vertices[0];
        let mut bb_max = data.vertices[0];
        let mut radius = 0.0f32;
        for v in &data.vertices {
            bb_min = bb_min.inf(v);
            bb_max = bb_max.sup(v);
            radius = radius.max(v.magnitude());
        }

        let normals = if data.normals.is_empty() {
            vec![Vec3::zeros(); vertex_count]
        } else {
            data.normals
        };

        let base = VertexData {
            vertices: data.vertices.into(),
            normals: normals.into(),
        };

        log::debug!(
            "Model '{}': {} vertices, {} indices, {} areas",
            name,
            vertex_count,
            data.indices.len(),
            areas.len()
        );

        Ok(Self {
            name: name.to_string(),
            bound: RefCell::new(base.clone()),
            base,
            tex_coords: data.tex_coords,
            indices: data.indices,
            areas,
            weights: data.weights,
            bb_min,
            bb_max,
            radius,
            tangents: OnceCell::new(),
            tri_mesh: OnceCell::new(),
        })
    }

    /// Asset name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Original vertex positions
    pub fn vertices(&self) -> &[Vec3] {
        &self.base.vertices
    }

    /// Original vertex normals
    pub fn normals(&self) -> &[Vec3] {
        &self.base.normals
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.base.vertices.len()
    }

    /// Triangle list; empty for non-indexed models
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Material areas
    pub fn areas(&self) -> &[ModelArea] {
        &self.areas
    }

    /// Number of material areas
    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    /// Skinning weights; empty when the model cannot be skinned
    pub fn weights(&self) -> &[VertexWeights] {
        &self.weights
    }

    /// Minimum corner of the bounding box
    pub fn bb_min(&self) -> Vec3 {
        self.bb_min
    }

    /// Maximum corner of the bounding box
    pub fn bb_max(&self) -> Vec3 {
        self.bb_max
    }

    /// Distance from the origin to the furthest vertex
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Collision triangle mesh, built on first use
    ///
    /// Returns `None` for non-indexed models.
    pub fn collision_mesh(&self) -> Option<Rc<TriangleMesh>> {
        if self.indices.is_empty() {
            return None;
        }
        let mesh = self.tri_mesh.get_or_init(|| {
            log::debug!("Building collision mesh for model '{}'", self.name);
            Rc::new(TriangleMesh::from_indexed(&self.base.vertices, &self.indices))
        });
        Some(Rc::clone(mesh))
    }

    /// Whether tangent vectors have been generated
    pub fn has_tangents(&self) -> bool {
        self.tangents.get().is_some()
    }

    /// Per-vertex tangents, once generated
    pub fn tangents(&self) -> Option<&[Vec3]> {
        self.tangents.get().map(Vec::as_slice)
    }

    /// Generate tangent vectors for normal mapping
    ///
    /// Returns `false` when tangents already existed.
    pub fn generate_tangent_vectors(&self) -> bool {
        if self.has_tangents() {
            return false;
        }
        let tangents = self.compute_tangents();
        log::debug!("Generated {} tangents for model '{}'", tangents.len(), self.name);
        self.tangents.set(tangents).is_ok()
    }

    fn compute_tangents(&self) -> Vec<Vec3> {
        let vertices = &self.base.vertices;
        let normals = &self.base.normals;
        let mut accum = vec![Vec3::zeros(); vertices.len()];

        if self.tex_coords.len() == vertices.len() {
            let triangles: Vec<[usize; 3]> = if self.indices.is_empty() {
                (0..vertices.len() / 3).map(|t| [t * 3, t * 3 + 1, t * 3 + 2]).collect()
            } else {
                self.indices
                    .chunks_exact(3)
                    .map(|c| [c[0] as usize, c[1] as usize, c[2] as usize])
                    .collect()
            };

            for [a, b, c] in triangles {
                let e1 = vertices[b] - vertices[a];
                let e2 = vertices[c] - vertices[a];
                let d1 = self.tex_coords[b] - self.tex_coords[a];
                let d2 = self.tex_coords[c] - self.tex_coords[a];
                let det = d1.x * d2.y - d2.x * d1.y;
                if det.abs() <= f32::EPSILON {
                    continue;
                }
                let tangent = (e1 * d2.y - e2 * d1.y) / det;
                for i in [a, b, c] {
                    accum[i] += tangent;
                }
            }
        }

        accum
            .iter()
            .zip(normals.iter())
            .map(|(t, n)| orthonormal_tangent(*t, *n))
            .collect()
    }

    /// Replace the vertex buffers handed to the renderer
    pub fn bind_vertex_data(&self, vertices: Rc<[Vec3]>, normals: Rc<[Vec3]>) {
        *self.bound.borrow_mut() = VertexData { vertices, normals };
    }

    /// Restore the model's own vertex buffers
    pub fn restore_vertex_data(&self) {
        *self.bound.borrow_mut() = self.base.clone();
    }

    /// Vertex buffers currently bound for drawing
    pub fn vertex_data(&self) -> Ref<'_, VertexData> {
        self.bound.borrow()
    }

    /// Whether the bound buffers are the model's own
    pub fn has_own_vertex_data(&self) -> bool {
        Rc::ptr_eq(&self.bound.borrow().vertices, &self.base.vertices)
    }
}

/// Gram-Schmidt against the normal, with a fallback for missing UV data
fn orthonormal_tangent(tangent: Vec3, normal: Vec3) -> Vec3 {
    let projected = tangent - normal * normal.dot(&tangent);
    if let Some(t) = projected.try_normalize(1.0e-6) {
        return t;
    }
    let helper = if normal.x.abs() < 0.9 {
        Vec3::x()
    } else {
        Vec3::y()
    };
    let fallback = helper - normal * normal.dot(&helper);
    fallback.try_normalize(1.0e-6).unwrap_or_else(Vec3::x)
}
