//! Rendering seam
//!
//! Entities do not talk to a graphics API. They describe what to draw through
//! the [`Renderer`] trait; a backend (or the [`commands::CommandRecorder`] used
//! by tests and tools) decides what that means.

pub mod camera;
pub mod commands;
pub mod model_renderer;

pub use camera::{Camera, Frustum, Plane};
pub use commands::{CommandRecorder, RenderCommand};

use crate::assets::{Material, VertexData};
use crate::foundation::math::{Mat4, Vec3, Vec4};

/// Per-draw shader inputs
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderParams {
    /// World to view transform
    pub camera_matrix: Mat4,
    /// View to clip transform
    pub projection_matrix: Mat4,
    /// Object to view transform
    pub modelview_matrix: Mat4,
    /// Flat color used by unlit and debug drawing
    pub color: Vec4,
}

impl Default for ShaderParams {
    fn default() -> Self {
        Self {
            camera_matrix: Mat4::identity(),
            projection_matrix: Mat4::identity(),
            modelview_matrix: Mat4::identity(),
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
        }
    }
}

impl ShaderParams {
    /// Parameters for drawing through `camera`
    pub fn from_camera(camera: &Camera) -> Self {
        let camera_matrix = camera.view_matrix();
        Self {
            camera_matrix,
            projection_matrix: camera.projection_matrix(),
            modelview_matrix: camera_matrix,
            ..Self::default()
        }
    }
}

/// Which pass a draw call belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawPass {
    /// Full lighting with materials
    Lit,
    /// Ambient-only pass
    Ambient,
    /// Geometry only, no material state
    DepthOnly,
}

/// Backend interface used by entities and models
pub trait Renderer {
    /// Set matrices and flat color for the following draw calls
    fn set_shader_params(&mut self, params: &ShaderParams);

    /// Bind a material's colors and textures
    fn bind_material(&mut self, material: &Material);

    /// Draw triangles from `indices`, or all vertices in order when `indices` is empty
    fn draw_area(&mut self, vertex_data: &VertexData, indices: &[u32], pass: DrawPass);

    /// Draw an axis-aligned box outline
    fn draw_bounding_box(&mut self, min: Vec3, max: Vec3);

    /// Draw line segments from consecutive point pairs
    fn draw_lines(&mut self, points: &[Vec3]);
}

/// Occlusion query owned by a drawable object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OcclusionQuery {
    running: bool,
    visible_samples: Option<u64>,
}

impl OcclusionQuery {
    /// Create an idle query
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the query as issued
    pub fn begin(&mut self) {
        self.running = true;
        self.visible_samples = None;
    }

    /// Record the result reported by the backend
    pub fn finish(&mut self, visible_samples: u64) {
        self.running = false;
        self.visible_samples = Some(visible_samples);
    }

    /// Whether a result is still outstanding
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Last reported sample count
    pub fn visible_samples(&self) -> Option<u64> {
        self.visible_samples
    }
}
