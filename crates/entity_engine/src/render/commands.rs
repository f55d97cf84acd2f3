//! Recorded rendering commands
//!
//! [`CommandRecorder`] implements [`Renderer`] by storing every call as a
//! [`RenderCommand`]. Tools use it to inspect a frame; a real backend can
//! replay the list.

use crate::assets::{Material, VertexData};
use crate::foundation::math::{Vec3, Vec4};
use super::{DrawPass, Renderer, ShaderParams};

/// One recorded renderer call
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Shader inputs changed
    ShaderParams(ShaderParams),
    /// A material was bound, by name
    Material(String),
    /// Geometry was drawn
    Area {
        /// Number of vertices in the bound buffers
        vertex_count: usize,
        /// Number of indices drawn; zero for sequential drawing
        index_count: usize,
        /// First bound vertex, to tell skinned buffers from the originals
        first_vertex: Option<Vec3>,
        /// Pass the draw belongs to
        pass: DrawPass,
    },
    /// A box outline was drawn
    BoundingBox {
        /// Minimum corner
        min: Vec3,
        /// Maximum corner
        max: Vec3,
    },
    /// Line segments were drawn
    Lines(Vec<Vec3>),
}

/// Renderer that records calls instead of drawing
#[derive(Debug, Clone, Default)]
pub struct CommandRecorder {
    commands: Vec<RenderCommand>,
}

impl CommandRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded so far
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Forget all recorded commands
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of geometry draws
    pub fn area_draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::Area { .. }))
            .count()
    }

    /// Names of bound materials in order
    pub fn bound_materials(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::Material(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Colors set through shader params, in order
    pub fn colors(&self) -> Vec<Vec4> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::ShaderParams(params) => Some(params.color),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for CommandRecorder {
    fn set_shader_params(&mut self, params: &ShaderParams) {
        self.commands.push(RenderCommand::ShaderParams(params.clone()));
    }

    fn bind_material(&mut self, material: &Material) {
        self.commands.push(RenderCommand::Material(material.name().to_string()));
    }

    fn draw_area(&mut self, vertex_data: &VertexData, indices: &[u32], pass: DrawPass) {
        self.commands.push(RenderCommand::Area {
            vertex_count: vertex_data.vertices.len(),
            index_count: indices.len(),
            first_vertex: vertex_data.vertices.first().copied(),
            pass,
        });
    }

    fn draw_bounding_box(&mut self, min: Vec3, max: Vec3) {
        self.commands.push(RenderCommand::BoundingBox { min, max });
    }

    fn draw_lines(&mut self, points: &[Vec3]) {
        self.commands.push(RenderCommand::Lines(points.to_vec()));
    }
}
