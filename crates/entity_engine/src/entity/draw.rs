//! Drawing and culling

use crate::foundation::math::{Vec3, Vec4};
use crate::render::model_renderer;
use crate::render::{Camera, Renderer, ShaderParams};
use super::{default_box, Entity};

const BOUNDS_COLOR: [f32; 4] = [0.04, 0.04, 0.06, 1.0];
const WIREFRAME_COLOR: [f32; 4] = [0.2, 0.2, 0.3, 1.0];
const SELECTED_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

impl Entity {
    fn modelview_params(&self, params: &ShaderParams) -> ShaderParams {
        let mut params = params.clone();
        params.modelview_matrix = params.camera_matrix * self.actor.transform().to_matrix();
        params
    }

    /// Bind cached skinned buffers to the shared model for one draw call
    fn bind_skinned_vertices(&self) -> bool {
        let (Some(model), Some(_), Some(vertices), Some(normals)) =
            (&self.model, &self.armature, &self.vertices, &self.normals)
        else {
            return false;
        };
        model.bind_vertex_data(vertices.clone(), normals.clone());
        true
    }

    fn restore_model_vertices(&self, bound: bool) {
        if let (true, Some(model)) = (bound, &self.model) {
            model.restore_vertex_data();
        }
    }

    /// Draw with materials and lighting
    pub fn draw(&mut self, renderer: &mut dyn Renderer, params: &ShaderParams) {
        let Some(model) = self.model.clone() else {
            return;
        };
        if !self.visible {
            return;
        }

        let params = self.modelview_params(params);
        let bound = self.bind_skinned_vertices();
        model_renderer::draw_model(renderer, &self.materials, &model, &params, &mut self.non_lit);
        self.restore_model_vertices(bound);
    }

    /// Draw in the ambient pass
    pub fn draw_ambient(&self, renderer: &mut dyn Renderer, params: &ShaderParams) {
        let Some(model) = &self.model else {
            return;
        };
        if !self.visible {
            return;
        }

        let params = self.modelview_params(params);
        let bound = self.bind_skinned_vertices();
        model_renderer::draw_model_ambient(renderer, &self.materials, model, &params);
        self.restore_model_vertices(bound);
    }

    /// Draw geometry only
    pub fn draw_without_materials(&self, renderer: &mut dyn Renderer, params: &ShaderParams) {
        let Some(model) = &self.model else {
            return;
        };
        if !self.visible {
            return;
        }

        let params = self.modelview_params(params);
        let bound = self.bind_skinned_vertices();
        model_renderer::draw_model_without_materials(renderer, model, &params);
        self.restore_model_vertices(bound);
    }

    /// Draw the model-space bounding box
    ///
    /// Skinned entities use a cube of half size `cull_radius`, since the
    /// animated pose can leave the model's own box.
    pub fn draw_bounding_box(&self, renderer: &mut dyn Renderer, params: &ShaderParams) {
        let Some(model) = &self.model else {
            return;
        };
        if !self.visible {
            return;
        }

        let params = self.modelview_params(params);
        renderer.set_shader_params(&params);
        if self.armature.is_some() {
            let r = self.cull_radius;
            renderer.draw_bounding_box(Vec3::repeat(-r), Vec3::repeat(r));
        } else {
            renderer.draw_bounding_box(model.bb_min(), model.bb_max());
        }
    }

    /// Draw the bounding box, a wireframe outline and the armature bones
    pub fn draw_debug(&self, renderer: &mut dyn Renderer, params: &ShaderParams) {
        let mut params = self.modelview_params(params);
        let (min, max) = self
            .model
            .as_ref()
            .map_or_else(default_box, |m| (m.bb_min(), m.bb_max()));

        params.color = Vec4::from(BOUNDS_COLOR);
        renderer.set_shader_params(&params);
        renderer.draw_bounding_box(min, max);

        params.color = Vec4::from(if self.is_selected() {
            SELECTED_COLOR
        } else {
            WIREFRAME_COLOR
        });
        renderer.set_shader_params(&params);
        renderer.draw_lines(&wireframe_box(min, max));

        if let Some(armature) = &self.armature {
            armature.draw_debug(renderer, &params, self.armature_player.frame());
        }
    }

    /// Whether the entity should be skipped this frame
    ///
    /// Entities without a model or hidden ones are always culled; others are
    /// culled when their sphere lies outside the camera frustum.
    pub fn cull(&self, camera: &Camera) -> bool {
        if self.model.is_none() || !self.visible {
            return true;
        }
        !camera.sphere_inside_frustum(self.position, self.cull_radius)
    }

    /// Whether cached placement changed since the last frame
    pub fn changed(&self) -> bool {
        self.actor.moved()
    }

    /// Mark placement as current
    pub fn clear_changed(&mut self) {
        self.actor.clear_moved();
    }
}

/// Twelve box edges as 24 line vertices: the -x face, the +x face, then the
/// four edges running along x
fn wireframe_box(min: Vec3, max: Vec3) -> [Vec3; 24] {
    let p = |x: f32, y: f32, z: f32| Vec3::new(x, y, z);
    [
        p(min.x, max.y, max.z), p(min.x, max.y, min.z),
        p(min.x, max.y, min.z), p(min.x, min.y, min.z),
        p(min.x, min.y, min.z), p(min.x, min.y, max.z),
        p(min.x, min.y, max.z), p(min.x, max.y, max.z),
        p(max.x, max.y, max.z), p(max.x, max.y, min.z),
        p(max.x, max.y, min.z), p(max.x, min.y, min.z),
        p(max.x, min.y, min.z), p(max.x, min.y, max.z),
        p(max.x, min.y, max.z), p(max.x, max.y, max.z),
        p(min.x, max.y, max.z), p(max.x, max.y, max.z),
        p(min.x, min.y, max.z), p(max.x, min.y, max.z),
        p(min.x, min.y, min.z), p(max.x, min.y, min.z),
        p(min.x, max.y, min.z), p(max.x, max.y, min.z),
    ]
}
