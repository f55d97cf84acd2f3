//! Model drawing
//!
//! Draws each material area of a model with the matching material slot. The
//! vertex buffers are whatever the model currently has bound, so skinned
//! entities bind their deformed buffers first.

use std::rc::Rc;

use crate::assets::{Material, Model};
use super::{DrawPass, Renderer, ShaderParams};

/// Draw a model with lighting
///
/// `non_lit` is set when any area used a material with lighting disabled, so
/// the caller knows a separate unlit pass is needed.
pub fn draw_model(
    renderer: &mut dyn Renderer,
    materials: &[Rc<Material>],
    model: &Model,
    params: &ShaderParams,
    non_lit: &mut bool,
) {
    *non_lit = false;
    renderer.set_shader_params(params);
    draw_areas(renderer, Some(materials), model, DrawPass::Lit, |material| {
        if !material.is_lit() {
            *non_lit = true;
        }
    });
}

/// Draw a model in the ambient pass
pub fn draw_model_ambient(
    renderer: &mut dyn Renderer,
    materials: &[Rc<Material>],
    model: &Model,
    params: &ShaderParams,
) {
    renderer.set_shader_params(params);
    draw_areas(renderer, Some(materials), model, DrawPass::Ambient, |_| {});
}

/// Draw a model's geometry without binding any material
pub fn draw_model_without_materials(renderer: &mut dyn Renderer, model: &Model, params: &ShaderParams) {
    renderer.set_shader_params(params);
    draw_areas(renderer, None, model, DrawPass::DepthOnly, |_| {});
}

fn draw_areas(
    renderer: &mut dyn Renderer,
    materials: Option<&[Rc<Material>]>,
    model: &Model,
    pass: DrawPass,
    mut on_material: impl FnMut(&Material),
) {
    let vertex_data = model.vertex_data();

    for (i, area) in model.areas().iter().enumerate() {
        if let Some(material) = materials.and_then(|m| m.get(i)) {
            on_material(material);
            renderer.bind_material(material);
        }

        let end = area.first_index + area.index_count;
        let indices = model.indices().get(area.first_index..end).unwrap_or(&[]);
        if indices.is_empty() && !model.indices().is_empty() {
            continue;
        }
        renderer.draw_area(&vertex_data, indices, pass);
    }
}
