//! Scene entities
//!
//! An entity binds a model, its materials, an optional armature and two
//! physics bodies to one actor. Changing any of these keeps the rest
//! consistent: bounding volumes are recomputed, bodies are rebuilt and
//! re-attached, joints follow the new bodies, and tangents are generated when
//! a material needs them.
//!
//! The simulated body only exists while physics is enabled. The debug body
//! always exists, has zero mass, mirrors the model's unscaled bounding box and
//! only ever joins the scene's debug world.

mod armature;
mod draw;
mod pak;
mod physics;

pub use pak::{EntityLoadError, EntityRecord, MAGIC};

use std::cell::RefCell;
use std::rc::Rc;

use crate::animation::FramePlayer;
use crate::assets::{Armature, Material, Model};
use crate::foundation::math::{Quat, Vec3};
use crate::foundation::memory::{ActorId, ObjectKind, ObjectRegistry};
use crate::physics::{CollisionShape, PhysicsObject};
use crate::render::OcclusionQuery;
use crate::scene::{Actor, Scene};

/// Entity shared between a scene and its users
pub type SharedEntity = Rc<RefCell<Entity>>;

/// Half extent of the box used when an entity has no model
pub const DEFAULT_HALF_EXTENT: f32 = 0.2;

fn default_box() -> (Vec3, Vec3) {
    (
        Vec3::repeat(-DEFAULT_HALF_EXTENT),
        Vec3::repeat(DEFAULT_HALF_EXTENT),
    )
}

/// A scene object with visual, physical and animation state
#[derive(Debug)]
pub struct Entity {
    actor: Actor,

    model: Option<Rc<Model>>,
    materials: Vec<Rc<Material>>,
    visible: bool,
    non_lit: bool,

    armature: Option<Rc<Armature>>,
    armature_player: FramePlayer,
    vertices: Option<Rc<[Vec3]>>,
    normals: Option<Rc<[Vec3]>>,
    prev_armature_frame: Option<f32>,

    object: Option<PhysicsObject>,
    dobject: PhysicsObject,

    bb_min: Vec3,
    bb_max: Vec3,
    cull_radius: f32,
    position: Vec3,

    query: OcclusionQuery,
}

impl Entity {
    /// Create an entity without model, materials or physics
    ///
    /// The entity counts as one live object in `registry` until it is dropped.
    pub fn new(name: Option<&str>, registry: &ObjectRegistry) -> Self {
        let actor = Actor::new(name, ObjectKind::Entity, registry);
        let (bb_min, bb_max) = default_box();

        let mut dobject = PhysicsObject::new(CollisionShape::fitted_box(bb_min, bb_max), 0.0);
        dobject.set_actor(Some(actor.id()));

        log::debug!("Created entity {:?}", name);

        Self {
            actor,
            model: None,
            materials: Vec::new(),
            visible: true,
            non_lit: false,
            armature: None,
            armature_player: FramePlayer::new(),
            vertices: None,
            normals: None,
            prev_armature_frame: Some(0.0),
            object: None,
            dobject,
            bb_min,
            bb_max,
            cull_radius: 0.0,
            position: Vec3::zeros(),
            query: OcclusionQuery::new(),
        }
    }

    /// Actor base
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Mutable actor base
    pub fn actor_mut(&mut self) -> &mut Actor {
        &mut self.actor
    }

    /// Registry id
    pub fn id(&self) -> ActorId {
        self.actor.id()
    }

    /// Entity name
    pub fn name(&self) -> Option<&str> {
        self.actor.name()
    }

    /// Owning scene, if any
    pub fn scene(&self) -> Option<Rc<Scene>> {
        self.actor.scene()
    }

    /// World position
    pub fn position(&self) -> Vec3 {
        self.actor.transform().position
    }

    /// World orientation
    pub fn orientation(&self) -> Quat {
        self.actor.transform().rotation
    }

    /// Set the scale on the transform and both bodies, then refresh bounds
    pub fn set_scale(&mut self, scale: Vec3) {
        log::trace!("Entity {:?}: scale {:?}", self.name(), scale);
        self.actor.transform_mut().scale = scale;

        if let Some(object) = &mut self.object {
            object.set_scale(scale);
        }
        self.dobject.set_scale(scale);

        self.calc_bounding_volumes();
        self.actor.mark_moved();
    }

    /// Current scale
    pub fn scale(&self) -> Vec3 {
        self.actor.transform().scale
    }

    /// Assign or clear the model
    ///
    /// Assigning pads the material list to the model's area count, resets the
    /// scale to one, rebuilds an existing simulated body with the same shape
    /// kind and mass, and refits the debug body. Clearing tears the simulated
    /// body down.
    pub fn set_model(&mut self, model: Option<Rc<Model>>) {
        self.model = model;
        self.vertices = None;
        self.normals = None;
        self.prev_armature_frame = None;

        let Some(model) = self.model.clone() else {
            log::debug!("Entity {:?}: model cleared", self.name());
            if self.object.is_some() {
                self.disable_physics();
            }
            self.reset_debug_physics_object();
            self.calc_bounding_volumes();
            return;
        };

        log::debug!("Entity {:?}: model '{}'", self.name(), model.name());
        self.calc_bounding_volumes();

        while model.area_count() > self.materials.len() {
            self.add_material(Rc::new(Material::new("")));
        }

        self.set_scale(Vec3::new(1.0, 1.0, 1.0));

        if let Some((shape, mass)) = self.object.as_ref().map(|o| (o.shape_kind(), o.mass())) {
            self.set_physics(shape, mass);
        }

        self.reset_debug_physics_object();
        self.actor.mark_moved();
    }

    /// Current model
    pub fn model(&self) -> Option<&Rc<Model>> {
        self.model.as_ref()
    }

    /// Recompute `bb_min`, `bb_max` and `cull_radius` from model, armature and scale
    pub fn calc_bounding_volumes(&mut self) {
        let Some(model) = &self.model else {
            (self.bb_min, self.bb_max) = default_box();
            self.cull_radius = 0.0;
            return;
        };

        let scale = self.actor.transform().scale;
        self.bb_min = model.bb_min().component_mul(&scale);
        self.bb_max = model.bb_max().component_mul(&scale);

        let mut radius = model.radius();
        if let Some(armature) = &self.armature {
            radius = radius
                .max(armature.bb_min().magnitude())
                .max(armature.bb_max().magnitude());
        }

        self.cull_radius = radius * self.actor.transform().max_scale();
    }

    /// Minimum corner of the scaled bounding box
    pub fn bb_min(&self) -> Vec3 {
        self.bb_min
    }

    /// Maximum corner of the scaled bounding box
    pub fn bb_max(&self) -> Vec3 {
        self.bb_max
    }

    /// Radius of the culling sphere
    pub fn cull_radius(&self) -> f32 {
        self.cull_radius
    }

    /// Number of material slots
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Material in slot `idx`
    pub fn material(&self, idx: usize) -> Option<&Rc<Material>> {
        self.materials.get(idx)
    }

    /// All material slots
    pub fn materials(&self) -> &[Rc<Material>] {
        &self.materials
    }

    /// Replace the material in an existing slot; out-of-range slots are ignored
    pub fn set_material(&mut self, idx: usize, material: Rc<Material>) {
        let Some(slot) = self.materials.get_mut(idx) else {
            log::debug!(
                "Entity {:?}: material slot {} out of range ({} slots)",
                self.actor.name(),
                idx,
                self.materials.len()
            );
            return;
        };
        *slot = material;
        self.generate_tangent_vectors();
    }

    /// Append a material slot
    pub fn add_material(&mut self, material: Rc<Material>) {
        self.materials.push(material);
        self.generate_tangent_vectors();
    }

    /// Generate model tangents if a material uses a normal map
    ///
    /// Tangents live on the shared model, so this runs at most once per model.
    pub fn generate_tangent_vectors(&self) {
        let Some(model) = &self.model else {
            return;
        };
        if model.has_tangents() {
            return;
        }
        if self.materials.iter().any(|m| m.has_normal_map()) {
            model.generate_tangent_vectors();
        }
    }

    /// Assign or clear the armature and refresh bounds
    pub fn set_armature(&mut self, armature: Option<Rc<Armature>>) {
        self.armature = armature;
        self.calc_bounding_volumes();
    }

    /// Current armature
    pub fn armature(&self) -> Option<&Rc<Armature>> {
        self.armature.as_ref()
    }

    /// Show or hide the entity; hiding marks it moved
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        if !visible {
            self.actor.mark_moved();
        }
    }

    /// Whether the entity is drawn
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Select or deselect the entity
    pub fn set_selected(&mut self, selected: bool) {
        self.actor.set_selected(selected);
    }

    /// Whether the entity is selected
    pub fn is_selected(&self) -> bool {
        self.actor.is_selected()
    }

    /// Whether the last draw used a material with lighting disabled
    pub fn is_non_lit(&self) -> bool {
        self.non_lit
    }

    /// Occlusion query
    pub fn query(&self) -> &OcclusionQuery {
        &self.query
    }

    /// Mutable occlusion query
    pub fn query_mut(&mut self) -> &mut OcclusionQuery {
        &mut self.query
    }
}
