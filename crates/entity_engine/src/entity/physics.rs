//! Physics body lifecycle for entities

use std::cell::RefCell;
use std::rc::Rc;

use crate::foundation::math::{Quat, Vec3};
use crate::physics::{CollisionShape, Joint, JointKind, PhysicsObject, ShapeKind, SharedJoint};
use crate::scene::Scene;
use super::{default_box, Entity};

impl Entity {
    /// Build the simulated body from the model bounds
    ///
    /// Any existing body is torn down first. Without a model nothing happens;
    /// mesh physics on a model without indices leaves the entity without a body.
    pub fn set_physics(&mut self, kind: ShapeKind, mass: f32) {
        let Some(model) = self.model.clone() else {
            log::debug!("Entity {:?}: physics needs a model", self.name());
            return;
        };

        self.disable_physics();

        let shape = match kind {
            ShapeKind::Box => CollisionShape::fitted_box(model.bb_min(), model.bb_max()),
            ShapeKind::Sphere => CollisionShape::fitted_sphere(model.bb_min(), model.bb_max()),
            ShapeKind::Mesh => match model.collision_mesh() {
                Some(mesh) => CollisionShape::Mesh(mesh),
                None => {
                    log::debug!("Entity {:?}: model '{}' has no indices for mesh physics", self.name(), model.name());
                    return;
                }
            },
        };

        let mut object = PhysicsObject::new(shape, mass);
        object.set_actor(Some(self.id()));
        self.place_body(&mut object);
        object.set_damping(self.actor.linear_damping(), self.actor.angular_damping());

        let scene = self.actor.scene();
        if let Some(scene) = &scene {
            object.set_world(Some(scene.world()));
        }
        self.object = Some(object);

        // constraints must be rebuilt against the new body
        self.reattach_joints(scene.as_ref());

        log::trace!("Entity {:?}: {:?} physics, mass {}", self.name(), kind, mass);
    }

    /// Tear down the simulated body
    pub fn disable_physics(&mut self) {
        if let Some(mut object) = self.object.take() {
            object.set_actor(None);
            object.set_world(None);
        }
    }

    /// Rebuild the debug body from the model bounds (or the default box)
    pub fn reset_debug_physics_object(&mut self) {
        self.dobject.set_actor(None);
        self.dobject.set_world(None);

        let (bb_min, bb_max) = self
            .model
            .as_ref()
            .map_or_else(default_box, |m| (m.bb_min(), m.bb_max()));

        let mut dobject = PhysicsObject::new(CollisionShape::fitted_box(bb_min, bb_max), 0.0);
        dobject.set_actor(Some(self.id()));
        self.place_body(&mut dobject);

        if let Some(scene) = self.actor.scene() {
            dobject.set_world(Some(scene.debug_world()));
        }
        self.dobject = dobject;
    }

    fn place_body(&self, object: &mut PhysicsObject) {
        let transform = self.actor.transform();
        object.set_position(transform.position);
        object.set_orientation(transform.rotation);
        object.set_scale(transform.scale);
    }

    fn reattach_joints(&self, scene: Option<&Rc<Scene>>) {
        for joint in self.actor.joints() {
            match joint.try_borrow_mut() {
                Ok(mut joint) => {
                    joint.set_world(None);
                    if let Some(scene) = scene {
                        joint.set_world(Some(scene.world()));
                    }
                }
                Err(_) => log::warn!("Entity {:?}: joint busy, not re-attached", self.name()),
            }
        }
    }

    /// Simulated body, while physics is enabled
    pub fn physics_object(&self) -> Option<&PhysicsObject> {
        self.object.as_ref()
    }

    /// Debug body
    pub fn debug_physics_object(&self) -> &PhysicsObject {
        &self.dobject
    }

    /// Shape kind of the simulated body
    pub fn physics_shape(&self) -> Option<ShapeKind> {
        self.object.as_ref().map(PhysicsObject::shape_kind)
    }

    /// Mass of the simulated body
    pub fn physics_mass(&self) -> Option<f32> {
        self.object.as_ref().map(PhysicsObject::mass)
    }

    /// Set damping; kept for bodies built later
    pub fn set_damping(&mut self, linear: f32, angular: f32) {
        self.actor.set_damping(linear, angular);
        if let Some(object) = &mut self.object {
            object.set_damping(linear, angular);
        }
    }

    /// Move the entity and both bodies
    pub fn set_position(&mut self, position: Vec3) {
        self.actor.transform_mut().position = position;
        if let Some(object) = &mut self.object {
            object.set_position(position);
        }
        self.dobject.set_position(position);
        self.position = position;
        self.actor.mark_moved();
    }

    /// Rotate the entity and both bodies
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.actor.transform_mut().rotation = orientation;
        if let Some(object) = &mut self.object {
            object.set_orientation(orientation);
        }
        self.dobject.set_orientation(orientation);
        self.actor.mark_moved();
    }

    /// Connect this entity to `other` with a new joint
    ///
    /// The joint is shared by both entities and attached to this entity's
    /// scene world. Returns `None` when this entity is not in a scene.
    pub fn create_joint(&mut self, other: &mut Entity, name: &str, kind: JointKind) -> Option<SharedJoint> {
        let Some(scene) = self.actor.scene() else {
            log::debug!("Entity {:?}: joint '{}' needs a scene", self.name(), name);
            return None;
        };

        let mut joint = Joint::new(name, kind, self.id(), other.id(), scene.registry());
        joint.set_world(Some(scene.world()));
        let joint = Rc::new(RefCell::new(joint));

        self.actor.add_joint(Rc::clone(&joint));
        other.actor.add_joint(Rc::clone(&joint));
        log::debug!("Entity {:?}: joint '{}' to {:?}", self.name(), name, other.name());
        Some(joint)
    }

    /// Remove a joint by name from both connected entities and detach it
    pub fn remove_joint(&mut self, name: &str) -> Option<SharedJoint> {
        let joint = self.actor.take_joint(name)?;
        let other = joint.borrow().other(self.id());

        if let (Some(other), Some(scene)) = (other, self.actor.scene()) {
            if let Some(entity) = scene.entity_by_id(other) {
                if let Ok(mut entity) = entity.try_borrow_mut() {
                    entity.actor.take_joint(name);
                }
            }
        }

        joint.borrow_mut().set_world(None);
        Some(joint)
    }

    /// Joints this entity takes part in
    pub fn joints(&self) -> &[SharedJoint] {
        self.actor.joints()
    }

    /// Join `scene`, or leave the current one when `None`
    ///
    /// The simulated body and joints go to the scene world, the debug body to
    /// the debug world.
    pub fn set_scene(&mut self, scene: Option<&Rc<Scene>>) {
        self.actor.set_scene_link(scene);

        let world = scene.map(|s| s.world());
        if let Some(object) = &mut self.object {
            object.set_world(world);
        }
        self.dobject.set_world(scene.map(|s| s.debug_world()));
        for joint in self.actor.joints() {
            if let Ok(mut joint) = joint.try_borrow_mut() {
                joint.set_world(world);
            }
        }
    }

    /// Copy placement from a dynamic, attached body back into the transform
    pub(crate) fn sync_from_physics(&mut self) {
        let Some(object) = &self.object else {
            return;
        };
        if object.mass() <= 0.0 || !object.is_in_world() {
            return;
        }

        let (position, orientation) = (object.position(), object.orientation());
        let transform = self.actor.transform();
        if transform.position == position && transform.rotation == orientation {
            return;
        }

        let transform = self.actor.transform_mut();
        transform.position = position;
        transform.rotation = orientation;
        self.dobject.set_position(position);
        self.dobject.set_orientation(orientation);
        self.position = position;
        self.actor.mark_moved();
    }

    /// Move the simulated body as a solver would
    pub fn physics_object_mut(&mut self) -> Option<&mut PhysicsObject> {
        self.object.as_mut()
    }
}
